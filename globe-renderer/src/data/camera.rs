use glam::{Mat4, Vec3};

pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;
pub const MIN_DISTANCE: f32 = 15.0;
pub const MAX_DISTANCE: f32 = 100.0;
pub const DEFAULT_DISTANCE: f32 = 30.0;
// degrees
pub const DEFAULT_FOV_Y: f32 = 75.0;

/// Perspective camera sitting on the +Z axis and looking at the globe centre.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    distance: f32,
    fov_y: f32,
    near: f32,
    far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            distance: DEFAULT_DISTANCE,
            fov_y: DEFAULT_FOV_Y.to_radians(),
            near: NEAR,
            far: FAR,
        }
    }
}

impl Camera {
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Values outside of [MIN_DISTANCE, MAX_DISTANCE] are clamped,
    /// non-finite values are ignored.
    pub fn set_distance(&mut self, distance: f32) {
        if distance.is_finite() {
            self.distance = distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
        }
    }

    pub fn zoom(&mut self, delta: f32) {
        self.set_distance(self.distance + delta);
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    pub fn get_view(&self) -> Mat4 {
        Mat4::look_to_rh(self.eye(), Vec3::NEG_Z, Vec3::Y)
    }

    pub fn build_view_proj_matrix(&self, width: f32, height: f32) -> Mat4 {
        let aspect_ratio = if height > 0.0 { width / height } else { 1.0 };

        let proj = Mat4::perspective_rh(self.fov_y, aspect_ratio, self.near, self.far);

        proj * self.get_view()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(-1000.0, MIN_DISTANCE)]
    #[case(14.9, MIN_DISTANCE)]
    #[case(42.0, 42.0)]
    #[case(100.1, MAX_DISTANCE)]
    #[case(f32::INFINITY, DEFAULT_DISTANCE)]
    #[case(f32::NAN, DEFAULT_DISTANCE)]
    fn distance_is_clamped(#[case] requested: f32, #[case] expected: f32) {
        let mut camera = Camera::default();
        camera.set_distance(requested);
        assert_eq!(camera.distance(), expected);
    }

    #[test]
    fn globe_centre_projects_to_viewport_centre() {
        let camera = Camera::default();
        let projected = camera
            .build_view_proj_matrix(800.0, 600.0)
            .project_point3(Vec3::ZERO);

        assert_relative_eq!(projected.x, 0.0);
        assert_relative_eq!(projected.y, 0.0);
        assert!(projected.z > 0.0 && projected.z < 1.0);
    }

    #[test]
    fn zooming_out_shrinks_the_globe() {
        let mut camera = Camera::default();
        let edge = Vec3::new(10.0, 0.0, 0.0);
        let near_x = camera
            .build_view_proj_matrix(800.0, 800.0)
            .project_point3(edge)
            .x;

        camera.zoom(50.0);
        let far_x = camera
            .build_view_proj_matrix(800.0, 800.0)
            .project_point3(edge)
            .x;

        assert!(far_x < near_x);
    }
}
