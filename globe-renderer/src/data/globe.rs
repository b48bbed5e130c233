use std::f32::consts::PI;

use glam::{EulerRot, Mat4, Vec2};

use crate::data::marker::Marker;

pub const GLOBE_RADIUS: f32 = 10.0;

/// The textured sphere together with the markers attached to it.
///
/// Rotation angles are plain accumulators in radians and are never wrapped.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobeState {
    // x: around the X axis, y: around the Y axis
    pub rotation: Vec2,
    radius: f32,
    segments: u32,
    markers: Vec<Marker>,
}

impl GlobeState {
    pub fn new(segments: u32) -> Self {
        Self {
            // Puts the texture's prime meridian in the right spot
            rotation: Vec2::new(0.0, PI),
            radius: GLOBE_RADIUS,
            segments: segments.max(3),
            markers: vec![],
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn rotate(&mut self, around_x: f32, around_y: f32) {
        self.rotation.x += around_x;
        self.rotation.y += around_y;
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0)
    }

    pub fn attach_markers(&mut self, markers: impl IntoIterator<Item = Marker>) {
        self.markers.extend(markers);
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;
    use globe_common::CoordinateRecord;

    use super::*;

    #[test]
    fn starts_turned_half_way_around() {
        let globe = GlobeState::new(64);
        let front = globe.model_matrix().transform_point3(Vec3::new(0.0, 0.0, 1.0));

        assert_relative_eq!(front, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
        assert!(globe.markers().is_empty());
    }

    #[test]
    fn rotation_accumulates_without_wrapping() {
        let mut globe = GlobeState::new(64);
        for _ in 0..100 {
            globe.rotate(0.1, 0.1);
        }

        assert_relative_eq!(globe.rotation.x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(globe.rotation.y, 10.0 + PI, epsilon = 1e-4);
    }

    #[test]
    fn markers_follow_globe_rotation() {
        let mut globe = GlobeState::new(64);
        globe.rotation = Vec2::ZERO;
        let marker = Marker::new(CoordinateRecord::new(0.0, 0.0).unwrap(), globe.radius());
        globe.attach_markers([marker]);
        globe.rotate(0.0, 0.5 * PI);

        let anchor = globe.model_matrix() * globe.markers()[0].local_transform();
        let world = anchor.transform_point3(Vec3::ZERO);

        assert_relative_eq!(world, Vec3::new(0.0, 0.0, -GLOBE_RADIUS), epsilon = 1e-4);
    }
}
