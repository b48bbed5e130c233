use crate::{
    data::{Size, camera::Camera, globe::GlobeState, pointer::PointerState},
    render::data::Uniforms,
};

pub struct ApplicationData {
    pub camera: Camera,
    pub globe: GlobeState,
    pub pointer: PointerState,
    pub uniforms: Uniforms,
    scale_factor: f64,
}

impl ApplicationData {
    pub fn new(bounds: Size<f32>, sphere_segments: u32) -> Self {
        let camera = Camera::default();
        let globe = GlobeState::new(sphere_segments);
        let uniforms = Uniforms::new(&camera, &globe, bounds);

        Self {
            camera,
            globe,
            pointer: PointerState::default(),
            uniforms,
            scale_factor: 1.0,
        }
    }

    /// Physical pixels per logical pixel of the window.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        if scale_factor.is_finite() && scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    pub fn update_uniforms(&mut self, bounds: Size<f32>) {
        self.uniforms = Uniforms::new(&self.camera, &self.globe, bounds);
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(2.0, 2.0)]
    #[case(1.25, 1.25)]
    #[case(0.0, 1.0)]
    #[case(-2.0, 1.0)]
    #[case(f64::NAN, 1.0)]
    fn only_positive_scale_factors_are_accepted(
        #[case] scale_factor: f64,
        #[case] expected: f64,
    ) {
        let mut data = ApplicationData::new((800.0, 600.0).into(), 16);

        data.set_scale_factor(scale_factor);

        assert_eq!(data.scale_factor(), expected);
    }
}
