use wgpu::TextureFormat;

use crate::data::{Size, globe::GlobeState};

use super::{globe_renderer::GlobeRenderer, marker_renderer::MarkerRenderer};

pub struct ApplicationRenderers {
    pub globe: GlobeRenderer,
    pub markers: MarkerRenderer,
}

impl ApplicationRenderers {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: TextureFormat,
        target_size: Size<u32>,
        globe: &GlobeState,
    ) -> Self {
        let globe_renderer = GlobeRenderer::new(device, queue, format, target_size, globe);

        let mut markers = MarkerRenderer::new(device, format);
        markers.prepare(device, queue, globe.markers());

        Self {
            globe: globe_renderer,
            markers,
        }
    }
}
