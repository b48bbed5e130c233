use std::sync::Arc;

use color_eyre::Result;
use winit::{dpi::PhysicalSize, window::Window};

use crate::data::{Size, application_data::ApplicationData, globe::GlobeState, marker::Marker};

use super::{application_renderers::ApplicationRenderers, texture::TextureData};

#[derive(Debug)]
pub enum RenderEvent {
    TextureReady(TextureData),
}

/// This struct handles logic that necessarily requires access to wgpu primitives
/// and so must be done synchronously in a tight loop
pub struct RenderEngine {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    renderers: ApplicationRenderers,
}

impl RenderEngine {
    pub async fn new(window: Arc<Window>, globe: GlobeState) -> Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The globe texture is sampled as sRGB, so the surface has to be sRGB as well
        // or every colour comes out darker
        let format = {
            let mut format = surface_caps.formats[0];
            let format_srgb = format.add_srgb_suffix();
            if surface_caps.formats.contains(&format_srgb) {
                format = format_srgb;
            }
            format
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![format],
            desired_maximum_frame_latency: 2,
        };

        let renderers = ApplicationRenderers::new(&device, &queue, format, size.into(), &globe);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            renderers,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn bounds(&self) -> Size<f32> {
        (self.size.width as f32, self.size.height as f32).into()
    }

    /// Largest texture side the device accepts; bigger images are scaled down.
    pub fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>, data: &mut ApplicationData) -> bool {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            log::info!("Surface configured to {}x{}", new_size.width, new_size.height);
            self.size = new_size;
            self.update(data);
            true
        } else {
            log::info!("Resize with 0,0 size...");
            false
        }
    }

    pub fn update(&mut self, data: &mut ApplicationData) {
        data.update_uniforms(self.bounds());
        self.renderers.globe.update(
            &self.device,
            &self.queue,
            self.size.into(),
            &data.uniforms,
        );
        self.renderers.markers.update(&self.queue, &data.uniforms);
    }

    pub fn render(&mut self) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.config.format),
            ..Default::default()
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut pass = self.renderers.globe.render(&view, &mut encoder);
            self.renderers.markers.render(&mut pass);
        }

        self.queue.submit(Some(encoder.finish()));
        output.present();

        Ok(())
    }

    pub fn process_event(&mut self, event: RenderEvent) {
        use RenderEvent::*;
        match event {
            TextureReady(texture_data) => {
                log::info!(
                    "Globe texture ready: {}x{}",
                    texture_data.width,
                    texture_data.height
                );
                self.renderers
                    .globe
                    .set_surface_texture(&self.device, &self.queue, &texture_data);
            }
        }
    }

    pub fn set_markers(&mut self, markers: &[Marker]) {
        self.renderers
            .markers
            .prepare(&self.device, &self.queue, markers);
        log::info!(
            "Drawing {} markers",
            self.renderers.markers.instances_len()
        );
    }
}
