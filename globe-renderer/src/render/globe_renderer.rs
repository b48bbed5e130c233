use wgpu::RenderPass;

use crate::data::{Size, globe::GlobeState};

use super::{
    bound_texture_view::BoundTextureView,
    buffer::Buffer,
    data::Uniforms,
    geometry::sphere_mesh,
    pipeline::GlobeRenderPipeline,
    texture::{Texture, TextureData},
};

pub struct GlobeRenderer {
    pipeline: GlobeRenderPipeline,
    vertices: Buffer,
    indices: Buffer,
    indices_len: u32,
    surface_texture: BoundTextureView,
    format: wgpu::TextureFormat,
    multisampled_framebuffer: wgpu::TextureView,
    depth_texture: Texture,
    target_size: Size<u32>,
}

impl GlobeRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        target_size: Size<u32>,
        globe: &GlobeState,
    ) -> Self {
        let pipeline = GlobeRenderPipeline::new(device, format);

        let mesh = sphere_mesh(globe.radius(), globe.segments(), globe.segments());
        log::debug!(
            "Globe mesh: {} vertices, {} indices",
            mesh.vertices.len(),
            mesh.indices.len()
        );
        let vertices = Buffer::new_init(
            device,
            "globe vertex buffer",
            bytemuck::cast_slice(&mesh.vertices),
            wgpu::BufferUsages::VERTEX,
        );
        let indices = Buffer::new_init(
            device,
            "globe index buffer",
            bytemuck::cast_slice(&mesh.indices),
            wgpu::BufferUsages::INDEX,
        );

        // White until the real texture arrives or if it never does
        let surface_texture =
            Self::create_surface_texture_view(device, queue, &pipeline, &TextureData::white());
        let multisampled_framebuffer =
            Self::create_multisampled_framebuffer(device, format, target_size);
        let depth_texture = Self::create_depth_texture(device, target_size);

        Self {
            pipeline,
            vertices,
            indices,
            indices_len: mesh.indices.len() as u32,
            surface_texture,
            format,
            multisampled_framebuffer,
            depth_texture,
            target_size,
        }
    }

    fn create_surface_texture_view(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipeline: &GlobeRenderPipeline,
        texture_data: &TextureData,
    ) -> BoundTextureView {
        let texture =
            Texture::create_surface_texture(device, queue, texture_data, "globe_surface_texture");

        BoundTextureView::create_with_layout(
            device,
            pipeline.get_surface_texture_bind_group_layout(),
            &[texture],
        )
    }

    fn create_multisampled_framebuffer(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        target_size: Size<u32>,
    ) -> wgpu::TextureView {
        Texture::create_multisampled_framebuffer(
            device,
            (target_size.width.max(1), target_size.height.max(1)),
            format,
            "multisampled_framebuffer",
        )
    }

    fn create_depth_texture(device: &wgpu::Device, target_size: Size<u32>) -> Texture {
        Texture::create_depth_texture(
            device,
            (target_size.width.max(1), target_size.height.max(1)),
            "depth_texture",
        )
    }

    pub fn set_surface_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture_data: &TextureData,
    ) {
        self.surface_texture =
            Self::create_surface_texture_view(device, queue, &self.pipeline, texture_data);
    }

    pub fn update(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_size: Size<u32>,
        uniforms: &Uniforms,
    ) {
        if self.target_size != target_size {
            self.multisampled_framebuffer =
                Self::create_multisampled_framebuffer(device, self.format, target_size);
            self.depth_texture = Self::create_depth_texture(device, target_size);
            self.target_size = target_size;
        }

        queue.write_buffer(
            self.pipeline.get_pipeline().get_uniforms(),
            0,
            bytemuck::bytes_of(uniforms),
        );
    }

    /// Clears the frame and draws the globe, returning the pass so that the
    /// markers can be drawn on top of it against the same depth buffer.
    /// The multisampled frame is resolved into `target` when the pass ends.
    pub fn render<'a>(
        &self,
        target: &wgpu::TextureView,
        encoder: &'a mut wgpu::CommandEncoder,
    ) -> Box<RenderPass<'a>> {
        let mut render_pass = Box::new(encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("globe.pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.multisampled_framebuffer,
                resolve_target: Some(target),
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Discard,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: self.depth_texture.get_view(),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        }));

        let pipeline = self.pipeline.get_pipeline();

        render_pass.set_pipeline(pipeline.get_pipeline());
        render_pass.set_bind_group(0, pipeline.get_uniform_bind_group(), &[]);
        render_pass.set_bind_group(1, self.surface_texture.get_bind_group(), &[]);
        render_pass.set_vertex_buffer(0, self.vertices.raw.slice(..));
        render_pass.set_index_buffer(self.indices.raw.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.indices_len, 0, 0..1);

        render_pass
    }
}
