use wgpu::RenderPass;

use crate::data::marker::{COLUMN_HEIGHT, COLUMN_RADIAL_SEGMENTS, COLUMN_RADIUS, Marker};

use super::{
    buffer::Buffer,
    data::{MarkerInstance, Uniforms},
    geometry::column_mesh,
    pipeline::Pipeline,
};

/// Draws every marker as an instance of a single column mesh.
pub struct MarkerRenderer {
    pipeline: Pipeline,
    vertices: Buffer,
    indices: Buffer,
    indices_len: u32,
    instances: Buffer,
    instances_len: u32,
}

impl MarkerRenderer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let pipeline = Pipeline::create_column_pipeline(device, format);

        let mesh = column_mesh(COLUMN_RADIUS, COLUMN_HEIGHT, COLUMN_RADIAL_SEGMENTS);
        let vertices = Buffer::new_init(
            device,
            "column vertex buffer",
            bytemuck::cast_slice(&mesh.vertices),
            wgpu::BufferUsages::VERTEX,
        );
        let indices = Buffer::new_init(
            device,
            "column index buffer",
            bytemuck::cast_slice(&mesh.indices),
            wgpu::BufferUsages::INDEX,
        );
        let instances = Buffer::new(
            device,
            "marker instance buffer",
            std::mem::size_of::<MarkerInstance>() as u64,
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        );

        Self {
            pipeline,
            vertices,
            indices,
            indices_len: mesh.indices.len() as u32,
            instances,
            instances_len: 0,
        }
    }

    pub fn instances_len(&self) -> u32 {
        self.instances_len
    }

    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, markers: &[Marker]) {
        let instances = markers
            .iter()
            .map(MarkerInstance::from)
            .collect::<Vec<_>>();

        if !instances.is_empty() {
            self.instances
                .write(device, queue, bytemuck::cast_slice(&instances));
        }
        self.instances_len = instances.len() as u32;
    }

    pub fn update(&self, queue: &wgpu::Queue, uniforms: &Uniforms) {
        queue.write_buffer(self.pipeline.get_uniforms(), 0, bytemuck::bytes_of(uniforms));
    }

    pub fn render(&self, render_pass: &mut RenderPass<'_>) {
        if self.instances_len == 0 {
            return;
        }

        render_pass.set_pipeline(self.pipeline.get_pipeline());
        render_pass.set_bind_group(0, self.pipeline.get_uniform_bind_group(), &[]);
        render_pass.set_vertex_buffer(0, self.vertices.raw.slice(..));
        render_pass.set_vertex_buffer(1, self.instances.raw.slice(..));
        render_pass.set_index_buffer(self.indices.raw.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.indices_len, 0, 0..self.instances_len);
    }
}
