use glam::{Mat4, Vec2, Vec3};

use crate::data::{
    Size,
    camera::Camera,
    globe::GlobeState,
    marker::{COLUMN_ALPHA, COLUMN_HEIGHT, Marker},
};

#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct GlobeVertex {
    pub position: Vec3,
    pub uv: Vec2,
}

impl GlobeVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        // position
        0 => Float32x3,
        // uv
        1 => Float32x2
    ];

    pub fn new(position: Vec3, uv: Vec2) -> Self {
        Self { position, uv }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct ColumnVertex {
    pub position: Vec3,
}

impl ColumnVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
        // position
        0 => Float32x3,
    ];

    pub fn new(position: Vec3) -> Self {
        Self { position }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Per-instance transform of a column relative to the globe.
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct MarkerInstance {
    model: Mat4,
}

impl MarkerInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        // model matrix columns
        1 => Float32x4,
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

impl From<&Marker> for MarkerInstance {
    fn from(marker: &Marker) -> Self {
        Self {
            model: marker.local_transform(),
        }
    }
}

#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Uniforms {
    view_proj: Mat4,
    globe_model: Mat4,
    column_height: f32,
    column_alpha: f32,
    _padding: [f32; 2],
}

impl Uniforms {
    pub fn new(camera: &Camera, globe: &GlobeState, bounds: Size<f32>) -> Self {
        Self {
            view_proj: camera.build_view_proj_matrix(bounds.width, bounds.height),
            globe_model: globe.model_matrix(),
            column_height: COLUMN_HEIGHT,
            column_alpha: COLUMN_ALPHA,
            _padding: [0.0; 2],
        }
    }
}
