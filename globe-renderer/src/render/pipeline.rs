use super::{
    bound_texture_view::BoundTextureView,
    data::{ColumnVertex, GlobeVertex, MarkerInstance, Uniforms},
    texture::Texture,
};

pub struct Pipeline {
    pipeline: wgpu::RenderPipeline,
    uniforms: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
}

impl Pipeline {
    pub fn get_pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn get_uniforms(&self) -> &wgpu::Buffer {
        &self.uniforms
    }

    pub fn get_uniform_bind_group(&self) -> &wgpu::BindGroup {
        &self.uniform_bind_group
    }

    /// Every scene pipeline renders into the same multisampled targets.
    fn multisample_state() -> wgpu::MultisampleState {
        wgpu::MultisampleState {
            count: Texture::SAMPLE_COUNT,
            mask: !0,
            alpha_to_coverage_enabled: false,
        }
    }

    fn create_uniforms(
        device: &wgpu::Device,
        label: &str,
    ) -> (wgpu::Buffer, wgpu::BindGroupLayout, wgpu::BindGroup) {
        let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("uniform bind group layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform bind group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });

        (uniforms, uniform_bind_group_layout, uniform_bind_group)
    }

    /// Translucent columns: additive blending, visible from both sides and
    /// depth tested against the globe without writing depth themselves.
    pub fn create_column_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let (uniforms, uniform_bind_group_layout, uniform_bind_group) =
            Self::create_uniforms(device, "column uniform buffer");

        let column_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Column Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                immediate_size: 0,
            });

        let column_shader = device.create_shader_module(wgpu::include_wgsl!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../resources/shaders/column_shader.wgsl"
        )));

        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };

        let column_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Column Pipeline"),
            layout: Some(&column_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &column_shader,
                entry_point: Some("vs_main"),
                buffers: &[ColumnVertex::desc(), MarkerInstance::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Texture::DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: Pipeline::multisample_state(),
            fragment: Some(wgpu::FragmentState {
                module: &column_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState {
                        color: additive,
                        alpha: additive,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline: column_pipeline,
            uniforms,
            uniform_bind_group,
        }
    }
}

pub struct GlobeRenderPipeline {
    pipeline: Pipeline,
    surface_texture_bind_group_layout: wgpu::BindGroupLayout,
}

impl GlobeRenderPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let (uniforms, uniform_bind_group_layout, uniform_bind_group) =
            Pipeline::create_uniforms(device, "globe uniform buffer");

        let surface_texture_bind_group_layout = BoundTextureView::create_layout(device, 1);

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Globe Pipeline Layout"),
                bind_group_layouts: &[
                    &uniform_bind_group_layout,
                    &surface_texture_bind_group_layout,
                ],
                immediate_size: 0,
            });

        let globe_shader = device.create_shader_module(wgpu::include_wgsl!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../resources/shaders/globe_shader.wgsl"
        )));

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Globe Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &globe_shader,
                entry_point: Some("vs_main"),
                buffers: &[GlobeVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Texture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: Pipeline::multisample_state(),
            fragment: Some(wgpu::FragmentState {
                module: &globe_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let pipeline = Pipeline {
            pipeline: render_pipeline,
            uniforms,
            uniform_bind_group,
        };

        Self {
            pipeline,
            surface_texture_bind_group_layout,
        }
    }

    pub fn get_surface_texture_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.surface_texture_bind_group_layout
    }

    pub fn get_pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipelines_are_antialiased() {
        let multisample = Pipeline::multisample_state();

        assert_eq!(multisample.count, 4);
        assert_eq!(multisample.count, Texture::SAMPLE_COUNT);
        assert!(!multisample.alpha_to_coverage_enabled);
    }
}
