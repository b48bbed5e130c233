use super::texture::Texture;

/// Filterable textures with their samplers, bound pairwise as
/// `(texture, sampler)` at bindings `(2 * i, 2 * i + 1)`.
pub struct BoundTextureView {
    bind_group: wgpu::BindGroup,
}

impl BoundTextureView {
    pub fn get_bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn create_layout(device: &wgpu::Device, texture_count: u32) -> wgpu::BindGroupLayout {
        let layout_entries = (0..texture_count)
            .flat_map(|i| {
                [
                    wgpu::BindGroupLayoutEntry {
                        binding: 2 * i,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2 * i + 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ]
            })
            .collect::<Vec<_>>();

        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: layout_entries.as_slice(),
            label: Some("texture bind group layout"),
        })
    }

    /// Binds `textures` against a layout shared with the pipeline, so the
    /// textures can be swapped without rebuilding it.
    pub fn create_with_layout(
        device: &wgpu::Device,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
        textures: &[Texture],
    ) -> BoundTextureView {
        let bind_entries = textures
            .iter()
            .enumerate()
            .flat_map(|(i, texture)| {
                let i = i as u32;
                [
                    wgpu::BindGroupEntry {
                        binding: 2 * i,
                        resource: wgpu::BindingResource::TextureView(texture.get_view()),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2 * i + 1,
                        resource: wgpu::BindingResource::Sampler(texture.get_sampler()),
                    },
                ]
            })
            .collect::<Vec<_>>();

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: texture_bind_group_layout,
            entries: bind_entries.as_slice(),
            label: Some("texture bind group"),
        });

        BoundTextureView { bind_group }
    }
}
