use color_eyre::{Result, eyre::WrapErr};
use image::{DynamicImage, GenericImageView, imageops::FilterType};
use wgpu::{Sampler, TextureView};

/// Decoded RGBA8 pixels, ready to be uploaded to the GPU.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl TextureData {
    /// Used while no texture is loaded or after loading one failed.
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            data: vec![255; 4],
        }
    }

    pub fn from_image(img: DynamicImage) -> Self {
        let (width, height) = img.dimensions();

        Self {
            width,
            height,
            data: img.to_rgba8().into_raw(),
        }
    }

    /// Decodes an encoded image, scaling it down (keeping the aspect ratio)
    /// when either side exceeds `max_dimension`.
    pub fn decode(bytes: &[u8], max_dimension: u32) -> Result<Self> {
        let img = image::load_from_memory(bytes).wrap_err("Unable to decode texture image")?;
        let (width, height) = img.dimensions();

        let img = if width > max_dimension || height > max_dimension {
            log::info!(
                "Texture of size {width}x{height} exceeds {max_dimension}, scaling it down"
            );
            img.resize(max_dimension, max_dimension, FilterType::Triangle)
        } else {
            img
        };

        Ok(Self::from_image(img))
    }
}

pub struct Texture {
    view: TextureView,
    sampler: Sampler,
}

impl Texture {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
    /// Samples per pixel of every render target the scene is drawn into.
    pub const SAMPLE_COUNT: u32 = 4;

    pub fn get_view(&self) -> &TextureView {
        &self.view
    }

    pub fn get_sampler(&self) -> &Sampler {
        &self.sampler
    }

    pub fn create_depth_texture(
        device: &wgpu::Device,
        (width, height): (u32, u32),
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: Self::SAMPLE_COUNT,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        };
        let texture = device.create_texture(&desc);

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self { view, sampler }
    }

    /// Multisampled colour target that is resolved into the surface texture.
    pub fn create_multisampled_framebuffer(
        device: &wgpu::Device,
        (width, height): (u32, u32),
        format: wgpu::TextureFormat,
        label: &str,
    ) -> TextureView {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: Self::SAMPLE_COUNT,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Equirectangular surface texture of the globe.
    pub fn create_surface_texture(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture_data: &TextureData,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: texture_data.width,
            height: texture_data.height,
            depth_or_array_layers: 1,
        };
        let format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &texture_data.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * texture_data.width),
                rows_per_image: Some(texture_data.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(format),
            ..Default::default()
        });
        // Anisotropic filtering requires every filter to be linear
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            anisotropy_clamp: 16,
            ..Default::default()
        });

        Self { view, sampler }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgba, RgbaImage};

    use super::*;

    fn encode_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut bytes = Cursor::new(vec![]);
        img.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn decodes_png_into_rgba() {
        let texture = TextureData::decode(&encode_png(4, 2), 8192).unwrap();

        assert_eq!((texture.width, texture.height), (4, 2));
        assert_eq!(texture.data.len(), 4 * 2 * 4);
        assert_eq!(&texture.data[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn oversized_images_keep_their_aspect_ratio() {
        let texture = TextureData::decode(&encode_png(8, 4), 4).unwrap();

        assert_eq!((texture.width, texture.height), (4, 2));
        assert_eq!(texture.data.len(), 4 * 2 * 4);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(TextureData::decode(b"definitely not an image", 8192).is_err());
    }
}
