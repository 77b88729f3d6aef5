//! Texture loading collaborator.
//!
//! Loads image files into sampled textures. A failed load is not an error:
//! it logs and yields a 1x1 sentinel so rendering degrades visually instead
//! of aborting.

use image::GenericImageView;
use std::path::Path;

/// A sampled 2D texture with its view and sampler.
pub struct TextureHandle {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,

    /// True when the file could not be loaded and this is the placeholder
    pub is_sentinel: bool,
}

/// Load a texture from disk.
///
/// Channel counts map as 1 -> `R8Unorm`, 3/4 -> `Rgba8UnormSrgb`
/// (three-channel data is expanded; wgpu has no 24-bit format). Failures
/// log and return the sentinel.
pub fn load_texture(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path) -> TextureHandle {
    let img = match image::open(path) {
        Ok(img) => img,
        Err(error) => {
            log::error!(
                "[texture::load_texture] Failed to load {}: {}",
                path.display(),
                error
            );
            return sentinel_texture(device, queue);
        }
    };

    let (width, height) = img.dimensions();
    let (format, bytes_per_pixel, data): (wgpu::TextureFormat, u32, Vec<u8>) = match img.color() {
        image::ColorType::L8 => (wgpu::TextureFormat::R8Unorm, 1, img.into_luma8().into_raw()),
        _ => (
            wgpu::TextureFormat::Rgba8UnormSrgb,
            4,
            img.into_rgba8().into_raw(),
        ),
    };

    log::debug!(
        "[texture::load_texture] Loaded {} ({}x{}, {:?})",
        path.display(),
        width,
        height,
        format
    );
    upload_pixels(device, queue, width, height, format, bytes_per_pixel, &data, false)
}

/// 1x1 magenta placeholder used when a load fails.
fn sentinel_texture(device: &wgpu::Device, queue: &wgpu::Queue) -> TextureHandle {
    upload_pixels(
        device,
        queue,
        1,
        1,
        wgpu::TextureFormat::Rgba8UnormSrgb,
        4,
        &[255, 0, 255, 255],
        true,
    )
}

#[allow(clippy::too_many_arguments)]
fn upload_pixels(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    bytes_per_pixel: u32,
    data: &[u8],
    is_sentinel: bool,
) -> TextureHandle {
    let extent = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: None,
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(bytes_per_pixel * width),
            rows_per_image: Some(height),
        },
        extent,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: None,
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });

    TextureHandle {
        texture,
        view,
        sampler,
        is_sentinel,
    }
}
