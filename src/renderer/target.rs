//! Off-screen render targets.
//!
//! A target is a color texture plus a depth attachment, both sized once at
//! construction. Creation runs inside a wgpu validation error scope; any
//! validation error surfaces as a fatal `RenderTargetIncomplete`.

use crate::error::{EngineError, EngineResult};

pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub struct OffscreenTarget {
    pub color: wgpu::Texture,
    pub color_view: wgpu::TextureView,
    pub depth: wgpu::Texture,
    pub depth_view: wgpu::TextureView,
    pub size: u32,
}

impl OffscreenTarget {
    /// Create a square color+depth target.
    ///
    /// With `sample_depth` the depth texture also gets `TEXTURE_BINDING`
    /// usage so a later pass can read it (the refraction target's depth
    /// feeds the water shader's shoreline tint); without it the depth
    /// attachment is render-only.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        size: u32,
        sample_depth: bool,
    ) -> EngineResult<Self> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let extent = wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        };

        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{} color", label)),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let depth_usage = if sample_depth {
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING
        } else {
            wgpu::TextureUsages::RENDER_ATTACHMENT
        };
        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{} depth", label)),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: depth_usage,
            view_formats: &[],
        });

        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(EngineError::RenderTargetIncomplete {
                label: label.to_string(),
                error: error.to_string(),
            });
        }

        log::debug!("[OffscreenTarget::new] '{}' created at {}x{}", label, size, size);

        Ok(Self {
            color,
            color_view,
            depth,
            depth_view,
            size,
        })
    }
}
