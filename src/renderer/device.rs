//! GPU device acquisition.

use crate::error::{EngineError, EngineResult, OptionExt};

/// Request an adapter and device without a surface.
///
/// Consumers that present to a window create their own surface-compatible
/// device; this helper covers off-screen use.
pub fn create_headless_device() -> EngineResult<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::default();
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        force_fallback_adapter: false,
        compatible_surface: None,
    }))
    .ok_or_engine(|| EngineError::DeviceRequestFailed("no compatible adapter".to_string()))?;

    let info = adapter.get_info();
    log::info!(
        "[device::create_headless_device] Using adapter '{}' ({:?})",
        info.name,
        info.backend
    );

    let (device, queue) = pollster::block_on(adapter.request_device(
        &wgpu::DeviceDescriptor {
            label: Some("mere device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
        },
        None,
    ))
    .map_err(|e| EngineError::DeviceRequestFailed(e.to_string()))?;

    Ok((device, queue))
}
