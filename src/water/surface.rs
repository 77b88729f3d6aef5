//! Water surface resources.
//!
//! Owns the reflection/refraction render targets, the quad, the composite
//! pipeline and its bindings. Pass orchestration lives in `passes.rs`.

use crate::camera::{build_projection_matrix, build_view_matrix};
use crate::config::WaterConfig;
use crate::error::EngineResult;
use crate::renderer::{load_texture, upload_mesh, GpuMesh, OffscreenTarget, DEPTH_FORMAT};
use crate::scene::SceneState;
use std::path::Path;

/// Ripple scroll speed in dudv-texture widths per second.
const RIPPLE_SPEED: f32 = 0.03;

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct WaterVertex {
    position: [f32; 3],
    uv: [f32; 2],
}

impl WaterVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<WaterVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Shader-side uniform block. Must match `water.wgsl` exactly.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct WaterUniform {
    view_matrix: [[f32; 4]; 4],
    projection_matrix: [[f32; 4]; 4],
    eye_point: [f32; 4],
    light_position: [f32; 4],
    light_color: [f32; 4],
    /// x = ripple offset, y = water plane height, z = near, w = far
    params: [f32; 4],
}

pub struct WaterSurface {
    pub(crate) reflection: OffscreenTarget,
    pub(crate) refraction: OffscreenTarget,
    pub(crate) quad: GpuMesh,
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) uniform_bind_group: wgpu::BindGroup,
    pub(crate) texture_bind_group: wgpu::BindGroup,
    pub(crate) water_height: f32,
}

impl WaterSurface {
    /// Create render targets, quad, pipeline and bindings.
    ///
    /// Render-target validation failures are fatal; dudv/normal-map load
    /// failures degrade to sentinels.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        config: &WaterConfig,
        surface_format: wgpu::TextureFormat,
        dudv_path: &Path,
        normal_map_path: &Path,
    ) -> EngineResult<WaterSurface> {
        config.validate()?;

        let resolution = config.render_target_resolution;
        let reflection = OffscreenTarget::new(device, "water reflection", resolution, false)?;
        let refraction = OffscreenTarget::new(device, "water refraction", resolution, true)?;

        let dudv = load_texture(device, queue, dudv_path);
        let normal_map = load_texture(device, queue, normal_map_path);

        let quad = build_quad(device, config.half_extent);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("water shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/water.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("water uniforms"),
            size: std::mem::size_of::<WaterUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("water uniform layout"),
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

        // Fixed binding slots: reflection, refraction, refraction depth,
        // dudv, normal map, then the two samplers.
        let color_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("water texture layout"),
            entries: &[
                color_entry(0),
                color_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                color_entry(3),
                color_entry(4),
                wgpu::BindGroupLayoutEntry {
                    binding: 5,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 6,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
                    count: None,
                },
            ],
        });

        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("water linear sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let depth_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("water depth sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("water uniform bind group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("water texture bind group"),
            layout: &texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&reflection.color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&refraction.color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&refraction.depth_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&dudv.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::TextureView(&normal_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: wgpu::BindingResource::Sampler(&linear_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 6,
                    resource: wgpu::BindingResource::Sampler(&depth_sampler),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("water pipeline layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        // The surface neither writes depth nor occludes: depth test reads
        // the opaque scene's buffer, alpha-over blends on top of it.
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("water pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[WaterVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        log::info!(
            "[WaterSurface::new] Targets {0}x{0}, quad half extent {1}, plane y = {2}",
            resolution,
            config.half_extent,
            config.water_plane_height
        );

        Ok(WaterSurface {
            reflection,
            refraction,
            quad,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            texture_bind_group,
            water_height: config.water_plane_height,
        })
    }

    pub fn water_height(&self) -> f32 {
        self.water_height
    }

    pub fn reflection_view(&self) -> &wgpu::TextureView {
        &self.reflection.color_view
    }

    pub fn refraction_view(&self) -> &wgpu::TextureView {
        &self.refraction.color_view
    }

    pub(crate) fn write_uniforms(&self, queue: &wgpu::Queue, scene: &SceneState) {
        let camera = &scene.camera;
        let uniform = WaterUniform {
            view_matrix: build_view_matrix(camera).into(),
            projection_matrix: build_projection_matrix(camera).into(),
            eye_point: [camera.position.x, camera.position.y, camera.position.z, 1.0],
            light_position: [
                scene.light.position.x,
                scene.light.position.y,
                scene.light.position.z,
                1.0,
            ],
            light_color: [
                scene.light.color.x,
                scene.light.color.y,
                scene.light.color.z,
                1.0,
            ],
            params: [
                (scene.elapsed_seconds * RIPPLE_SPEED).fract(),
                self.water_height,
                camera.near_plane,
                camera.far_plane,
            ],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }
}

/// Two-triangle quad at y = 0; the shader lifts it to the water plane.
fn build_quad(device: &wgpu::Device, half_extent: f32) -> GpuMesh {
    let s = half_extent;
    let vertices = [
        WaterVertex { position: [-s, 0.0, -s], uv: [0.0, 0.0] },
        WaterVertex { position: [s, 0.0, -s], uv: [1.0, 0.0] },
        WaterVertex { position: [-s, 0.0, s], uv: [0.0, 1.0] },
        WaterVertex { position: [s, 0.0, -s], uv: [1.0, 0.0] },
        WaterVertex { position: [s, 0.0, s], uv: [1.0, 1.0] },
        WaterVertex { position: [-s, 0.0, s], uv: [0.0, 1.0] },
    ];
    upload_mesh(device, "water quad", &vertices, &[0, 1, 2, 3, 4, 5])
}
