//! Water pass orchestration.
//!
//! Three passes run strictly in order every frame: mirrored reflection
//! capture, clipped refraction capture, then the composite draw over the
//! already-rendered opaque scene. Only `render_frame` is public, so the
//! pass order cannot be interleaved with other GPU state changes.

use super::surface::WaterSurface;
use crate::camera::{with_mirrored_camera, CameraData};
use crate::scene::{ClipPlane, SceneState};

/// Clear color for the off-screen captures (dark sky tone).
const CAPTURE_CLEAR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.08,
    b: 0.12,
    a: 1.0,
};

/// External scene renderer invoked during the capture passes.
///
/// Implementors draw the terrain and any other opaque geometry from the
/// given camera, honoring the clip plane in their own shaders (this
/// component never touches fragment state). The lifetime on the receiver
/// lets implementors bind resources they own into the pass.
pub trait SceneDraw {
    fn draw_scene<'p>(
        &'p self,
        pass: &mut wgpu::RenderPass<'p>,
        camera: &CameraData,
        clip_plane: ClipPlane,
    );
}

impl WaterSurface {
    /// Run the full per-frame water sequence.
    ///
    /// `target_view`/`depth_view` are the frame's main attachments, with
    /// the opaque scene already drawn into them; the composite blends the
    /// water quad on top without writing depth.
    pub fn render_frame(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        target_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        scene: &mut SceneState,
        scene_draw: &impl SceneDraw,
    ) {
        self.render_reflection(encoder, scene, scene_draw);
        self.render_refraction(encoder, scene, scene_draw);
        self.composite(encoder, queue, target_view, depth_view, scene);
    }

    /// Capture the scene mirrored about the water plane. The camera in
    /// `scene` is mirrored for the duration of the callback and restored
    /// to its exact prior state afterwards.
    fn render_reflection(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        scene: &mut SceneState,
        scene_draw: &impl SceneDraw,
    ) {
        let water_height = self.water_height;
        with_mirrored_camera(&mut scene.camera, water_height, |mirrored| {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("water reflection pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.reflection.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CAPTURE_CLEAR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.reflection.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            scene_draw.draw_scene(&mut pass, mirrored, ClipPlane::above(water_height));
        });
    }

    /// Capture the underwater scene from the unmirrored camera.
    fn render_refraction(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        scene: &SceneState,
        scene_draw: &impl SceneDraw,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("water refraction pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.refraction.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CAPTURE_CLEAR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.refraction.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        scene_draw.draw_scene(
            &mut pass,
            &scene.camera,
            ClipPlane::below(self.water_height),
        );
    }

    /// Blend the water quad over the main target using both captures.
    fn composite(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        target_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        scene: &SceneState,
    ) {
        self.write_uniforms(queue, scene);

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("water composite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_bind_group(1, &self.texture_bind_group, &[]);
        pass.set_vertex_buffer(0, self.quad.vertex_buffer.slice(..));
        pass.set_index_buffer(self.quad.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.quad.index_count, 0, 0..1);
    }
}
