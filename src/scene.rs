//! Per-frame scene state.
//!
//! The original tool kept the camera, light and placement arrays in
//! process-wide globals. Here one `SceneState` value is owned by the render
//! loop and passed by reference through the draw-callback chain, so every
//! mutation (notably the reflection pass's camera mirroring) has a single
//! visible owner.

use crate::camera::CameraData;
use cgmath::{InnerSpace, Point3, Vector3};

/// Directional point light feeding the water shader
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightState {
    pub position: Point3<f32>,
    pub color: Vector3<f32>,
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 120.0, 0.0),
            color: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Everything the draw callbacks may read, and the only thing the water
/// compositor may (transiently) write.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SceneState {
    pub camera: CameraData,
    pub light: LightState,

    /// Seconds since startup, drives the ripple animation
    pub elapsed_seconds: f32,
}

/// Half-space fragment clip, handed to the scene draw callback.
///
/// The callback's own shader is expected to discard fragments with
/// `dot(normal, position) + distance < 0`; this component never touches
/// fragment state itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlane {
    pub normal: Vector3<f32>,
    pub distance: f32,
}

impl ClipPlane {
    /// Keep fragments above `height` (reflection capture).
    pub fn above(height: f32) -> Self {
        Self {
            normal: Vector3::new(0.0, 1.0, 0.0),
            distance: -height,
        }
    }

    /// Keep fragments below `height` (refraction capture).
    pub fn below(height: f32) -> Self {
        Self {
            normal: Vector3::new(0.0, -1.0, 0.0),
            distance: height,
        }
    }

    /// Signed distance of a world-space point to the kept half-space.
    pub fn signed_distance(&self, point: Point3<f32>) -> f32 {
        self.normal.dot(Vector3::new(point.x, point.y, point.z)) + self.distance
    }

    /// Plane equation packed for a shader uniform.
    pub fn to_array(self) -> [f32; 4] {
        [self.normal.x, self.normal.y, self.normal.z, self.distance]
    }
}
