//! Terrain tile data types.

use super::heightfield::HeightField;
use super::mesh::MeshData;
use crate::renderer::GpuMesh;
use cgmath::Point3;

/// One precomputed detail tier of a tile.
///
/// Built once at terrain construction, never mutated. `gpu` is `None`
/// until the terrain is uploaded to a device.
pub struct TileLod {
    pub mesh: MeshData,
    pub resolution: usize,

    /// Bounding-sphere center used for camera distance computation
    pub center: Point3<f32>,
    pub radius: f32,

    pub gpu: Option<GpuMesh>,
}

/// A terrain patch: one heightfield plus its LOD family, finest first.
///
/// `origin` is the minimum-X/minimum-Z world corner at the water-plane Y
/// offset; every query function is defined against this corner.
pub struct Tile {
    pub origin: Point3<f32>,
    pub heightfield: HeightField,
    pub lods: Vec<TileLod>,
}

impl Tile {
    /// True when the world XZ point falls inside this tile's footprint.
    pub fn contains(&self, x: f32, z: f32, world_scale: f32) -> bool {
        x >= self.origin.x
            && x <= self.origin.x + world_scale
            && z >= self.origin.z
            && z <= self.origin.z + world_scale
    }
}
