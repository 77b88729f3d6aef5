//! River channel carving.
//!
//! A low-frequency value-noise fractal picks the channel courses; where its
//! folded magnitude crosses a threshold the terrain is pressed down, with a
//! cellular detail field roughening the banks. Carving only ever lowers a
//! vertex: the bank perturbation is scaled by the same blend factor as the
//! channel depth, so the sum stays non-positive.

use super::mesh::TerrainVertex;
use noise::{Fbm, MultiFractal, NoiseFn, Value, Worley};

const RIVER_FREQUENCY: f64 = 0.0015;
const RIVER_OCTAVES: usize = 4;
const DETAIL_FREQUENCY: f64 = 0.2;

/// Fold factor applied to the raw river noise before masking.
const CHANNEL_FOLD: f32 = 1.5;
/// Sharpening exponent for the channel profile.
const CHANNEL_EXPONENT: i32 = 5;
/// Mask values above this carve; below leave the terrain untouched.
const CHANNEL_THRESHOLD: f32 = 0.25;
/// Bank-roughening amplitude as a fraction of channel depth.
const DETAIL_AMPLITUDE: f32 = 0.1;

pub struct RiverCarver {
    river: Fbm<Value>,
    detail: Worley,
    depth: f32,
}

impl RiverCarver {
    /// `depth` is the maximum channel depth in world units.
    pub fn new(seed: u32, depth: f32) -> Self {
        Self {
            river: Fbm::<Value>::new(seed)
                .set_octaves(RIVER_OCTAVES)
                .set_frequency(RIVER_FREQUENCY),
            detail: Worley::new(seed.wrapping_add(1)).set_frequency(DETAIL_FREQUENCY),
            depth,
        }
    }

    /// Channel mask at world XZ. Values in `(CHANNEL_THRESHOLD, 1]` carve.
    pub fn channel_mask(&self, x: f32, z: f32) -> f32 {
        let noise = self.river.get([x as f64, z as f64]) as f32;
        (1.0 - (noise * CHANNEL_FOLD).abs()).powi(CHANNEL_EXPONENT)
    }

    /// Lower vertices along river channels. Positions only; normals are
    /// recomputed by the mesh builder afterwards.
    pub fn carve(&self, vertices: &mut [TerrainVertex]) {
        for vertex in vertices {
            let [x, y, z] = vertex.position;
            let mask = self.channel_mask(x, z);
            if mask <= CHANNEL_THRESHOLD {
                continue;
            }

            let blend = (mask - CHANNEL_THRESHOLD) / (1.0 - CHANNEL_THRESHOLD);
            let detail = self.detail.get([(x * 3.0) as f64, (z * 3.0) as f64]) as f32;
            let carved = y - self.depth * blend + self.depth * DETAIL_AMPLITUDE * detail * blend;

            // Bank detail is bounded by DETAIL_AMPLITUDE < 1, so the carve
            // cannot raise the vertex.
            debug_assert!(carved <= y + 1e-5);
            vertex.position[1] = carved.min(y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::heightfield::HeightField;
    use crate::terrain::mesh::build_tile_mesh;
    use cgmath::Point3;

    fn uncarved_mesh() -> Vec<TerrainVertex> {
        let field = HeightField::generate(64, 1.0, 1337).expect("generate");
        build_tile_mesh(
            &field,
            Point3::new(-500.0, 4.5, -500.0),
            1000.0,
            8.0,
            64,
            None,
        )
        .vertices
    }

    #[test]
    fn test_carve_never_raises_a_vertex() {
        let original = uncarved_mesh();
        let mut carved = original.clone();
        RiverCarver::new(1337, 8.0 * 1.2).carve(&mut carved);

        for (before, after) in original.iter().zip(&carved) {
            assert!(
                after.position[1] <= before.position[1] + 1e-6,
                "carve raised a vertex at {:?}",
                before.position
            );
        }
    }

    #[test]
    fn test_carve_actually_lowers_something() {
        // A kilometer-wide tile crosses several channel courses at the
        // default river frequency.
        let original = uncarved_mesh();
        let mut carved = original.clone();
        RiverCarver::new(1337, 8.0 * 1.2).carve(&mut carved);

        let lowered = original
            .iter()
            .zip(&carved)
            .filter(|(b, a)| a.position[1] < b.position[1] - 1e-6)
            .count();
        assert!(lowered > 0, "no vertex was carved");
    }

    #[test]
    fn test_carve_is_deterministic() {
        let mut a = uncarved_mesh();
        let mut b = a.clone();
        RiverCarver::new(42, 9.6).carve(&mut a);
        RiverCarver::new(42, 9.6).carve(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_channel_mask_is_bounded_above() {
        let carver = RiverCarver::new(7, 9.6);
        for i in 0..200 {
            let x = i as f32 * 13.7 - 1000.0;
            let z = i as f32 * 7.3 - 500.0;
            assert!(carver.channel_mask(x, z) <= 1.0 + 1e-6);
        }
    }
}
