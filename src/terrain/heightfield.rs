//! Fractal heightfield synthesis.
//!
//! Classic diamond-square midpoint displacement on a `(N+1) x (N+1)` grid,
//! `N` a power of two. Generation is deterministic for a given
//! `(size, smoothness, seed)` triple; reproducibility is a contract here,
//! not a convenience, because height/normal queries and every LOD mesh
//! resample the same field.

use crate::error::{EngineError, EngineResult};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Square elevation grid with `size + 1` samples per edge.
///
/// Raw values sit around `[-1, 1]` before the corner displacements
/// accumulate; scaling to world height is the mesh builder's job.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    size: usize,
    samples: Vec<f32>,
}

impl HeightField {
    /// Generate a fractal field. `size` must be a power of two.
    pub fn generate(size: usize, smoothness: f32, seed: u64) -> EngineResult<HeightField> {
        if size == 0 || !size.is_power_of_two() {
            return Err(EngineError::InvalidConfig {
                field: "size".to_string(),
                value: size.to_string(),
                reason: "heightfield size must be a power of two".to_string(),
            });
        }

        let grid = size + 1;
        let mut samples = vec![0.0f32; grid * grid];
        let mut rng = StdRng::seed_from_u64(seed);
        let unit = Uniform::new_inclusive(-1.0f32, 1.0f32);

        // Corners are seeded independently and never overwritten.
        samples[0] = unit.sample(&mut rng);
        samples[size] = unit.sample(&mut rng);
        samples[size * grid] = unit.sample(&mut rng);
        samples[size * grid + size] = unit.sample(&mut rng);

        let depths = size.trailing_zeros();
        for depth in 1..=depths {
            let step = size >> (depth - 1);
            let half = step / 2;

            // Diamond step: every cell center from its four corners.
            for z in (0..size).step_by(step) {
                for x in (0..size).step_by(step) {
                    let avg = (samples[z * grid + x]
                        + samples[z * grid + x + step]
                        + samples[(z + step) * grid + x]
                        + samples[(z + step) * grid + x + step])
                        * 0.25;
                    samples[(z + half) * grid + x + half] =
                        avg + displacement(smoothness, depth, &unit, &mut rng);
                }
            }

            // Square step: edge midpoints from whichever orthogonal
            // neighbors exist. Grid edges average fewer samples; there is
            // no wraparound.
            for z in (0..=size).step_by(half) {
                let first = (z + half) % step;
                for x in (first..=size).step_by(step) {
                    let mut sum = 0.0f32;
                    let mut count = 0u32;
                    if x >= half {
                        sum += samples[z * grid + x - half];
                        count += 1;
                    }
                    if x + half <= size {
                        sum += samples[z * grid + x + half];
                        count += 1;
                    }
                    if z >= half {
                        sum += samples[(z - half) * grid + x];
                        count += 1;
                    }
                    if z + half <= size {
                        sum += samples[(z + half) * grid + x];
                        count += 1;
                    }
                    // Access pattern guarantees at least two in-grid
                    // neighbors even in the corners.
                    debug_assert!(count >= 2, "square step at ({}, {}) found {} neighbors", x, z, count);
                    samples[z * grid + x] =
                        sum / count as f32 + displacement(smoothness, depth, &unit, &mut rng);
                }
            }
        }

        Ok(HeightField { size, samples })
    }

    /// Edge length minus one (the power-of-two `N`).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Samples per edge (`N + 1`).
    pub fn grid_size(&self) -> usize {
        self.size + 1
    }

    /// Raw sample at grid indices, `x` and `z` in `[0, N]`.
    pub fn sample(&self, x: usize, z: usize) -> f32 {
        let grid = self.size + 1;
        self.samples[z.min(self.size) * grid + x.min(self.size)]
    }

    /// Bilinear interpolation at fractional grid coordinates, clamped to
    /// the grid. Out-of-range input reads the nearest edge.
    pub fn bilinear(&self, fx: f32, fz: f32) -> f32 {
        let max = self.size as f32;
        let fx = fx.clamp(0.0, max);
        let fz = fz.clamp(0.0, max);

        let x0 = fx.floor() as usize;
        let z0 = fz.floor() as usize;
        let x1 = (x0 + 1).min(self.size);
        let z1 = (z0 + 1).min(self.size);
        let tx = fx - x0 as f32;
        let tz = fz - z0 as f32;

        let h00 = self.sample(x0, z0);
        let h10 = self.sample(x1, z0);
        let h01 = self.sample(x0, z1);
        let h11 = self.sample(x1, z1);

        let bottom = h00 + (h10 - h00) * tx;
        let top = h01 + (h11 - h01) * tx;
        bottom + (top - bottom) * tz
    }
}

fn displacement(smoothness: f32, depth: u32, unit: &Uniform<f32>, rng: &mut StdRng) -> f32 {
    let sign = if unit.sample(rng) > 0.0 { 1.0 } else { -1.0 };
    let reduce = 2.0f32.powf(-smoothness * depth as f32);
    sign * unit.sample(rng).abs() * reduce
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let a = HeightField::generate(64, 1.0, 1337).expect("generate");
        let b = HeightField::generate(64, 1.0, 1337).expect("generate");
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = HeightField::generate(64, 1.0, 1337).expect("generate");
        let b = HeightField::generate(64, 1.0, 7331).expect("generate");
        assert_ne!(a, b);
    }

    #[test]
    fn test_grid_shape() {
        for size in [2usize, 4, 16, 64, 256] {
            let field = HeightField::generate(size, 1.0, 42).expect("generate");
            assert_eq!(field.grid_size(), size + 1);
            assert_eq!(field.samples.len(), (size + 1) * (size + 1));
        }
    }

    #[test]
    fn test_corners_stay_in_unit_range() {
        let field = HeightField::generate(128, 1.0, 9).expect("generate");
        let n = field.size();
        for (x, z) in [(0, 0), (n, 0), (0, n), (n, n)] {
            let corner = field.sample(x, z);
            assert!((-1.0..=1.0).contains(&corner), "corner ({}, {}) = {}", x, z, corner);
        }
    }

    #[test]
    fn test_all_samples_finite() {
        let field = HeightField::generate(64, 0.8, 5).expect("generate");
        assert!(field.samples.iter().all(|h| h.is_finite()));
    }

    #[test]
    fn test_non_power_of_two_rejected() {
        for size in [0usize, 3, 12, 65, 100] {
            assert!(
                HeightField::generate(size, 1.0, 1).is_err(),
                "size {} should be rejected",
                size
            );
        }
    }

    #[test]
    fn test_bilinear_matches_nodes_exactly() {
        let field = HeightField::generate(32, 1.0, 11).expect("generate");
        for z in 0..=32 {
            for x in 0..=32 {
                let direct = field.sample(x, z);
                let interpolated = field.bilinear(x as f32, z as f32);
                assert!((direct - interpolated).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_bilinear_midpoint_is_average() {
        let field = HeightField::generate(16, 1.0, 23).expect("generate");
        let mid = field.bilinear(3.5, 8.0);
        let expected = (field.sample(3, 8) + field.sample(4, 8)) * 0.5;
        assert!((mid - expected).abs() < 1e-4);
    }

    #[test]
    fn test_bilinear_clamps_out_of_range() {
        let field = HeightField::generate(16, 1.0, 23).expect("generate");
        assert_eq!(field.bilinear(-5.0, -5.0), field.sample(0, 0));
        assert_eq!(field.bilinear(99.0, 99.0), field.sample(16, 16));
    }
}
