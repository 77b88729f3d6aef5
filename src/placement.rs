//! Deterministic surface scatter.
//!
//! One generic rejection sampler replaces the original's copy-pasted
//! "scatter points above the water line" loops for grass, trees and lamps:
//! callers supply the count and an acceptance predicate (typically
//! `terrain.height_at(x, z) > water_height`) and get reproducible XZ
//! positions back.

use cgmath::Point2;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Axis-aligned XZ rectangle to scatter over.
#[derive(Debug, Clone, Copy)]
pub struct ScatterRegion {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl ScatterRegion {
    /// Square region centered on the origin, matching the default tile.
    pub fn centered(half_extent: f32) -> Self {
        Self {
            min_x: -half_extent,
            max_x: half_extent,
            min_z: -half_extent,
            max_z: half_extent,
        }
    }
}

/// Attempts per requested point before giving up on a hostile predicate.
const MAX_ATTEMPT_FACTOR: usize = 32;

/// Rejection-sample up to `count` positions satisfying `accept`.
///
/// Deterministic for a given `(region, count, seed, predicate)`. If the
/// predicate rejects nearly everywhere the result may fall short of
/// `count`; the shortfall is logged, never an error.
pub fn scatter_points<F>(
    region: ScatterRegion,
    count: usize,
    seed: u64,
    mut accept: F,
) -> Vec<Point2<f32>>
where
    F: FnMut(f32, f32) -> bool,
{
    let mut rng = StdRng::seed_from_u64(seed);
    let x_range = Uniform::new_inclusive(region.min_x, region.max_x);
    let z_range = Uniform::new_inclusive(region.min_z, region.max_z);

    let mut points = Vec::with_capacity(count);
    let mut attempts = 0;
    let max_attempts = count.saturating_mul(MAX_ATTEMPT_FACTOR);

    while points.len() < count && attempts < max_attempts {
        attempts += 1;
        let x = x_range.sample(&mut rng);
        let z = z_range.sample(&mut rng);
        if accept(x, z) {
            points.push(Point2::new(x, z));
        }
    }

    if points.len() < count {
        log::warn!(
            "[placement::scatter_points] Placed {}/{} points after {} attempts",
            points.len(),
            count,
            attempts
        );
    }

    points
}
