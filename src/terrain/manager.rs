//! Terrain ownership, LOD selection and world-space queries.
//!
//! `LodTerrain` owns the tiles and their precomputed LOD meshes. Mesh
//! construction fans out over rayon at startup and joins before `new`
//! returns, so a partially built LOD can never be selected. Height and
//! normal queries always read the full-resolution heightfield, independent
//! of whichever LOD happens to be drawn.

use super::heightfield::HeightField;
use super::mesh::build_tile_mesh;
use super::rivers::RiverCarver;
use super::tile::{Tile, TileLod};
use crate::config::TerrainConfig;
use crate::error::EngineResult;
use crate::renderer::upload_mesh;
use cgmath::{InnerSpace, MetricSpace, Point3, Vector3};
use rayon::prelude::*;

pub struct LodTerrain {
    config: TerrainConfig,
    tiles: Vec<Tile>,
}

impl LodTerrain {
    /// Build the terrain: heightfield once, then every LOD mesh in
    /// parallel. Blocks until all levels are built.
    pub fn new(config: &TerrainConfig, y_offset: f32) -> EngineResult<Self> {
        config.validate()?;

        let field = HeightField::generate(
            config.tile_base_resolution,
            config.smoothness,
            config.seed,
        )?;

        let half = config.world_scale * 0.5;
        let origin = Point3::new(-half, y_offset, -half);
        let center = Point3::new(origin.x + half, origin.y, origin.z + half);
        let radius = Vector3::new(half, config.height_scale, half).magnitude();

        let build_config = config.clone();
        let lods: Vec<TileLod> = (0..config.lod_levels)
            .into_par_iter()
            .map(|level| {
                let resolution = build_config
                    .tile_base_resolution
                    .checked_shr(level as u32)
                    .unwrap_or(0)
                    .max(2);
                let carver = build_config.carve_rivers.then(|| {
                    RiverCarver::new(
                        build_config.seed as u32,
                        build_config.height_scale * build_config.river_depth_factor,
                    )
                });
                let mesh = build_tile_mesh(
                    &field,
                    origin,
                    build_config.world_scale,
                    build_config.height_scale,
                    resolution,
                    carver.as_ref(),
                );
                TileLod {
                    mesh,
                    resolution,
                    center,
                    radius,
                    gpu: None,
                }
            })
            .collect();

        log::info!(
            "[LodTerrain::new] Built {} LOD levels for a {}x{} heightfield (finest {} vertices)",
            lods.len(),
            field.grid_size(),
            field.grid_size(),
            lods[0].mesh.vertices.len()
        );

        Ok(Self {
            config: config.clone(),
            tiles: vec![Tile {
                origin,
                heightfield: field,
                lods,
            }],
        })
    }

    /// Create vertex/index buffers for every LOD that lacks them.
    pub fn upload(&mut self, device: &wgpu::Device) {
        for (tile_index, tile) in self.tiles.iter_mut().enumerate() {
            for lod in &mut tile.lods {
                if lod.gpu.is_none() {
                    let label = format!("terrain tile {} r{}", tile_index, lod.resolution);
                    lod.gpu = Some(upload_mesh(
                        device,
                        &label,
                        &lod.mesh.vertices,
                        &lod.mesh.indices,
                    ));
                }
            }
        }
    }

    /// Select a LOD per tile by camera distance and draw it. The caller's
    /// terrain pipeline must already be bound on `pass`.
    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, camera_pos: Point3<f32>) {
        for tile in &self.tiles {
            let Some(first) = tile.lods.first() else {
                continue;
            };
            let distance = camera_pos.distance(first.center);
            let level = select_level(distance, self.config.world_scale, tile.lods.len());

            let lod = &tile.lods[level];
            let Some(gpu) = lod.gpu.as_ref() else {
                log::warn!(
                    "[LodTerrain::draw] LOD {} not uploaded, skipping tile at {:?}",
                    level,
                    tile.origin
                );
                continue;
            };
            pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
            pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..gpu.index_count, 0, 0..1);
        }
    }

    /// Terrain height at a world XZ position. Out-of-bounds coordinates
    /// clamp to the nearest tile edge; this never fails.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let tile = self.tile_for(x, z);
        let n = tile.heightfield.size() as f32;
        let fx = (x - tile.origin.x) / self.config.world_scale * n;
        let fz = (z - tile.origin.z) / self.config.world_scale * n;
        tile.heightfield.bilinear(fx, fz) * self.config.height_scale + tile.origin.y
    }

    /// Surface normal at a world XZ position, via central differences of
    /// `height_at` at half a grid cell of world-space epsilon.
    pub fn normal_at(&self, x: f32, z: f32) -> Vector3<f32> {
        let eps = self.config.world_scale / self.config.tile_base_resolution as f32 * 0.5;
        let left = self.height_at(x - eps, z);
        let right = self.height_at(x + eps, z);
        let down = self.height_at(x, z - eps);
        let up = self.height_at(x, z + eps);

        let tangent = Vector3::new(2.0 * eps, right - left, 0.0);
        let bitangent = Vector3::new(0.0, up - down, 2.0 * eps);
        tangent.cross(bitangent).normalize()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    fn tile_for(&self, x: f32, z: f32) -> &Tile {
        self.tiles
            .iter()
            .find(|tile| tile.contains(x, z, self.config.world_scale))
            .unwrap_or(&self.tiles[0])
    }
}

/// Walk LOD levels with a doubling threshold starting at `world_scale`.
///
/// The selected level is monotonically non-decreasing in distance and never
/// exceeds `lod_count - 1`.
pub fn select_level(camera_distance: f32, world_scale: f32, lod_count: usize) -> usize {
    let mut level = 0;
    let mut distance = camera_distance;
    let mut threshold = world_scale;
    while level + 1 < lod_count && distance > threshold {
        distance -= threshold;
        threshold *= 2.0;
        level += 1;
    }
    level
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerrainConfig;

    fn quiet_config(resolution: usize, lod_levels: usize) -> TerrainConfig {
        TerrainConfig {
            tile_base_resolution: resolution,
            lod_levels,
            world_scale: 100.0,
            height_scale: 8.0,
            smoothness: 1.0,
            seed: 1337,
            carve_rivers: false,
            river_depth_factor: 1.2,
        }
    }

    #[test]
    fn test_lod_family_resolutions() {
        let terrain = LodTerrain::new(&quiet_config(128, 4), 4.5).expect("terrain");
        let resolutions: Vec<usize> = terrain.tiles()[0]
            .lods
            .iter()
            .map(|lod| lod.resolution)
            .collect();
        assert_eq!(resolutions, vec![128, 64, 32, 16]);
    }

    #[test]
    fn test_deep_lod_chains_clamp_at_minimum_resolution() {
        let terrain = LodTerrain::new(&quiet_config(16, 6), 0.0).expect("terrain");
        let resolutions: Vec<usize> = terrain.tiles()[0]
            .lods
            .iter()
            .map(|lod| lod.resolution)
            .collect();
        assert_eq!(resolutions, vec![16, 8, 4, 2, 2, 2]);
    }

    #[test]
    fn test_select_level_is_monotonic() {
        let mut previous = 0;
        for step in 0..4000 {
            let distance = step as f32 * 0.5;
            let level = select_level(distance, 100.0, 5);
            assert!(level >= previous, "level regressed at distance {}", distance);
            previous = level;
        }
    }

    #[test]
    fn test_select_level_thresholds() {
        let scale = 100.0;
        assert_eq!(select_level(0.0, scale, 4), 0);
        assert_eq!(select_level(scale, scale, 4), 0);
        assert_eq!(select_level(scale + 0.1, scale, 4), 1);
        // Second boundary sits at scale + 2*scale.
        assert_eq!(select_level(3.0 * scale, scale, 4), 1);
        assert_eq!(select_level(3.0 * scale + 0.1, scale, 4), 2);
    }

    #[test]
    fn test_far_camera_selects_coarsest_level() {
        assert_eq!(select_level(1.0e9, 100.0, 4), 3);
        assert_eq!(select_level(f32::INFINITY, 100.0, 4), 3);
        // A single level never walks anywhere.
        assert_eq!(select_level(1.0e9, 100.0, 1), 0);
    }

    #[test]
    fn test_height_at_grid_nodes() {
        let config = quiet_config(64, 2);
        let terrain = LodTerrain::new(&config, 4.5).expect("terrain");
        let tile = &terrain.tiles()[0];
        let n = tile.heightfield.size();
        let step = config.world_scale / n as f32;

        for (i, j) in [(0usize, 0usize), (13, 40), (32, 32), (64, 64)] {
            let x = tile.origin.x + i as f32 * step;
            let z = tile.origin.z + j as f32 * step;
            let expected =
                tile.heightfield.sample(i, j) * config.height_scale + tile.origin.y;
            let actual = terrain.height_at(x, z);
            assert!(
                (actual - expected).abs() < 1e-4,
                "node ({}, {}): {} vs {}",
                i,
                j,
                actual,
                expected
            );
        }
    }

    #[test]
    fn test_height_at_midpoint_is_linear_average() {
        let config = quiet_config(64, 2);
        let terrain = LodTerrain::new(&config, 4.5).expect("terrain");
        let tile = &terrain.tiles()[0];
        let step = config.world_scale / 64.0;

        let x = tile.origin.x + 10.5 * step;
        let z = tile.origin.z + 20.0 * step;
        let expected = (tile.heightfield.sample(10, 20) + tile.heightfield.sample(11, 20))
            * 0.5
            * config.height_scale
            + tile.origin.y;
        assert!((terrain.height_at(x, z) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_height_at_tile_center_scenario() {
        // size=64, fixed seed: the tile center lands exactly on H[32][32].
        let config = quiet_config(64, 2);
        let terrain = LodTerrain::new(&config, 4.5).expect("terrain");
        let tile = &terrain.tiles()[0];

        let x = tile.origin.x + config.world_scale * 0.5;
        let z = tile.origin.z + config.world_scale * 0.5;
        let expected =
            tile.heightfield.sample(32, 32) * config.height_scale + tile.origin.y;
        assert!((terrain.height_at(x, z) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_height_at_clamps_out_of_bounds() {
        let config = quiet_config(32, 2);
        let terrain = LodTerrain::new(&config, 4.5).expect("terrain");
        let tile = &terrain.tiles()[0];

        let corner =
            tile.heightfield.sample(0, 0) * config.height_scale + tile.origin.y;
        let far_outside = terrain.height_at(tile.origin.x - 1.0e4, tile.origin.z - 1.0e4);
        assert!((far_outside - corner).abs() < 1e-4);
    }

    #[test]
    fn test_normal_at_is_unit_length() {
        let terrain = LodTerrain::new(&quiet_config(64, 2), 4.5).expect("terrain");
        for (x, z) in [(0.0, 0.0), (-30.0, 12.0), (49.0, -49.0)] {
            let normal = terrain.normal_at(x, z);
            assert!((normal.magnitude() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_queries_ignore_river_carving() {
        // Queries read the heightfield, not the carved meshes.
        let mut config = quiet_config(64, 2);
        let plain = LodTerrain::new(&config, 4.5).expect("terrain");
        config.carve_rivers = true;
        let carved = LodTerrain::new(&config, 4.5).expect("terrain");

        assert_eq!(plain.height_at(10.0, -20.0), carved.height_at(10.0, -20.0));
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let mut config = quiet_config(64, 2);
        config.tile_base_resolution = 100;
        assert!(LodTerrain::new(&config, 4.5).is_err());
    }
}
