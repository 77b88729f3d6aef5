//! Construction-time configuration.
//!
//! Everything the terrain and water systems accept at startup lives here.
//! Invalid combinations are rejected before any GPU resource is created.

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Terrain construction options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Heightfield edge length, must be a power of two
    pub tile_base_resolution: usize,

    /// Number of precomputed detail tiers, finest first
    pub lod_levels: usize,

    /// Tile edge length in world units
    pub world_scale: f32,

    /// Vertical exaggeration applied to raw fractal values
    pub height_scale: f32,

    /// Fractal amplitude-decay exponent (higher = smoother)
    pub smoothness: f32,

    /// Seed for the heightfield and the river noise fields
    pub seed: u64,

    /// Whether river channels are carved into the tile meshes
    pub carve_rivers: bool,

    /// River channel depth as a multiple of `height_scale`
    pub river_depth_factor: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            tile_base_resolution: 128,
            lod_levels: 4,
            world_scale: 100.0,
            height_scale: 8.0,
            smoothness: 1.0,
            seed: 1337,
            carve_rivers: true,
            river_depth_factor: 1.2,
        }
    }
}

impl TerrainConfig {
    /// Reject configurations the terrain builder cannot honor.
    pub fn validate(&self) -> EngineResult<()> {
        if self.tile_base_resolution < 2 || !self.tile_base_resolution.is_power_of_two() {
            return Err(EngineError::InvalidConfig {
                field: "tile_base_resolution".to_string(),
                value: self.tile_base_resolution.to_string(),
                reason: "must be a power of two >= 2".to_string(),
            });
        }
        if self.lod_levels == 0 {
            return Err(EngineError::InvalidConfig {
                field: "lod_levels".to_string(),
                value: self.lod_levels.to_string(),
                reason: "at least one detail tier is required".to_string(),
            });
        }
        if !(self.world_scale > 0.0) {
            return Err(EngineError::InvalidConfig {
                field: "world_scale".to_string(),
                value: self.world_scale.to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if !self.height_scale.is_finite() || !self.smoothness.is_finite() {
            return Err(EngineError::InvalidConfig {
                field: "height_scale/smoothness".to_string(),
                value: format!("{}/{}", self.height_scale, self.smoothness),
                reason: "must be finite".to_string(),
            });
        }
        Ok(())
    }
}

/// Water surface construction options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    /// World-space Y of the water plane
    pub water_plane_height: f32,

    /// Edge length of the square reflection/refraction targets, in pixels
    pub render_target_resolution: u32,

    /// Half edge length of the water quad in world units
    pub half_extent: f32,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            water_plane_height: 4.5,
            render_target_resolution: 1024,
            half_extent: 50.0,
        }
    }
}

impl WaterConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.render_target_resolution == 0 {
            return Err(EngineError::InvalidConfig {
                field: "render_target_resolution".to_string(),
                value: "0".to_string(),
                reason: "render targets need at least one pixel".to_string(),
            });
        }
        if !(self.half_extent > 0.0) {
            return Err(EngineError::InvalidConfig {
                field: "half_extent".to_string(),
                value: self.half_extent.to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub terrain: TerrainConfig,
    pub water: WaterConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> EngineResult<()> {
        self.terrain.validate()?;
        self.water.validate()
    }

    /// Load and validate a configuration from a TOML file.
    pub fn from_toml_path(path: &Path) -> EngineResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::Io {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        let config: EngineConfig = toml::from_str(&text).map_err(|e| EngineError::Parse {
            context: path.display().to_string(),
            error: e.to_string(),
        })?;
        config.validate()?;
        log::info!(
            "[EngineConfig::from_toml_path] Loaded {} (base resolution {}, {} LOD levels)",
            path.display(),
            config.terrain.tile_base_resolution,
            config.terrain.lod_levels
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_non_power_of_two_resolution_rejected() {
        let config = TerrainConfig {
            tile_base_resolution: 100,
            ..Default::default()
        };
        let err = config.validate().expect_err("100 is not a power of two");
        assert!(matches!(err, EngineError::InvalidConfig { .. }));
    }

    #[test]
    fn test_zero_lod_levels_rejected() {
        let config = TerrainConfig {
            lod_levels: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolution_of_one_rejected() {
        let config = TerrainConfig {
            tile_base_resolution: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_path_round_trip() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "[terrain]\ntile_base_resolution = 64\nlod_levels = 3\n\n[water]\nwater_plane_height = 2.0"
        )
        .expect("write config");

        let config = EngineConfig::from_toml_path(file.path()).expect("load config");
        assert_eq!(config.terrain.tile_base_resolution, 64);
        assert_eq!(config.terrain.lod_levels, 3);
        // Unspecified fields fall back to defaults.
        assert_eq!(config.water.render_target_resolution, 1024);
        assert!((config.water.water_plane_height - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_from_toml_path_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[terrain]\ntile_base_resolution = 12").expect("write config");
        assert!(EngineConfig::from_toml_path(file.path()).is_err());
    }
}
