//! mere-engine: procedural landscape rendering.
//!
//! An explorable 3D landscape: a fractal terrain surface with
//! distance-adaptive detail, and a water surface that reflects and
//! refracts the scene around it.
//!
//! The crate is a pure library. Windowing, input and the terrain's own
//! shading are the caller's: the terrain manager draws into whatever
//! render pass (and pipeline) it is handed, and the water compositor
//! captures its reflection/refraction passes through a caller-supplied
//! scene draw callback.

// Core engine modules
pub mod config;
pub mod error;

// Essential systems
pub mod camera;
pub mod placement;
pub mod renderer;
pub mod scene;
pub mod terrain;
pub mod water;

pub use camera::{CameraConfig, CameraData, CameraUniform};
pub use config::{EngineConfig, TerrainConfig, WaterConfig};
pub use error::{EngineError, EngineResult, ErrorContext, OptionExt};
pub use placement::{scatter_points, ScatterRegion};
pub use renderer::{
    create_headless_device, load_texture, upload_mesh, GpuMesh, OffscreenTarget, TextureHandle,
    COLOR_FORMAT, DEPTH_FORMAT,
};
pub use scene::{ClipPlane, LightState, SceneState};
pub use terrain::{
    build_tile_mesh, select_level, HeightField, LodTerrain, MeshData, RiverCarver, TerrainVertex,
    Tile, TileLod,
};
pub use water::{SceneDraw, WaterSurface};

// Re-export wgpu so callers share the exact GPU types the engine uses
pub use wgpu;

/// Initialize env_logger once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env().try_init();
}
