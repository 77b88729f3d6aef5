//! Procedural terrain: heightfield synthesis, tile meshes, LOD management.

pub mod heightfield;
pub mod manager;
pub mod mesh;
pub mod rivers;
pub mod tile;

pub use heightfield::HeightField;
pub use manager::{select_level, LodTerrain};
pub use mesh::{build_tile_mesh, MeshData, TerrainVertex};
pub use rivers::RiverCarver;
pub use tile::{Tile, TileLod};
