//! Shared GPU plumbing: device acquisition, mesh upload, off-screen
//! targets and the texture loading collaborator.

pub mod device;
pub mod mesh;
pub mod target;
pub mod texture;

pub use device::create_headless_device;
pub use mesh::{upload_mesh, GpuMesh};
pub use target::{OffscreenTarget, COLOR_FORMAT, DEPTH_FORMAT};
pub use texture::{load_texture, TextureHandle};
