//! Camera Module - Data-Oriented Programming (DOP) style
//!
//! - camera_data.rs: Pure data structures with NO methods
//! - camera_operations.rs: Pure functions that operate on data

pub mod camera_data;
pub mod camera_operations;

// Re-export data structures
pub use camera_data::{CameraConfig, CameraData, CameraUniform};

// Re-export all operations
pub use camera_operations::{
    // Initialization
    init_camera,
    init_camera_from_config,

    // View/projection
    build_view_matrix,
    build_projection_matrix,
    build_camera_uniform,

    // Updates
    update_aspect_ratio,
    rotate,

    // Reflection mirroring
    mirror_about_plane,
    with_mirrored_camera,

    // Utilities
    calculate_forward_vector,
    calculate_right_vector,
};
