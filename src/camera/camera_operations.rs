//! Camera operations - Pure DOP functions
//!
//! All functions are pure: they take data, return new data, no side effects.
//! No methods, no self, just transformations.

use super::camera_data::{CameraConfig, CameraData, CameraUniform};
use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3};

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize camera with default settings
pub fn init_camera(position: Point3<f32>, yaw: f32, pitch: f32) -> CameraData {
    CameraData {
        position,
        yaw_radians: yaw,
        pitch_radians: pitch,
        ..Default::default()
    }
}

/// Initialize camera from config
pub fn init_camera_from_config(config: &CameraConfig) -> CameraData {
    CameraData {
        position: config.initial_position,
        yaw_radians: config.initial_yaw,
        pitch_radians: config.initial_pitch,
        fov_radians: config.fov_degrees.to_radians(),
        aspect_ratio: config.aspect_ratio,
        near_plane: config.near_plane,
        far_plane: config.far_plane,
    }
}

// ============================================================================
// VIEW/PROJECTION MATRICES
// ============================================================================

/// Build view matrix from camera data
pub fn build_view_matrix(camera: &CameraData) -> Matrix4<f32> {
    let forward = calculate_forward_vector(camera.yaw_radians, camera.pitch_radians);
    let target = camera.position + forward;
    let up = Vector3::new(0.0, 1.0, 0.0);

    Matrix4::look_at_rh(camera.position, target, up)
}

/// Build projection matrix from camera data
pub fn build_projection_matrix(camera: &CameraData) -> Matrix4<f32> {
    cgmath::perspective(
        Rad(camera.fov_radians),
        camera.aspect_ratio,
        camera.near_plane,
        camera.far_plane,
    )
}

/// Build camera uniform for GPU
pub fn build_camera_uniform(camera: &CameraData) -> CameraUniform {
    let view_matrix = build_view_matrix(camera);
    let projection_matrix = build_projection_matrix(camera);
    let view_projection = projection_matrix * view_matrix;

    CameraUniform {
        view_matrix: view_matrix.into(),
        projection_matrix: projection_matrix.into(),
        view_projection_matrix: view_projection.into(),
        camera_position: [
            camera.position.x,
            camera.position.y,
            camera.position.z,
            1.0,
        ],
        planes: [camera.near_plane, camera.far_plane, 0.0, 0.0],
    }
}

// ============================================================================
// UPDATES
// ============================================================================

/// Update aspect ratio (e.g., on window resize)
pub fn update_aspect_ratio(camera: &CameraData, width: u32, height: u32) -> CameraData {
    let mut new_camera = *camera;
    new_camera.aspect_ratio = width as f32 / height.max(1) as f32;
    new_camera
}

/// Rotate camera by yaw/pitch deltas (radians)
pub fn rotate(camera: &CameraData, yaw_delta: f32, pitch_delta: f32) -> CameraData {
    let mut new_camera = *camera;
    new_camera.yaw_radians += yaw_delta;
    new_camera.pitch_radians += pitch_delta;

    // Clamp pitch to avoid gimbal lock
    const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;
    new_camera.pitch_radians = new_camera.pitch_radians.clamp(-PITCH_LIMIT, PITCH_LIMIT);

    new_camera
}

// ============================================================================
// REFLECTION MIRRORING
// ============================================================================

/// Mirror the camera vertically about a horizontal plane at `plane_height`.
///
/// Used by the reflection pass: the mirrored camera looks at the scene from
/// under the water so the captured image reads as a reflection when sampled
/// from above. Yaw is unchanged; position and pitch flip about the plane.
pub fn mirror_about_plane(camera: &CameraData, plane_height: f32) -> CameraData {
    let mut mirrored = *camera;
    mirrored.position.y = 2.0 * plane_height - camera.position.y;
    mirrored.pitch_radians = -camera.pitch_radians;
    mirrored
}

/// Run `f` against the camera mirrored about `plane_height`, restoring the
/// exact prior camera state afterwards regardless of what `f` does.
pub fn with_mirrored_camera<R>(
    camera: &mut CameraData,
    plane_height: f32,
    f: impl FnOnce(&CameraData) -> R,
) -> R {
    let saved = *camera;
    *camera = mirror_about_plane(&saved, plane_height);
    let result = f(camera);
    *camera = saved;
    result
}

// ============================================================================
// UTILITIES
// ============================================================================

/// Calculate forward vector from yaw and pitch
pub fn calculate_forward_vector(yaw: f32, pitch: f32) -> Vector3<f32> {
    Vector3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}

/// Calculate right vector from yaw
pub fn calculate_right_vector(yaw: f32) -> Vector3<f32> {
    Vector3::new(
        (yaw - std::f32::consts::FRAC_PI_2).cos(),
        0.0,
        (yaw - std::f32::consts::FRAC_PI_2).sin(),
    )
    .normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_camera() -> CameraData {
        CameraData {
            position: Point3::new(3.0, 7.5, -2.0),
            yaw_radians: 0.4,
            pitch_radians: -0.3,
            ..Default::default()
        }
    }

    #[test]
    fn test_mirror_flips_position_and_pitch() {
        let camera = sample_camera();
        let mirrored = mirror_about_plane(&camera, 4.5);

        assert!((mirrored.position.y - 1.5).abs() < 1e-6);
        assert!((mirrored.pitch_radians + camera.pitch_radians).abs() < 1e-6);
        assert_eq!(mirrored.yaw_radians, camera.yaw_radians);
        assert_eq!(mirrored.position.x, camera.position.x);
        assert_eq!(mirrored.position.z, camera.position.z);
    }

    #[test]
    fn test_mirror_is_an_involution() {
        let camera = sample_camera();
        let twice = mirror_about_plane(&mirror_about_plane(&camera, 4.5), 4.5);
        assert_eq!(twice, camera);
    }

    #[test]
    fn test_with_mirrored_camera_restores_state() {
        let mut camera = sample_camera();
        let saved = camera;

        with_mirrored_camera(&mut camera, 4.5, |mirrored| {
            assert!((mirrored.position.y - 1.5).abs() < 1e-6);
        });

        assert_eq!(camera, saved);
    }

    #[test]
    fn test_with_mirrored_camera_restores_for_many_states() {
        for (y, pitch) in [(0.0, 0.0), (4.5, 1.2), (-8.0, -1.5), (100.0, 0.01)] {
            let mut camera = sample_camera();
            camera.position.y = y;
            camera.pitch_radians = pitch;
            let saved = camera;
            with_mirrored_camera(&mut camera, 4.5, |_| {});
            assert_eq!(camera, saved);
        }
    }

    #[test]
    fn test_uniform_view_projection_is_composed() {
        let camera = sample_camera();
        let uniform = build_camera_uniform(&camera);
        let expected: [[f32; 4]; 4] =
            (build_projection_matrix(&camera) * build_view_matrix(&camera)).into();
        assert_eq!(uniform.view_projection_matrix, expected);
        assert_eq!(uniform.planes[0], camera.near_plane);
        assert_eq!(uniform.planes[1], camera.far_plane);
    }

    #[test]
    fn test_forward_vector_is_unit_length() {
        let forward = calculate_forward_vector(1.2, 0.7);
        assert!((forward.magnitude() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_clamps_pitch() {
        let camera = sample_camera();
        let rotated = rotate(&camera, 0.0, 10.0);
        assert!(rotated.pitch_radians < std::f32::consts::FRAC_PI_2);
    }
}
