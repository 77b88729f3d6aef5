//! Tile mesh construction.
//!
//! Pure functions that resample a heightfield into drawable vertex/index
//! data. No GPU types here beyond the vertex layout descriptor; upload
//! happens in `renderer::mesh` so every property of the produced meshes is
//! testable without a device.

use super::heightfield::HeightField;
use super::rivers::RiverCarver;
use cgmath::{InnerSpace, Point3, Vector3};

/// The one canonical terrain vertex.
///
/// Every builder and the river carve operate on this type directly; there
/// is no second layout-compatible struct to cast between.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

impl TerrainVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TerrainVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// CPU-side mesh data, ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<TerrainVertex>,
    pub indices: Vec<u32>,
}

/// Resample `field` at `resolution x resolution` points into a tile mesh.
///
/// Grid points map to the nearest heightfield index by rounding, so coarser
/// levels sample index subsets of the same field rather than interpolating
/// new heights. The optional river carve runs after positions and before
/// normals, so carved banks shade correctly.
pub fn build_tile_mesh(
    field: &HeightField,
    origin: Point3<f32>,
    world_scale: f32,
    height_scale: f32,
    resolution: usize,
    carver: Option<&RiverCarver>,
) -> MeshData {
    let resolution = resolution.max(2);
    let n = field.size();
    let step = world_scale / (resolution - 1) as f32;

    let mut vertices = Vec::with_capacity(resolution * resolution);
    for z in 0..resolution {
        for x in 0..resolution {
            let u = x as f32 / (resolution - 1) as f32;
            let v = z as f32 / (resolution - 1) as f32;
            let i = ((u * n as f32).round() as usize).min(n);
            let j = ((v * n as f32).round() as usize).min(n);

            let world_x = origin.x + x as f32 * step;
            let world_z = origin.z + z as f32 * step;
            let height = field.sample(i, j) * height_scale;

            vertices.push(TerrainVertex {
                position: [world_x, height + origin.y, world_z],
                uv: [u, v],
                normal: [0.0, 0.0, 0.0],
            });
        }
    }

    if let Some(carver) = carver {
        carver.carve(&mut vertices);
    }

    compute_normals(&mut vertices, resolution, step);

    MeshData {
        vertices,
        indices: build_indices(resolution),
    }
}

/// Central-difference normals over the vertex grid. Edge vertices clamp
/// the neighbor index instead of wrapping.
fn compute_normals(vertices: &mut [TerrainVertex], resolution: usize, step: f32) {
    let heights: Vec<f32> = vertices.iter().map(|v| v.position[1]).collect();
    let last = (resolution - 1) as isize;
    let sample = |x: isize, z: isize| -> f32 {
        let xi = x.clamp(0, last) as usize;
        let zi = z.clamp(0, last) as usize;
        heights[zi * resolution + xi]
    };

    for z in 0..resolution as isize {
        for x in 0..resolution as isize {
            let left = sample(x - 1, z);
            let right = sample(x + 1, z);
            let down = sample(x, z - 1);
            let up = sample(x, z + 1);

            let tangent = Vector3::new(2.0 * step, right - left, 0.0);
            let bitangent = Vector3::new(0.0, up - down, 2.0 * step);
            let normal = tangent.cross(bitangent).normalize();

            vertices[(z * resolution as isize + x) as usize].normal = normal.into();
        }
    }
}

/// Two triangles per quad, winding `(tl, bl, tr), (tr, bl, br)`.
fn build_indices(resolution: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity((resolution - 1) * (resolution - 1) * 6);
    for z in 0..resolution - 1 {
        for x in 0..resolution - 1 {
            let tl = (z * resolution + x) as u32;
            let tr = tl + 1;
            let bl = ((z + 1) * resolution + x) as u32;
            let br = bl + 1;
            indices.extend_from_slice(&[tl, bl, tr, tr, bl, br]);
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_field() -> HeightField {
        HeightField::generate(32, 1.0, 77).expect("generate")
    }

    fn flat_origin() -> Point3<f32> {
        Point3::new(-50.0, 4.5, -50.0)
    }

    #[test]
    fn test_mesh_sizing() {
        let field = test_field();
        for resolution in [2usize, 8, 17, 32] {
            let mesh = build_tile_mesh(&field, flat_origin(), 100.0, 8.0, resolution, None);
            assert_eq!(mesh.vertices.len(), resolution * resolution);
            assert_eq!(mesh.indices.len(), (resolution - 1) * (resolution - 1) * 6);
        }
    }

    #[test]
    fn test_resolution_below_two_is_clamped() {
        let field = test_field();
        let mesh = build_tile_mesh(&field, flat_origin(), 100.0, 8.0, 1, None);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
    }

    #[test]
    fn test_first_quad_winding() {
        let field = test_field();
        let resolution = 4;
        let mesh = build_tile_mesh(&field, flat_origin(), 100.0, 8.0, resolution, None);
        let r = resolution as u32;
        assert_eq!(&mesh.indices[..6], &[0, r, 1, 1, r, r + 1]);
    }

    #[test]
    fn test_uv_spans_unit_square() {
        let field = test_field();
        let resolution = 8;
        let mesh = build_tile_mesh(&field, flat_origin(), 100.0, 8.0, resolution, None);
        assert_eq!(mesh.vertices[0].uv, [0.0, 0.0]);
        assert_eq!(mesh.vertices[resolution - 1].uv, [1.0, 0.0]);
        assert_eq!(mesh.vertices[resolution * resolution - 1].uv, [1.0, 1.0]);
    }

    #[test]
    fn test_positions_cover_tile_extent() {
        let field = test_field();
        let origin = flat_origin();
        let scale = 100.0;
        let mesh = build_tile_mesh(&field, origin, scale, 8.0, 16, None);

        let first = mesh.vertices[0].position;
        let last = mesh.vertices[mesh.vertices.len() - 1].position;
        assert!((first[0] - origin.x).abs() < 1e-4);
        assert!((first[2] - origin.z).abs() < 1e-4);
        assert!((last[0] - (origin.x + scale)).abs() < 1e-3);
        assert!((last[2] - (origin.z + scale)).abs() < 1e-3);
    }

    #[test]
    fn test_corner_vertices_sample_field_corners() {
        let field = test_field();
        let origin = flat_origin();
        let height_scale = 8.0;
        let mesh = build_tile_mesh(&field, origin, 100.0, height_scale, 8, None);
        let n = field.size();

        let expected = field.sample(0, 0) * height_scale + origin.y;
        assert!((mesh.vertices[0].position[1] - expected).abs() < 1e-4);

        let expected = field.sample(n, n) * height_scale + origin.y;
        let last = mesh.vertices.last().expect("vertices");
        assert!((last.position[1] - expected).abs() < 1e-4);
    }

    #[test]
    fn test_normals_are_unit_length() {
        let field = test_field();
        let mesh = build_tile_mesh(&field, flat_origin(), 100.0, 8.0, 16, None);
        for vertex in &mesh.vertices {
            let n = Vector3::from(vertex.normal);
            assert!((n.magnitude() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_coarse_level_samples_subset_of_fine_level() {
        // Resolution 17 over a 32-field hits every second index; vertex
        // (0,0) and the shared corners must agree with the full-res mesh.
        let field = test_field();
        let fine = build_tile_mesh(&field, flat_origin(), 100.0, 8.0, 33, None);
        let coarse = build_tile_mesh(&field, flat_origin(), 100.0, 8.0, 17, None);

        let fine_corner = fine.vertices[32].position[1];
        let coarse_corner = coarse.vertices[16].position[1];
        assert!((fine_corner - coarse_corner).abs() < 1e-4);
    }
}
