//! Surface construction from raw vertex and triangle arrays.

use nalgebra::Point3;
use tracing::debug;

use super::index::VertexId;
use super::surface::Surface;
use crate::error::{MeshError, Result};

/// Build a surface from vertex positions and triangle index triples.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangles, each as `[v0, v1, v2]` indices with
///   counter-clockwise winding seen from outside
///
/// # Returns
/// The surface, or an error if a triangle references a missing vertex or
/// repeats a vertex. Vertices that no triangle uses are allowed.
///
/// # Example
/// ```
/// use sulcus::mesh::build_from_triangles;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let surface = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(surface.num_vertices(), 3);
/// assert_eq!(surface.num_triangles(), 1);
/// ```
pub fn build_from_triangles(vertices: &[Point3<f32>], faces: &[[usize; 3]]) -> Result<Surface> {
    let triangles = validate_triangles(vertices.len(), faces)?;
    debug!(
        vertices = vertices.len(),
        triangles = triangles.len(),
        "built surface"
    );
    Ok(Surface::from_parts(vertices.to_vec(), triangles))
}

/// Check triangle indices against the vertex count and convert them to ids.
pub(crate) fn validate_triangles(
    num_vertices: usize,
    faces: &[[usize; 3]],
) -> Result<Vec<[VertexId; 3]>> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    if num_vertices >= u32::MAX as usize {
        return Err(MeshError::invalid_param(
            "num_vertices",
            num_vertices,
            "too many vertices for 32-bit indices",
        ));
    }

    faces
        .iter()
        .enumerate()
        .map(|(fi, face)| {
            if let Some(&vi) = face.iter().find(|&&vi| vi >= num_vertices) {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
            if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
                return Err(MeshError::DegenerateFace { face: fi });
            }
            Ok(face.map(VertexId::new))
        })
        .collect()
}
