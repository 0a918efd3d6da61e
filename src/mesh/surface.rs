//! Triangulated surface with lazily built query indices.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use super::cache::SurfaceCaches;
use super::geometry;
use super::index::{FaceId, VertexId};
use crate::error::{MeshError, Result};

/// A read-only triangulated surface.
///
/// Coordinates and triangles are fixed at construction (see
/// [`build_from_triangles`](super::build_from_triangles)). The surface also
/// owns the cached topology, geodesic and signed-distance indices built from
/// it, plus pools of query objects that reference them; see
/// [`Surface::geodesic_query`] and friends.
pub struct Surface {
    pub(super) coords: Vec<Point3<f32>>,
    pub(super) triangles: Vec<[VertexId; 3]>,
    pub(super) caches: SurfaceCaches,
}

impl Surface {
    pub(super) fn from_parts(coords: Vec<Point3<f32>>, triangles: Vec<[VertexId; 3]>) -> Self {
        Self {
            coords,
            triangles,
            caches: SurfaceCaches::default(),
        }
    }

    // ==================== Accessors ====================

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.coords.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Position of a vertex.
    #[inline]
    pub fn coordinate(&self, v: VertexId) -> &Point3<f32> {
        &self.coords[v.index()]
    }

    /// All vertex positions.
    #[inline]
    pub fn coordinates(&self) -> &[Point3<f32>] {
        &self.coords
    }

    /// The three vertices of a triangle, in winding order.
    #[inline]
    pub fn triangle(&self, f: FaceId) -> [VertexId; 3] {
        self.triangles[f.index()]
    }

    /// All triangles.
    #[inline]
    pub fn triangles(&self) -> &[[VertexId; 3]] {
        &self.triangles
    }

    /// Positions of the three vertices of a triangle.
    #[inline]
    pub fn triangle_positions(&self, f: FaceId) -> [Point3<f32>; 3] {
        let [a, b, c] = self.triangle(f);
        [self.coords[a.index()], self.coords[b.index()], self.coords[c.index()]]
    }

    /// Iterate over all vertex ids.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.num_vertices()).map(VertexId::new)
    }

    /// Iterate over all triangle ids.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> {
        (0..self.num_triangles()).map(FaceId::new)
    }

    pub(crate) fn check_vertex(&self, v: VertexId) -> Result<()> {
        if v.index() < self.num_vertices() {
            Ok(())
        } else {
            Err(MeshError::VertexOutOfRange {
                vertex: v.index(),
                num_vertices: self.num_vertices(),
            })
        }
    }

    // ==================== Geometry ====================

    /// Unit normal of a triangle, `None` if it has zero area.
    pub fn triangle_normal(&self, f: FaceId) -> Option<Vector3<f32>> {
        let [a, b, c] = self.triangle_positions(f);
        geometry::triangle_normal(&a, &b, &c)
    }

    /// Area of a triangle.
    pub fn triangle_area(&self, f: FaceId) -> f32 {
        let [a, b, c] = self.triangle_positions(f);
        geometry::triangle_area(&a, &b, &c)
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f32 {
        self.face_ids().map(|f| self.triangle_area(f)).sum()
    }

    /// Per-vertex area: one third of the area of every incident triangle.
    pub fn vertex_areas(&self) -> Vec<f32> {
        let mut areas = vec![0.0f32; self.num_vertices()];
        for f in self.face_ids() {
            let third = self.triangle_area(f) / 3.0;
            for v in self.triangle(f) {
                areas[v.index()] += third;
            }
        }
        areas
    }

    /// Per-vertex unit normals.
    ///
    /// Each vertex normal is the normalized sum of the unit normals of its
    /// non-degenerate incident triangles. Vertices with no such triangle get
    /// the zero vector.
    pub fn vertex_normals(&self) -> Vec<Vector3<f32>> {
        let face_normals: Vec<Option<Vector3<f32>>> = (0..self.num_triangles())
            .into_par_iter()
            .map(|f| self.triangle_normal(FaceId::new(f)))
            .collect();
        let topology = self.topology();

        (0..self.num_vertices())
            .into_par_iter()
            .map(|v| {
                let sum: Vector3<f32> = topology
                    .tiles(VertexId::new(v))
                    .iter()
                    .filter_map(|f| face_normals[f.index()])
                    .sum();
                let len = sum.norm();
                if len > 0.0 {
                    sum / len
                } else {
                    Vector3::zeros()
                }
            })
            .collect()
    }

    /// Axis-aligned bounding box, `None` for a surface without vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = self.coords.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in &self.coords {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Some((min, max))
    }

    // ==================== Mutation ====================

    /// Replace the vertex coordinates, keeping the triangles.
    ///
    /// All cached indices are dropped. Query objects that were already handed
    /// out keep working against the index they were created with.
    pub fn set_coordinates(&mut self, coords: Vec<Point3<f32>>) -> Result<()> {
        MeshError::check_length("coordinates", self.num_vertices(), coords.len())?;
        self.coords = coords;
        self.invalidate_caches();
        Ok(())
    }
}

impl Clone for Surface {
    /// Clones the geometry; the clone starts with empty caches.
    fn clone(&self) -> Self {
        Self::from_parts(self.coords.clone(), self.triangles.clone())
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("num_vertices", &self.num_vertices())
            .field("num_triangles", &self.num_triangles())
            .finish_non_exhaustive()
    }
}
