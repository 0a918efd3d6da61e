//! Geodesic distances over the edge graph of a surface.
//!
//! Distances are shortest paths along mesh edges, optionally "smoothed" by
//! also allowing shortcut edges that cross a shared edge of two triangles in
//! a straight line once the triangles are unfolded flat. Shortcuts bring the
//! graph distance much closer to the true surface distance at no extra cost
//! per query.
//!
//! [`GeodesicBase`] holds the immutable graph; [`GeodesicQuery`] holds the
//! scratch buffers of one search at a time. Get both from the surface:
//!
//! ```
//! use sulcus::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let surface = build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap();
//!
//! let query = surface.geodesic_query();
//! let result = query.distances_from_source(VertexId::new(1), true).unwrap();
//! // The shortcut across the diagonal is the straight line
//! assert!((result.distance(VertexId::new(3)) - 2.0f32.sqrt()).abs() < 1e-6);
//! ```

mod all_pairs;
mod base;
mod query;
mod search;

pub use all_pairs::DistanceMatrix;
pub use base::{Crossing, GeodesicBase};
pub use query::{DataFollowOptions, GeodesicQuery, GuideLine};

use crate::mesh::VertexId;

/// Distances from a source to every vertex.
#[derive(Debug, Clone)]
pub struct GeodesicResult {
    /// `f32::INFINITY` for unreachable vertices.
    distances: Vec<f32>,
    /// `None` for the source and for unreachable vertices.
    parents: Vec<Option<VertexId>>,
}

impl GeodesicResult {
    pub(crate) fn new(distances: Vec<f32>, parents: Vec<Option<VertexId>>) -> Self {
        Self { distances, parents }
    }

    /// Distance to `v`, `f32::INFINITY` if it is unreachable.
    #[inline]
    pub fn distance(&self, v: VertexId) -> f32 {
        self.distances[v.index()]
    }

    /// All distances, indexed by vertex.
    #[inline]
    pub fn distances(&self) -> &[f32] {
        &self.distances
    }

    /// Predecessor of `v` on its shortest path.
    #[inline]
    pub fn parent(&self, v: VertexId) -> Option<VertexId> {
        self.parents[v.index()]
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// True for a surface without vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// The vertex with the largest finite distance.
    pub fn farthest_vertex(&self) -> Option<(VertexId, f32)> {
        self.distances
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_finite())
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, &d)| (VertexId::new(i), d))
    }

    /// Shortest path from the source to `target`, both included.
    ///
    /// Returns `None` if `target` is unreachable.
    pub fn path_to(&self, target: VertexId) -> Option<Vec<VertexId>> {
        if !self.distances[target.index()].is_finite() {
            return None;
        }

        let mut path = vec![target];
        let mut current = target;
        while let Some(parent) = self.parents[current.index()] {
            path.push(parent);
            current = parent;
            if path.len() > self.distances.len() {
                return None;
            }
        }

        path.reverse();
        Some(path)
    }

    /// True if `v` is reachable from the source.
    #[inline]
    pub fn is_reachable(&self, v: VertexId) -> bool {
        self.distances[v.index()].is_finite()
    }

    /// Number of reachable vertices, the source included.
    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|d| d.is_finite()).count()
    }

    /// Iterate over all vertices with their distances.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, f32)> + '_ {
        self.distances
            .iter()
            .enumerate()
            .map(|(i, &d)| (VertexId::new(i), d))
    }

    /// Iterate over reachable vertices only.
    pub fn reachable_iter(&self) -> impl Iterator<Item = (VertexId, f32)> + '_ {
        self.iter().filter(|(_, d)| d.is_finite())
    }
}

/// Vertices found by a distance-limited search, nearest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neighborhood {
    /// Vertices within the radius, the source first.
    pub vertices: Vec<VertexId>,
    /// Distance of each vertex.
    pub distances: Vec<f32>,
    /// Predecessor of each vertex on its path, `None` for the source.
    pub parents: Vec<Option<VertexId>>,
}

impl Neighborhood {
    /// Number of vertices found.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True if nothing was found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate over `(vertex, distance)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, f32)> + '_ {
        self.vertices.iter().copied().zip(self.distances.iter().copied())
    }
}

/// A path through the graph with the cumulative distance at each vertex.
///
/// An empty path means no path exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeodesicPath {
    /// Vertices from start to end.
    pub vertices: Vec<VertexId>,
    /// Cost from the start to each vertex.
    pub distances: Vec<f32>,
}

impl GeodesicPath {
    /// True when no path was found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of vertices on the path.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Total cost, `None` for an empty path.
    pub fn length(&self) -> Option<f32> {
        self.distances.last().copied()
    }

    /// First vertex.
    pub fn start(&self) -> Option<VertexId> {
        self.vertices.first().copied()
    }

    /// Last vertex.
    pub fn end(&self) -> Option<VertexId> {
        self.vertices.last().copied()
    }
}
