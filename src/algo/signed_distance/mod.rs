//! Signed distance from arbitrary points to a closed surface.
//!
//! [`SignedDistanceBase`] is an octree over the triangles' bounding boxes.
//! [`SignedDistanceQuery`] finds the nearest triangle by branch and bound,
//! then decides inside or outside with one of the [`SignPolicy`] rules.
//! Negative distances are inside.
//!
//! ```
//! use sulcus::prelude::*;
//! use nalgebra::Point3;
//!
//! // A tetrahedron with outward-facing triangles
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//! ];
//! let faces = [[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
//! let surface = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let query = surface.signed_distance_query();
//! let inside = query
//!     .signed_distance(&Point3::new(0.1, 0.1, 0.1), SignPolicy::EvenOdd)
//!     .unwrap();
//! assert!(inside < 0.0);
//! ```

mod closest;
mod octree;
mod query;

use std::sync::Arc;
use std::time::Instant;

use nalgebra::{Point3, Vector3};
use tracing::info;

pub use closest::{ClosestPoint, Feature};
pub use query::SignedDistanceQuery;

use crate::mesh::geometry::triangle_normal;
use crate::mesh::{FaceId, Surface, VertexId};
use crate::topology::TopologyBase;
use octree::{Aabb, Octree};

/// How the sign of a distance is decided.
///
/// The ray rules cast a ray from the query point toward +Z and count the
/// triangles it crosses, +1 for a triangle facing down the ray and -1 for one
/// facing up it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignPolicy {
    /// Inside when the ray crosses an odd number of triangles.
    #[default]
    EvenOdd,
    /// Inside when the signed crossing count is negative.
    Negative,
    /// Inside when the signed crossing count is not zero.
    NonZero,
    /// Inside when the query point is behind the normal of the nearest
    /// feature (face normal, summed normals of an edge's two triangles, or
    /// summed normals around a vertex).
    Normals,
}

/// Octree construction tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct OctreeOptions {
    /// Leaf size at which a split is first considered.
    pub split_threshold: usize,
    /// After the threshold, a split is reconsidered every this many insertions.
    pub split_test_interval: usize,
    /// A split is rejected if the children would hold more than this many
    /// times the leaf's triangle count.
    pub max_duplication: f32,
    /// Leaves at this depth never split.
    pub max_depth: usize,
}

impl Default for OctreeOptions {
    fn default() -> Self {
        Self {
            split_threshold: 50,
            split_test_interval: 50,
            max_duplication: 3.0,
            max_depth: 24,
        }
    }
}

impl OctreeOptions {
    /// Set the split threshold.
    pub fn with_split_threshold(mut self, threshold: usize) -> Self {
        self.split_threshold = threshold;
        self
    }

    /// Set the split test interval.
    pub fn with_split_test_interval(mut self, interval: usize) -> Self {
        self.split_test_interval = interval;
        self
    }

    /// Set the duplication limit.
    pub fn with_max_duplication(mut self, factor: f32) -> Self {
        self.max_duplication = factor;
        self
    }

    /// Set the depth cap.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Immutable spatial index of a surface's triangles.
#[derive(Debug)]
pub struct SignedDistanceBase {
    coords: Vec<Point3<f32>>,
    triangles: Vec<[VertexId; 3]>,
    /// Unit normals, zero for degenerate triangles.
    normals: Vec<Vector3<f32>>,
    topology: Arc<TopologyBase>,
    octree: Octree,
}

impl SignedDistanceBase {
    /// Build the octree for `surface`.
    pub fn new(surface: &Surface, options: &OctreeOptions) -> Self {
        let start = Instant::now();
        let coords = surface.coordinates().to_vec();
        let triangles = surface.triangles().to_vec();

        let boxes: Vec<Aabb> = triangles
            .iter()
            .map(|t| Aabb::around(&t.map(|v| coords[v.index()])))
            .collect();
        let normals = triangles
            .iter()
            .map(|t| {
                let [a, b, c] = t.map(|v| coords[v.index()]);
                triangle_normal(&a, &b, &c).unwrap_or_else(Vector3::zeros)
            })
            .collect();
        let bounds = match surface.bounding_box() {
            Some((min, max)) => Aabb::new(min, max),
            None => Aabb::new(Point3::origin(), Point3::origin()),
        };
        let octree = Octree::build(bounds, &boxes, options);

        info!(
            triangles = triangles.len(),
            nodes = octree.num_nodes(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "built signed distance index"
        );
        Self {
            coords,
            triangles,
            normals,
            topology: surface.topology(),
            octree,
        }
    }

    /// Number of triangles indexed.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Number of octree nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.octree.num_nodes()
    }

    /// Number of octree leaves.
    pub fn num_leaves(&self) -> usize {
        self.octree.num_leaves()
    }

    #[inline]
    fn corners(&self, f: FaceId) -> ([VertexId; 3], [Point3<f32>; 3]) {
        let ids = self.triangles[f.index()];
        (ids, ids.map(|v| self.coords[v.index()]))
    }
}

/// Interpolation weights of the surface point closest to a query point.
///
/// One pair for a vertex, two for an edge, three for a face. Weights are
/// non-negative and sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct BarycentricWeights {
    pairs: Vec<(VertexId, f32)>,
}

impl BarycentricWeights {
    /// The `(vertex, weight)` pairs.
    #[inline]
    pub fn pairs(&self) -> &[(VertexId, f32)] {
        &self.pairs
    }

    /// Number of pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Always false for weights produced by a query.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Weight of `v`, zero if it does not take part.
    pub fn weight_of(&self, v: VertexId) -> f32 {
        self.pairs
            .iter()
            .filter(|(u, _)| *u == v)
            .map(|(_, w)| w)
            .sum()
    }

    /// Interpolate per-vertex `values` at the closest point.
    pub fn interpolate(&self, values: &[f32]) -> f32 {
        self.pairs.iter().map(|(v, w)| values[v.index()] * w).sum()
    }
}
