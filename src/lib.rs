//! # Sulcus
//!
//! Geometry queries on triangulated surfaces: adjacency, geodesic distance,
//! signed distance and geodesic Gaussian smoothing of per-vertex data.
//!
//! A [`Surface`](mesh::Surface) is immutable once built. The indices the
//! queries need are built on first use and cached on the surface, and query
//! objects holding scratch buffers are pooled so that repeated and concurrent
//! queries do not reallocate.
//!
//! ## Features
//!
//! - **Topology**: O(1) neighbour, edge and triangle lookup per vertex, with
//!   optional counter-clockwise ordering and breadth-first neighbourhoods
//! - **Geodesics**: Dijkstra/A* over mesh edges plus unfolded-triangle
//!   shortcuts, radius-limited searches, guided and data-following paths,
//!   all-pairs matrices
//! - **Signed distance**: octree-accelerated nearest point with four
//!   inside/outside rules and barycentric weights
//! - **Smoothing**: precomputed geodesic Gaussian kernels with plain,
//!   area-preserving and equal-weight normalization, optionally restricted
//!   to a region of interest
//!
//! ## Quick Start
//!
//! ```
//! use sulcus::prelude::*;
//! use nalgebra::Point3;
//!
//! // A tetrahedron
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//! ];
//! let faces = vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
//! let surface = build_from_triangles(&vertices, &faces).unwrap();
//!
//! // Adjacency
//! let topology = surface.topology();
//! assert_eq!(topology.neighbors(VertexId::new(0)).len(), 3);
//!
//! // Geodesic distance along the surface
//! let geodesic = surface.geodesic_query();
//! let field = geodesic.distances_from_source(VertexId::new(0), true).unwrap();
//! assert!((field.distance(VertexId::new(1)) - 1.0).abs() < 1e-6);
//!
//! // Signed distance from an arbitrary point
//! let sd = surface.signed_distance_query();
//! let d = sd.signed_distance(&Point3::new(0.2, 0.2, -2.0), SignPolicy::EvenOdd).unwrap();
//! assert!((d - 2.0).abs() < 1e-6);
//! ```
//!
//! ## Threads
//!
//! Every handle returned by `Surface::*_query` is for one thread at a time.
//! Ask the surface for one per thread; handles that are dropped go back to
//! the pool.
//!
//! ```
//! use sulcus::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.0, 1.0, 0.0),
//! # ];
//! # let surface = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
//! std::thread::scope(|scope| {
//!     for v in surface.vertex_ids() {
//!         let surface = &surface;
//!         scope.spawn(move || {
//!             let query = surface.geodesic_query();
//!             query.distances_within_radius(v, 0.5, true).unwrap()
//!         });
//!     }
//! });
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;
pub mod metric;
pub mod topology;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use sulcus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::geodesic::{
        DataFollowOptions, DistanceMatrix, GeodesicBase, GeodesicPath, GeodesicQuery,
        GeodesicResult, GuideLine, Neighborhood,
    };
    pub use crate::algo::signed_distance::{
        BarycentricWeights, ClosestPoint, Feature, OctreeOptions, SignPolicy, SignedDistanceBase,
        SignedDistanceQuery,
    };
    pub use crate::algo::smooth::{KernelOptions, KernelWeight, SmoothingKernel, SmoothingMethod};
    pub use crate::algo::Progress;
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{build_from_triangles, EdgeId, FaceId, Surface, VertexId};
    pub use crate::metric::Metric;
    pub use crate::topology::{TopologyBase, TopologyHelper};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
