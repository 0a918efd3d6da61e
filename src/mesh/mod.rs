//! Core surface data structures.
//!
//! The primary type is [`Surface`]: vertex positions plus a triangle list with
//! consistent counter-clockwise winding. It is the entry point for every
//! query; the indices the queries need are built lazily on first use and
//! cached on the surface until its coordinates change.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe `u32` index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`FaceId`] - Identifies a triangle
//! - [`EdgeId`] - Identifies an edge in the topology edge table
//!
//! # Construction
//!
//! ```
//! use sulcus::mesh::build_from_triangles;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let surface = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(surface.num_triangles(), 1);
//! ```

pub(crate) mod builder;
pub(crate) mod cache;
pub(crate) mod csr;
pub mod geometry;
mod index;
mod surface;

pub use builder::build_from_triangles;
pub use index::{EdgeId, FaceId, VertexId};
pub use surface::Surface;
