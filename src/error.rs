//! Error types for sulcus.
//!
//! Structural problems with the input mesh and invalid query arguments are
//! reported through [`MeshError`]. Degenerate geometry (zero-area triangles,
//! non-manifold edges, disconnected components) is not an error: the affected
//! contribution is skipped and queries report "no result" instead.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while building indices or running queries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// The mesh has no triangles.
    #[error("mesh has no triangles")]
    EmptyMesh,

    /// A triangle references a vertex index that does not exist.
    #[error("triangle {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The triangle index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A triangle uses the same vertex more than once.
    #[error("triangle {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The triangle index.
        face: usize,
    },

    /// A query was given a vertex that is not part of the mesh.
    #[error("vertex {vertex} is out of range (mesh has {num_vertices} vertices)")]
    VertexOutOfRange {
        /// The requested vertex.
        vertex: usize,
        /// Number of vertices in the mesh.
        num_vertices: usize,
    },

    /// A per-vertex array does not match the mesh size.
    #[error("{what} has {actual} entries, expected {expected}")]
    LengthMismatch {
        /// What the array holds (ROI, metric, areas...).
        what: &'static str,
        /// Expected number of entries.
        expected: usize,
        /// Actual number of entries.
        actual: usize,
    },

    /// A metric column index is out of range.
    #[error("column {column} is out of range (metric has {num_columns} columns)")]
    InvalidColumn {
        /// The requested column.
        column: usize,
        /// Number of columns in the metric.
        num_columns: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    pub(crate) fn check_length(what: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(MeshError::LengthMismatch {
                what,
                expected,
                actual,
            })
        }
    }
}
