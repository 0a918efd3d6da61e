//! Query engines over a [`Surface`](crate::mesh::Surface).
//!
//! - **Geodesics**: distance fields, radius searches, shortest paths (plain,
//!   line-guided, data-following), all-pairs distance matrices
//! - **Signed distance**: nearest surface point and inside/outside tests for
//!   arbitrary points, with interpolation weights
//! - **Smoothing**: geodesic Gaussian kernels applied to per-vertex data

pub mod geodesic;
pub(crate) mod heap;
pub mod progress;
pub mod signed_distance;
pub mod smooth;

pub use progress::Progress;
