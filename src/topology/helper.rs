//! Pooled topology queries that need scratch space.

use std::sync::{Arc, Mutex, PoisonError};

use super::TopologyBase;
use crate::error::{MeshError, Result};
use crate::mesh::cache::Pooled;
use crate::mesh::{EdgeId, FaceId, VertexId};

/// Topology queries with a reusable visitation buffer.
///
/// Obtain one from [`Surface::topology_helper`](crate::mesh::Surface::topology_helper).
#[derive(Debug)]
pub struct TopologyHelper {
    base: Arc<TopologyBase>,
    marks: Mutex<Vec<bool>>,
}

impl TopologyHelper {
    /// Create a helper over `base`.
    pub fn new(base: Arc<TopologyBase>) -> Self {
        let marks = vec![false; base.num_vertices()];
        Self {
            base,
            marks: Mutex::new(marks),
        }
    }

    /// The underlying index.
    #[inline]
    pub fn base(&self) -> &Arc<TopologyBase> {
        &self.base
    }

    /// Vertices sharing an edge with `v`.
    #[inline]
    pub fn neighbors(&self, v: VertexId) -> &[VertexId] {
        self.base.neighbors(v)
    }

    /// Edges incident to `v`.
    #[inline]
    pub fn edges(&self, v: VertexId) -> &[EdgeId] {
        self.base.edges(v)
    }

    /// Triangles incident to `v`.
    #[inline]
    pub fn tiles(&self, v: VertexId) -> &[FaceId] {
        self.base.tiles(v)
    }

    /// Vertices within `depth` edge hops of `v`, excluding `v` itself.
    ///
    /// Vertices come out in breadth-first order, nearest ring first.
    pub fn neighbors_to_depth(&self, v: VertexId, depth: usize) -> Result<Vec<VertexId>> {
        if v.index() >= self.base.num_vertices() {
            return Err(MeshError::VertexOutOfRange {
                vertex: v.index(),
                num_vertices: self.base.num_vertices(),
            });
        }

        // Marks are cleared before returning, so a poisoned buffer is still all false.
        let mut marks = self.marks.lock().unwrap_or_else(PoisonError::into_inner);
        marks[v.index()] = true;

        let mut found: Vec<VertexId> = Vec::new();
        let mut ring_start = 0;
        for level in 0..depth {
            let ring_end = found.len();
            let frontier: &[VertexId] = if level == 0 {
                std::slice::from_ref(&v)
            } else {
                &found[ring_start..ring_end]
            };
            let mut next = Vec::new();
            for &u in frontier {
                for &n in self.base.neighbors(u) {
                    if !marks[n.index()] {
                        marks[n.index()] = true;
                        next.push(n);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            ring_start = ring_end;
            found.extend(next);
        }

        marks[v.index()] = false;
        for n in &found {
            marks[n.index()] = false;
        }
        Ok(found)
    }
}

impl Pooled for TopologyHelper {
    type Base = TopologyBase;

    fn pooled_base(&self) -> &Arc<TopologyBase> {
        &self.base
    }
}
