//! Distances between every pair of vertices.

use std::time::Instant;

use tracing::{info, warn};

use super::base::Link;
use super::search::UNREACHED;
use super::GeodesicQuery;
use crate::algo::progress::Progress;
use crate::mesh::VertexId;

const SETTLED: u8 = 1;
const KNOWN: u8 = 2;
const HAS_VALUE: u8 = 4;
const QUEUED: u8 = 8;

/// Dense `n x n` matrix of geodesic distances with shortest-path trees.
///
/// Row `i` holds the distances from vertex `i`. Unreachable pairs are
/// `f32::INFINITY`.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    n: usize,
    distances: Vec<f32>,
    /// `parents[i * n + j]` is the predecessor of `j` on the path from `i`.
    parents: Vec<u32>,
}

impl DistanceMatrix {
    /// Number of vertices (rows and columns).
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.n
    }

    /// Distance from `i` to `j`.
    #[inline]
    pub fn get(&self, i: VertexId, j: VertexId) -> f32 {
        self.distances[i.index() * self.n + j.index()]
    }

    /// Distances from `i` to every vertex.
    #[inline]
    pub fn row(&self, i: VertexId) -> &[f32] {
        let start = i.index() * self.n;
        &self.distances[start..start + self.n]
    }

    /// Shortest path from `from` to `to`, both included.
    ///
    /// When several shortest paths have the same length, which one is
    /// returned depends on the order the matrix was filled in.
    pub fn path(&self, from: VertexId, to: VertexId) -> Option<Vec<VertexId>> {
        if !self.get(from, to).is_finite() {
            return None;
        }
        let row = &self.parents[from.index() * self.n..(from.index() + 1) * self.n];
        let mut path = vec![to];
        let mut current = to.index();
        while current != from.index() {
            let parent = row[current];
            if parent == UNREACHED || path.len() > self.n {
                return None;
            }
            current = parent as usize;
            path.push(VertexId::new(current));
        }
        path.reverse();
        Some(path)
    }
}

impl GeodesicQuery {
    /// Geodesic distances between all pairs of vertices.
    ///
    /// Roots are processed in index order. After each root's search, every
    /// shortest path found is split at each of its interior vertices and the
    /// pieces are written into the rows of the later roots, so later
    /// searches start with most of their row already known and stop as soon
    /// as the remaining entries are settled.
    ///
    /// Needs `8 * n^2` bytes. Returns `None` (and logs a warning) if that
    /// cannot be allocated.
    pub fn all_pairs_distances(&self, smooth: bool, progress: &Progress) -> Option<DistanceMatrix> {
        let base = self.base();
        let n = base.num_vertices();
        let cells = n.checked_mul(n)?;
        let bytes = cells as u64 * 8;
        info!(
            vertices = n,
            megabytes = bytes as f64 / (1024.0 * 1024.0),
            "allocating all-pairs distance matrix"
        );

        let mut distances: Vec<f32> = Vec::new();
        let mut parents: Vec<u32> = Vec::new();
        if distances.try_reserve_exact(cells).is_err() || parents.try_reserve_exact(cells).is_err() {
            warn!(vertices = n, bytes, "could not allocate all-pairs distance matrix");
            return None;
        }
        distances.resize(cells, -1.0);
        parents.resize(cells, UNREACHED);

        let start = Instant::now();
        let mut scratch = self.lock();
        let heap = &mut scratch.heap;
        let mut marks = vec![0u8; n];

        for root in 0..n {
            progress.report(root, n, "computing geodesic distances");
            let row = root * n;

            marks.fill(0);
            let mut remaining = 0usize;
            for (j, mark) in marks.iter_mut().enumerate() {
                if distances[row + j] > 0.0 {
                    *mark = KNOWN;
                } else {
                    remaining += 1;
                }
            }
            heap.clear();

            distances[row + root] = 0.0;
            parents[row + root] = root as u32;
            marks[root] |= HAS_VALUE;
            heap.push(root, 0.0);

            while remaining > 0 {
                let Some((node, _)) = heap.pop() else {
                    break;
                };
                if marks[node] & KNOWN == 0 {
                    remaining -= 1;
                }
                marks[node] |= SETTLED;
                let here = distances[row + node];

                let direct = base.neighbor_links(node).iter();
                let shortcuts: &[Link] = if smooth { base.shortcut_links(node) } else { &[] };
                for link in direct.chain(shortcuts) {
                    let next = link.target.index();
                    if marks[next] & KNOWN != 0 {
                        if marks[next] & QUEUED == 0 {
                            marks[next] |= QUEUED;
                            heap.push(next, distances[row + next]);
                        }
                        continue;
                    }
                    if marks[next] & SETTLED != 0 {
                        continue;
                    }
                    let tentative = here + link.length;
                    if marks[next] & HAS_VALUE == 0 || tentative < distances[row + next] {
                        marks[next] |= HAS_VALUE;
                        distances[row + next] = tentative;
                        parents[row + next] = node as u32;
                        heap.push(next, tentative);
                    }
                }
            }

            // Split each new path root -> ... -> mid -> ... -> end at every mid.
            for end in root + 1..n {
                if marks[end] & KNOWN != 0 || distances[row + end] < 0.0 {
                    continue;
                }
                let total = distances[row + end];
                let end_parent = parents[row + end];
                let mut toward_end = end as u32;
                let mut mid = end_parent;
                let mut steps = 0;
                while mid as usize != root && mid != UNREACHED && steps < n {
                    let mid_index = mid as usize;
                    let piece = total - distances[row + mid_index];
                    if mid_index > root {
                        distances[mid_index * n + end] = piece;
                        parents[mid_index * n + end] = end_parent;
                    }
                    distances[end * n + mid_index] = piece;
                    parents[end * n + mid_index] = toward_end;
                    toward_end = mid;
                    mid = parents[row + mid_index];
                    steps += 1;
                }
                distances[end * n + root] = total;
                parents[end * n + root] = toward_end;
            }
        }
        heap.clear();
        progress.report(n, n, "computing geodesic distances");

        for d in &mut distances {
            if *d < 0.0 {
                *d = f32::INFINITY;
            }
        }
        info!(
            vertices = n,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "computed all-pairs distances"
        );
        Some(DistanceMatrix {
            n,
            distances,
            parents,
        })
    }
}
