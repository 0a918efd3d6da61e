//! The immutable geodesic graph.

use std::time::Instant;

use nalgebra::Point3;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{MeshError, Result};
use crate::mesh::csr::Csr;
use crate::mesh::{Surface, VertexId};
use crate::topology::{EdgeInfo, TopologyBase};

/// A directed graph edge with its precomputed length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Link {
    pub target: VertexId,
    pub length: f32,
}

/// Where a shortcut crosses the mesh edge between its two triangles.
///
/// Stored once per shortcut direction. `pieces[0]` is the length from the
/// owning vertex to the crossing point, `pieces[1]` from the crossing point
/// to the shortcut's target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    /// Endpoints of the crossed edge.
    pub edge: [VertexId; 2],
    /// Interpolation weight of `edge[0]` at the crossing point.
    pub edge_weight: f32,
    /// Lengths of the two pieces of the shortcut.
    pub pieces: [f32; 2],
}

/// Shortest-path graph of a surface.
///
/// Every vertex has its mesh-edge neighbours with Euclidean edge lengths and,
/// separately, its shortcut neighbours: for each edge shared by two
/// triangles, the two triangles are unfolded flat about the edge and, when
/// the straight apex-to-apex line crosses the edge strictly between its
/// endpoints, the apexes are joined with the unfolded length.
///
/// The base is immutable and shared by any number of
/// [`GeodesicQuery`](super::GeodesicQuery) objects through an `Arc`.
#[derive(Debug)]
pub struct GeodesicBase {
    coords: Vec<Point3<f32>>,
    neighbors: Csr<Link>,
    shortcuts: Csr<Link>,
    crossings: Vec<Crossing>,
    avg_spacing: f32,
    heuristic_scale: f32,
}

struct Shortcut {
    base: VertexId,
    far: VertexId,
    length: f32,
    crossing: Crossing,
}

impl GeodesicBase {
    /// Build the graph for `surface` using its cached topology.
    pub fn new(surface: &Surface) -> Self {
        Self::build(surface, None)
    }

    /// Build the graph with every length rescaled by corrected vertex areas.
    ///
    /// An edge between `a` and `b` is scaled by
    /// `(sqrt(corrected[a]) + sqrt(corrected[b])) / (sqrt(area[a]) + sqrt(area[b]))`
    /// where `area` are the surface's own vertex areas. This approximates
    /// distances on a reference surface (for example, a midthickness surface
    /// queried through an inflated one).
    pub fn with_corrected_areas(surface: &Surface, corrected_areas: &[f32]) -> Result<Self> {
        MeshError::check_length("corrected areas", surface.num_vertices(), corrected_areas.len())?;
        if let Some(bad) = corrected_areas
            .iter()
            .find(|a| !a.is_finite() || **a < 0.0)
        {
            return Err(MeshError::invalid_param(
                "corrected_areas",
                bad,
                "areas must be finite and non-negative",
            ));
        }
        Ok(Self::build(surface, Some(corrected_areas)))
    }

    fn build(surface: &Surface, corrected_areas: Option<&[f32]>) -> Self {
        let start = Instant::now();
        let topology = surface.topology();
        let coords = surface.coordinates().to_vec();

        let correction = corrected_areas.map(|corrected| {
            let sqrt_areas: Vec<f32> = surface.vertex_areas().iter().map(|a| a.sqrt()).collect();
            let sqrt_corrected: Vec<f32> = corrected.iter().map(|a| a.sqrt()).collect();
            (sqrt_areas, sqrt_corrected)
        });
        let factor = |a: VertexId, b: VertexId| -> f32 {
            match &correction {
                Some((sqrt_areas, sqrt_corrected)) => {
                    let denom = sqrt_areas[a.index()] + sqrt_areas[b.index()];
                    if denom > 0.0 {
                        (sqrt_corrected[a.index()] + sqrt_corrected[b.index()]) / denom
                    } else {
                        1.0
                    }
                }
                None => 1.0,
            }
        };

        let neighbors = topology.neighbor_table().map(|v, &n| Link {
            target: n,
            length: (coords[v] - coords[n.index()]).norm() * factor(VertexId::new(v), n),
        });

        let shortcut_list: Vec<Shortcut> = topology
            .edge_info()
            .par_iter()
            .filter_map(|edge| unfold(edge, &coords))
            .map(|mut s| {
                let f = factor(s.base, s.far);
                s.length *= f;
                s.crossing.pieces[0] *= f;
                s.crossing.pieces[1] *= f;
                s
            })
            .collect();

        let mut entries: Vec<(usize, (Link, Crossing))> = Vec::with_capacity(2 * shortcut_list.len());
        for s in &shortcut_list {
            // The crossing is recorded from `far`'s side, pieces are swapped for `base`
            let mut from_base = s.crossing;
            from_base.pieces.swap(0, 1);
            entries.push((
                s.far.index(),
                (
                    Link {
                        target: s.base,
                        length: s.length,
                    },
                    s.crossing,
                ),
            ));
            entries.push((
                s.base.index(),
                (
                    Link {
                        target: s.far,
                        length: s.length,
                    },
                    from_base,
                ),
            ));
        }
        let combined = Csr::from_entries(coords.len(), &entries);
        let shortcuts = combined.map(|_, &(link, _)| link);
        let crossings = combined.values().iter().map(|&(_, c)| c).collect();

        let avg_spacing = average_edge_length(&topology, &neighbors);

        let heuristic_scale = if correction.is_some() {
            let direct = topology.edge_info().iter().map(|e| factor(e.node1, e.node2));
            let unfolded = shortcut_list.iter().map(|s| factor(s.base, s.far));
            let smallest = direct.chain(unfolded).fold(f32::INFINITY, f32::min);
            if smallest.is_finite() {
                smallest
            } else {
                1.0
            }
        } else {
            1.0
        };

        info!(
            vertices = coords.len(),
            shortcuts = shortcut_list.len(),
            avg_spacing,
            corrected = correction.is_some(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "built geodesic index"
        );

        Self {
            coords,
            neighbors,
            shortcuts,
            crossings,
            avg_spacing,
            heuristic_scale,
        }
    }

    // ==================== Accessors ====================

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.coords.len()
    }

    /// Mean length of the mesh edges.
    #[inline]
    pub fn avg_spacing(&self) -> f32 {
        self.avg_spacing
    }

    /// Number of shortcut edges (each counted once).
    #[inline]
    pub fn num_shortcuts(&self) -> usize {
        self.shortcuts.len() / 2
    }

    /// Shortcut neighbours of `v` with their unfolded lengths.
    pub fn shortcuts(&self, v: VertexId) -> impl Iterator<Item = (VertexId, f32)> + '_ {
        self.shortcuts
            .row(v.index())
            .iter()
            .map(|link| (link.target, link.length))
    }

    /// Crossing data of the shortcuts of `v`, in the order of [`GeodesicBase::shortcuts`].
    pub fn crossings(&self, v: VertexId) -> &[Crossing] {
        &self.crossings[self.shortcuts.range(v.index())]
    }

    /// Mesh-edge neighbours of `v` with their lengths.
    pub fn neighbors(&self, v: VertexId) -> impl Iterator<Item = (VertexId, f32)> + '_ {
        self.neighbors
            .row(v.index())
            .iter()
            .map(|link| (link.target, link.length))
    }

    #[inline]
    pub(crate) fn coord(&self, v: usize) -> &Point3<f32> {
        &self.coords[v]
    }

    #[inline]
    pub(crate) fn neighbor_links(&self, v: usize) -> &[Link] {
        self.neighbors.row(v)
    }

    #[inline]
    pub(crate) fn shortcut_links(&self, v: usize) -> &[Link] {
        self.shortcuts.row(v)
    }

    #[inline]
    pub(crate) fn shortcut_crossings(&self, v: usize) -> &[Crossing] {
        &self.crossings[self.shortcuts.range(v)]
    }

    /// Factor applied to Euclidean distances in A* heuristics.
    #[inline]
    pub(crate) fn heuristic_scale(&self) -> f32 {
        self.heuristic_scale
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
}

fn average_edge_length(topology: &TopologyBase, neighbors: &Csr<Link>) -> f32 {
    let mut total = 0.0f64;
    let mut count = 0usize;
    for v in 0..neighbors.num_rows() {
        for link in neighbors.row(v) {
            if v < link.target.index() {
                total += link.length as f64;
                count += 1;
            }
        }
    }
    if count == 0 {
        debug!(edges = topology.num_edges(), "no edges for average spacing");
        return 1.0;
    }
    (total / count as f64) as f32
}

/// Unfold the two triangles of a manifold edge into a plane.
///
/// `a`, `b` are the edge endpoints, `e` the apex of the first triangle and
/// `c` the apex of the second. `c` is rotated about the edge into the plane
/// of `(a, b, e)` on the far side, giving `g`; the shortcut is `e -> g` when
/// that segment crosses the edge strictly inside `(a, b)`.
fn unfold(edge: &EdgeInfo, coords: &[Point3<f32>]) -> Option<Shortcut> {
    if edge.num_tiles() != 2 {
        return None;
    }
    let tiles = edge.tiles();
    let base = tiles[0].node3;
    let far = tiles[1].node3;
    if base == far {
        return None;
    }

    let a = coords[edge.node1.index()];
    let b = coords[edge.node2.index()];
    let e = coords[base.index()];
    let c = coords[far.index()];

    let ab = b - a;
    let ab_len = ab.norm();
    if !(ab_len > 0.0) {
        return None;
    }
    let ab_hat = ab / ab_len;

    // d: foot of c on the edge line
    let d = a + ab_hat * ab_hat.dot(&(c - a));
    // ef: from e perpendicular onto the edge line
    let ea = a - e;
    let ef = ea - ab_hat * ab_hat.dot(&ea);
    let ef_len = ef.norm();
    if !(ef_len > 0.0) {
        return None;
    }
    let ef_hat = ef / ef_len;

    let cd_len = (d - c).norm();
    let g = d + ef_hat * cd_len;
    let eg = g - e;

    let t = ef_len / (ef_len + cd_len);
    let eh = eg * t;
    let along = (eh - ea).dot(&ab_hat);
    if along <= 0.0 || along >= ab_len {
        return None;
    }

    let length = eg.norm();
    let base_piece = eh.norm();
    Some(Shortcut {
        base,
        far,
        length,
        crossing: Crossing {
            edge: [edge.node1, edge.node2],
            edge_weight: 1.0 - along / ab_len,
            pieces: [length - base_piece, base_piece],
        },
    })
}
