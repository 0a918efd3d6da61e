//! Vertex, edge and triangle adjacency tables.
//!
//! [`TopologyBase`] is built once from the triangle list and never changes.
//! It answers per-vertex adjacency in O(1) and owns the global edge table
//! (each edge stored once with `node1 < node2`) and the tile table (each
//! triangle's three edges). [`TopologyHelper`] adds the scratch buffer needed
//! for breadth-first neighbourhood queries and is pooled per surface.
//!
//! # Example
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
//! let topology = surface.topology();
//! assert_eq!(topology.neighbors(VertexId::new(0)).len(), 3);
//! assert_eq!(topology.num_edges(), 5);
//! ```

mod helper;
mod sorted;

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

pub use helper::TopologyHelper;

use crate::error::Result;
use crate::mesh::builder::validate_triangles;
use crate::mesh::csr::Csr;
use crate::mesh::{EdgeId, FaceId, Surface, VertexId};

/// One triangle on one side of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeTile {
    /// The triangle.
    pub tile: FaceId,
    /// The triangle's vertex that is not on the edge.
    pub node3: VertexId,
    /// Whether the triangle's winding runs from `node2` to `node1`.
    pub reversed: bool,
}

impl Default for EdgeTile {
    fn default() -> Self {
        Self {
            tile: FaceId::invalid(),
            node3: VertexId::invalid(),
            reversed: false,
        }
    }
}

/// An undirected mesh edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeInfo {
    /// Lower-numbered endpoint.
    pub node1: VertexId,
    /// Higher-numbered endpoint.
    pub node2: VertexId,
    tiles: [EdgeTile; 2],
    num_tiles: u32,
}

impl EdgeInfo {
    /// The (at most two) recorded triangles sharing this edge.
    #[inline]
    pub fn tiles(&self) -> &[EdgeTile] {
        &self.tiles[..(self.num_tiles as usize).min(2)]
    }

    /// Number of triangles using this edge, including any beyond the two recorded.
    #[inline]
    pub fn num_tiles(&self) -> usize {
        self.num_tiles as usize
    }

    /// True if exactly one triangle uses this edge.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.num_tiles == 1
    }

    /// The endpoint that is not `v`.
    #[inline]
    pub fn other(&self, v: VertexId) -> VertexId {
        if v == self.node1 {
            self.node2
        } else {
            self.node1
        }
    }
}

/// The three edges of a triangle.
///
/// Edge `k` joins the triangle's corners `k` and `(k + 1) % 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileInfo {
    /// Edge table indices.
    pub edges: [EdgeId; 3],
    /// Whether the triangle traverses edge `k` from `node2` to `node1`.
    pub reversed: [bool; 3],
}

/// Immutable adjacency index of a triangle mesh.
#[derive(Debug, Clone)]
pub struct TopologyBase {
    neighbors: Csr<VertexId>,
    vertex_edges: Csr<EdgeId>,
    vertex_tiles: Csr<FaceId>,
    edges: Vec<EdgeInfo>,
    tiles: Vec<TileInfo>,
    sorted: bool,
}

impl TopologyBase {
    /// Build the index from raw triangle index triples.
    ///
    /// Fails if a triangle references a vertex `>= num_vertices` or repeats a
    /// vertex. With `sorted`, each vertex's neighbours, edges and tiles are
    /// listed counter-clockwise around it.
    pub fn new(num_vertices: usize, triangles: &[[usize; 3]], sorted: bool) -> Result<Self> {
        let triangles = validate_triangles(num_vertices, triangles)?;
        Ok(Self::build(num_vertices, &triangles, sorted))
    }

    pub(crate) fn from_surface(surface: &Surface, sorted: bool) -> Self {
        Self::build(surface.num_vertices(), surface.triangles(), sorted)
    }

    fn build(num_vertices: usize, triangles: &[[VertexId; 3]], sorted: bool) -> Self {
        let start = Instant::now();

        let tile_entries: Vec<(usize, FaceId)> = triangles
            .iter()
            .enumerate()
            .flat_map(|(t, tri)| tri.iter().map(move |v| (v.index(), FaceId::new(t))))
            .collect();
        let mut vertex_tiles = Csr::from_entries(num_vertices, &tile_entries);

        // (low, high, tile, corner) for every triangle side, grouped by edge after sorting
        let mut sides: Vec<(u32, u32, u32, u8)> = triangles
            .iter()
            .enumerate()
            .flat_map(|(t, tri)| {
                (0..3u8).map(move |k| {
                    let a = tri[k as usize].index() as u32;
                    let b = tri[(k as usize + 1) % 3].index() as u32;
                    (a.min(b), a.max(b), t as u32, k)
                })
            })
            .collect();
        sides.par_sort_unstable();

        let mut edges: Vec<EdgeInfo> = Vec::with_capacity(sides.len() / 2 + 1);
        let mut tiles = vec![TileInfo::default(); triangles.len()];
        let mut non_manifold = 0usize;
        for group in sides.chunk_by(|x, y| x.0 == y.0 && x.1 == y.1) {
            let edge = EdgeId::new(edges.len());
            let mut info = EdgeInfo {
                node1: VertexId::new(group[0].0 as usize),
                node2: VertexId::new(group[0].1 as usize),
                tiles: [EdgeTile::default(); 2],
                num_tiles: group.len() as u32,
            };
            for (slot, &(_, _, t, k)) in group.iter().enumerate() {
                let tri = triangles[t as usize];
                let reversed = tri[k as usize] != info.node1;
                if slot < 2 {
                    info.tiles[slot] = EdgeTile {
                        tile: FaceId::new(t as usize),
                        node3: tri[(k as usize + 2) % 3],
                        reversed,
                    };
                }
                tiles[t as usize].edges[k as usize] = edge;
                tiles[t as usize].reversed[k as usize] = reversed;
            }
            if group.len() > 2 {
                non_manifold += 1;
            }
            edges.push(info);
        }
        if non_manifold > 0 {
            debug!(edges = non_manifold, "edges shared by more than two triangles");
        }

        let link_entries: Vec<(usize, (VertexId, EdgeId))> = edges
            .iter()
            .enumerate()
            .flat_map(|(e, info)| {
                let edge = EdgeId::new(e);
                [
                    (info.node1.index(), (info.node2, edge)),
                    (info.node2.index(), (info.node1, edge)),
                ]
            })
            .collect();
        let mut links = Csr::from_entries(num_vertices, &link_entries);

        if sorted {
            let rows: Vec<(Vec<(VertexId, EdgeId)>, Vec<FaceId>)> = (0..num_vertices)
                .into_par_iter()
                .map(|v| {
                    sorted::counter_clockwise(
                        VertexId::new(v),
                        links.row(v),
                        vertex_tiles.row(v),
                        triangles,
                    )
                })
                .collect();
            let (link_rows, tile_rows): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
            links = Csr::from_rows(link_rows);
            vertex_tiles = Csr::from_rows(tile_rows);
        }

        info!(
            vertices = num_vertices,
            edges = edges.len(),
            triangles = triangles.len(),
            sorted,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "built topology index"
        );

        Self {
            neighbors: links.map(|_, &(n, _)| n),
            vertex_edges: links.map(|_, &(_, e)| e),
            vertex_tiles,
            edges,
            tiles,
            sorted,
        }
    }

    // ==================== Accessors ====================

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.neighbors.num_rows()
    }

    /// Number of distinct edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Whether neighbour lists are in counter-clockwise order.
    #[inline]
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Vertices sharing an edge with `v`.
    ///
    /// `neighbors(v)[j]` is the other end of `edges(v)[j]`.
    #[inline]
    pub fn neighbors(&self, v: VertexId) -> &[VertexId] {
        self.neighbors.row(v.index())
    }

    /// Number of neighbours of `v`.
    #[inline]
    pub fn num_neighbors(&self, v: VertexId) -> usize {
        self.neighbors.range(v.index()).len()
    }

    /// Edges incident to `v`.
    #[inline]
    pub fn edges(&self, v: VertexId) -> &[EdgeId] {
        self.vertex_edges.row(v.index())
    }

    /// Triangles incident to `v`.
    #[inline]
    pub fn tiles(&self, v: VertexId) -> &[FaceId] {
        self.vertex_tiles.row(v.index())
    }

    /// The global edge table.
    #[inline]
    pub fn edge_info(&self) -> &[EdgeInfo] {
        &self.edges
    }

    /// The global tile table.
    #[inline]
    pub fn tile_info(&self) -> &[TileInfo] {
        &self.tiles
    }

    /// One edge.
    #[inline]
    pub fn edge(&self, e: EdgeId) -> &EdgeInfo {
        &self.edges[e.index()]
    }

    /// The edge joining `a` and `b`, if any.
    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.neighbors(a)
            .iter()
            .position(|&n| n == b)
            .map(|j| self.edges(a)[j])
    }

    /// True if `v` lies on an edge used by a single triangle.
    pub fn is_boundary_vertex(&self, v: VertexId) -> bool {
        self.edges(v).iter().any(|&e| self.edge(e).is_boundary())
    }

    pub(crate) fn neighbor_table(&self) -> &Csr<VertexId> {
        &self.neighbors
    }
}
