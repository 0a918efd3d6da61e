//! Nearest-triangle search and inside/outside tests.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nalgebra::{Point3, Vector3};

use super::closest::{closest_on_triangle, edge_weights, face_weights, ClosestPoint, Feature};
use super::octree::{NodeKind, Octree};
use super::{BarycentricWeights, SignPolicy, SignedDistanceBase};
use crate::error::{MeshError, Result};
use crate::mesh::cache::Pooled;
use crate::mesh::FaceId;

/// Weights this small are dropped from [`BarycentricWeights`].
const NEGLIGIBLE_WEIGHT: f32 = 1e-6;

/// Octree node waiting in the search queue.
#[derive(Debug, Clone, Copy)]
struct NodeEntry {
    node: u32,
    /// Lower bound on the distance to anything inside the node.
    distance: f32,
}

impl PartialEq for NodeEntry {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl Eq for NodeEntry {}

impl PartialOrd for NodeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the nearest node first
        other.distance.total_cmp(&self.distance)
    }
}

#[derive(Debug)]
struct Scratch {
    /// Triangles already evaluated by the current pass.
    marked: Vec<bool>,
    changed: Vec<u32>,
    heap: BinaryHeap<NodeEntry>,
    stack: Vec<u32>,
}

impl Scratch {
    fn new(num_triangles: usize) -> Self {
        Self {
            marked: vec![false; num_triangles],
            changed: Vec::new(),
            heap: BinaryHeap::new(),
            stack: Vec::new(),
        }
    }

    /// Mark `tri`, returning false if it was already marked.
    #[inline]
    fn mark(&mut self, tri: u32) -> bool {
        let slot = &mut self.marked[tri as usize];
        if *slot {
            return false;
        }
        *slot = true;
        self.changed.push(tri);
        true
    }

    fn reset(&mut self) {
        for tri in self.changed.drain(..) {
            self.marked[tri as usize] = false;
        }
        self.heap.clear();
        self.stack.clear();
    }
}

/// Signed-distance queries with private scratch space.
///
/// Like [`GeodesicQuery`](crate::algo::geodesic::GeodesicQuery), one object
/// runs one query at a time; get one per thread from
/// [`Surface::signed_distance_query`](crate::mesh::Surface::signed_distance_query).
#[derive(Debug)]
pub struct SignedDistanceQuery {
    base: Arc<SignedDistanceBase>,
    scratch: Mutex<Scratch>,
}

impl SignedDistanceQuery {
    /// Create a query object over `base`.
    pub fn new(base: Arc<SignedDistanceBase>) -> Self {
        let scratch = Scratch::new(base.num_triangles());
        Self {
            base,
            scratch: Mutex::new(scratch),
        }
    }

    /// The index this object searches.
    #[inline]
    pub fn base(&self) -> &Arc<SignedDistanceBase> {
        &self.base
    }

    fn lock(&self) -> MutexGuard<'_, Scratch> {
        let mut scratch = self.scratch.lock().unwrap_or_else(PoisonError::into_inner);
        scratch.reset();
        scratch
    }

    fn check_point(point: &Point3<f32>) -> Result<()> {
        if point.iter().all(|c| c.is_finite()) {
            Ok(())
        } else {
            Err(MeshError::invalid_param(
                "point",
                format!("({}, {}, {})", point.x, point.y, point.z),
                "coordinates must be finite",
            ))
        }
    }

    /// Signed distance from `point` to the surface, negative inside.
    pub fn signed_distance(&self, point: &Point3<f32>, policy: SignPolicy) -> Result<f32> {
        Self::check_point(point)?;
        let mut scratch = self.lock();
        let closest = self
            .nearest(&mut scratch, point, f32::INFINITY)
            .ok_or(MeshError::EmptyMesh)?;
        Ok(self.sign(&mut scratch, point, &closest, policy) * closest.distance)
    }

    /// Like [`signed_distance`](Self::signed_distance), but gives up on
    /// anything farther than `limit` and returns `None` in that case.
    ///
    /// The search starts with `limit` as its bound, so a small limit prunes
    /// most of the octree.
    pub fn signed_distance_limited(
        &self,
        point: &Point3<f32>,
        limit: f32,
        policy: SignPolicy,
    ) -> Result<Option<f32>> {
        Self::check_point(point)?;
        if !(limit >= 0.0) {
            return Err(MeshError::invalid_param(
                "limit",
                limit,
                "limit must be non-negative",
            ));
        }
        let mut scratch = self.lock();
        let Some(closest) = self.nearest(&mut scratch, point, limit) else {
            return Ok(None);
        };
        Ok(Some(
            self.sign(&mut scratch, point, &closest, policy) * closest.distance,
        ))
    }

    /// The nearest point of the surface to `point`.
    pub fn closest_point(&self, point: &Point3<f32>) -> Result<ClosestPoint> {
        Self::check_point(point)?;
        let mut scratch = self.lock();
        self.nearest(&mut scratch, point, f32::INFINITY)
            .ok_or(MeshError::EmptyMesh)
    }

    /// Interpolation weights of the surface point nearest to `point`.
    pub fn barycentric_weights(&self, point: &Point3<f32>) -> Result<BarycentricWeights> {
        let closest = self.closest_point(point)?;
        let coords = &self.base.coords;
        let mut pairs = match closest.feature {
            Feature::Vertex(v) => vec![(v, 1.0)],
            Feature::Edge(a, b) => {
                let [wa, wb] = edge_weights(&closest.point, &coords[a.index()], &coords[b.index()]);
                vec![(a, wa), (b, wb)]
            }
            Feature::Face => {
                let (ids, verts) = self.base.corners(closest.triangle);
                let w = face_weights(&closest.point, &verts);
                ids.iter().copied().zip(w).collect()
            }
        };

        // A point on an edge or corner may still be classified as the face
        pairs.retain(|(_, w)| *w > NEGLIGIBLE_WEIGHT);
        let sum: f32 = pairs.iter().map(|(_, w)| w).sum();
        if sum > 0.0 {
            for (_, w) in &mut pairs {
                *w /= sum;
            }
        } else {
            let (ids, _) = self.base.corners(closest.triangle);
            pairs = vec![(ids[0], 1.0)];
        }
        Ok(BarycentricWeights { pairs })
    }

    // ==================== Search ====================

    /// Branch and bound over the octree.
    ///
    /// Nodes are popped nearest first and only opened while their bound is
    /// within the best distance so far, which starts at `limit`.
    fn nearest(&self, scratch: &mut Scratch, p: &Point3<f32>, limit: f32) -> Option<ClosestPoint> {
        let tree = &self.base.octree;
        let mut best: Option<ClosestPoint> = None;
        let mut bound = limit;

        scratch.heap.push(NodeEntry {
            node: Octree::ROOT,
            distance: tree.node(Octree::ROOT).bounds.distance_to(p),
        });
        while let Some(entry) = scratch.heap.pop() {
            if entry.distance > bound {
                break;
            }
            match &tree.node(entry.node).kind {
                NodeKind::Branch(children) => {
                    for &child in children {
                        let distance = tree.node(child).bounds.distance_to(p);
                        if distance <= bound {
                            scratch.heap.push(NodeEntry {
                                node: child,
                                distance,
                            });
                        }
                    }
                }
                NodeKind::Leaf(tris) => {
                    for &tri in tris {
                        if !scratch.mark(tri) {
                            continue;
                        }
                        let face = FaceId::new(tri as usize);
                        let (ids, verts) = self.base.corners(face);
                        let candidate = closest_on_triangle(p, face, ids, &verts);
                        let better = match &best {
                            Some(_) => candidate.distance < bound,
                            None => candidate.distance <= bound,
                        };
                        if better {
                            bound = candidate.distance;
                            best = Some(candidate);
                        }
                    }
                }
            }
        }
        scratch.reset();
        best
    }

    // ==================== Sign ====================

    fn sign(
        &self,
        scratch: &mut Scratch,
        p: &Point3<f32>,
        closest: &ClosestPoint,
        policy: SignPolicy,
    ) -> f32 {
        if closest.distance == 0.0 {
            return 1.0;
        }
        let inside = match policy {
            SignPolicy::EvenOdd => self.ray_crossings(scratch, p) % 2 != 0,
            SignPolicy::Negative => self.ray_crossings(scratch, p) < 0,
            SignPolicy::NonZero => self.ray_crossings(scratch, p) != 0,
            SignPolicy::Normals => self.feature_normal(closest).dot(&(p - closest.point)) < 0.0,
        };
        if inside {
            -1.0
        } else {
            1.0
        }
    }

    /// Signed count of triangles crossed by the ray from `p` toward +Z.
    fn ray_crossings(&self, scratch: &mut Scratch, p: &Point3<f32>) -> i32 {
        let tree = &self.base.octree;
        let mut count = 0;
        scratch.stack.push(Octree::ROOT);
        while let Some(index) = scratch.stack.pop() {
            let node = tree.node(index);
            if !node.bounds.hit_by_ray_up(p) {
                continue;
            }
            match &node.kind {
                NodeKind::Branch(children) => scratch.stack.extend_from_slice(children),
                NodeKind::Leaf(tris) => {
                    for &tri in tris {
                        if scratch.mark(tri) {
                            count += self.crossing(p, FaceId::new(tri as usize));
                        }
                    }
                }
            }
        }
        scratch.reset();
        count
    }

    /// +1 if the ray enters through the back of `face`, -1 if through the
    /// front, 0 if it misses.
    fn crossing(&self, p: &Point3<f32>, face: FaceId) -> i32 {
        let (_, v) = self.base.corners(face);
        let n = (v[1] - v[0]).cross(&(v[2] - v[0]));
        if n.z == 0.0 {
            return 0;
        }
        let t = n.dot(&(v[0] - p)) / n.z;
        if !(t > 0.0) || !in_triangle_xy(p, &v) {
            return 0;
        }
        if n.z < 0.0 {
            1
        } else {
            -1
        }
    }

    /// Outward direction at the closest feature.
    fn feature_normal(&self, closest: &ClosestPoint) -> Vector3<f32> {
        let normals = &self.base.normals;
        let topology = &self.base.topology;
        let face_normal = normals[closest.triangle.index()];
        match closest.feature {
            Feature::Face => face_normal,
            Feature::Edge(a, b) => match topology.edge_between(a, b) {
                Some(e) => topology
                    .edge(e)
                    .tiles()
                    .iter()
                    .fold(Vector3::zeros(), |sum, t| sum + normals[t.tile.index()]),
                None => face_normal,
            },
            Feature::Vertex(v) => topology
                .tiles(v)
                .iter()
                .fold(Vector3::zeros(), |sum, f| sum + normals[f.index()]),
        }
    }
}

/// Crossing-number test in the XY plane.
///
/// Each edge counts when `p.x` lies in its half-open x-range, so a point on
/// an edge shared by two triangles falls in exactly one of them. Endpoints
/// are ordered by x first: the two triangles list a shared edge in opposite
/// directions and must round its crossing identically.
fn in_triangle_xy(p: &Point3<f32>, v: &[Point3<f32>; 3]) -> bool {
    let mut inside = false;
    let mut j = 2;
    for i in 0..3 {
        let (a, b) = if v[i].x < v[j].x {
            (&v[i], &v[j])
        } else {
            (&v[j], &v[i])
        };
        if (a.x < p.x) != (b.x < p.x) {
            let y = (b.y - a.y) / (b.x - a.x) * (p.x - a.x) + a.y;
            if y > p.y {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

impl Pooled for SignedDistanceQuery {
    type Base = SignedDistanceBase;

    fn pooled_base(&self) -> &Arc<SignedDistanceBase> {
        &self.base
    }
}
