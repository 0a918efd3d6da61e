//! Searches over a [`GeodesicBase`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nalgebra::Point3;

use super::base::GeodesicBase;
use super::search::{
    length_cost, no_heuristic, Scratch, Step, FROZEN, HAS_VALUE, INTERESTED, ROOT, STOP,
    UNREACHED,
};
use super::{GeodesicPath, GeodesicResult, Neighborhood};
use crate::error::{MeshError, Result};
use crate::mesh::cache::Pooled;
use crate::mesh::geometry::{dist_to_line, dist_to_segment};
use crate::mesh::VertexId;

/// A line that [`GeodesicQuery::shortest_path_along_line`] tries to follow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuideLine {
    /// Infinite line through two points.
    Line(Point3<f32>, Point3<f32>),
    /// Segment between two points.
    Segment(Point3<f32>, Point3<f32>),
}

impl GuideLine {
    /// Euclidean distance from `p` to the line.
    pub fn distance(&self, p: &Point3<f32>) -> f32 {
        match self {
            GuideLine::Line(a, b) => dist_to_line(p, a, b),
            GuideLine::Segment(a, b) => dist_to_segment(p, a, b),
        }
    }
}

/// Options for [`GeodesicQuery::path_following_data`].
#[derive(Debug, Clone)]
pub struct DataFollowOptions {
    /// How strongly the data value adds to the path cost.
    pub follow_strength: f32,
    /// Prefer high data values instead of low ones.
    pub follow_maximum: bool,
    /// Use shortcut edges.
    pub smooth: bool,
}

impl Default for DataFollowOptions {
    fn default() -> Self {
        Self {
            follow_strength: 5.0,
            follow_maximum: false,
            smooth: true,
        }
    }
}

impl DataFollowOptions {
    /// Set the follow strength.
    pub fn with_strength(mut self, strength: f32) -> Self {
        self.follow_strength = strength;
        self
    }

    /// Follow high values instead of low ones.
    pub fn with_follow_maximum(mut self, follow_maximum: bool) -> Self {
        self.follow_maximum = follow_maximum;
        self
    }

    /// Enable or disable shortcut edges.
    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }
}

/// Shortest-path queries with private scratch space.
///
/// A query runs one search at a time; concurrent calls on the same object
/// wait for each other. Use one object per thread, for example through
/// [`Surface::geodesic_query`](crate::mesh::Surface::geodesic_query), which
/// hands out pooled objects that are not in use elsewhere.
///
/// Every method taking `smooth` includes the shortcut edges when it is set.
#[derive(Debug)]
pub struct GeodesicQuery {
    base: Arc<GeodesicBase>,
    scratch: Mutex<Scratch>,
}

impl GeodesicQuery {
    /// Create a query object over `base`.
    pub fn new(base: Arc<GeodesicBase>) -> Self {
        let scratch = Scratch::new(base.num_vertices());
        Self {
            base,
            scratch: Mutex::new(scratch),
        }
    }

    /// The graph this object searches.
    #[inline]
    pub fn base(&self) -> &Arc<GeodesicBase> {
        &self.base
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, Scratch> {
        // Scratch is reset here, so a search that panicked leaves nothing behind.
        let mut scratch = self.scratch.lock().unwrap_or_else(PoisonError::into_inner);
        scratch.reset();
        scratch
    }

    fn check_radius(max_dist: f32) -> Result<()> {
        if max_dist >= 0.0 {
            Ok(())
        } else {
            Err(MeshError::invalid_param(
                "max_dist",
                max_dist,
                "radius must be non-negative",
            ))
        }
    }

    fn check_all(&self, vertices: &[VertexId]) -> Result<()> {
        vertices.iter().try_for_each(|&v| self.base.check_vertex(v))
    }

    fn euclidean_heuristic(&self, target: usize) -> impl Fn(usize) -> f32 + '_ {
        let scale = self.base.heuristic_scale();
        let goal = *self.base.coord(target);
        move |v| scale * (self.base.coord(v) - goal).norm()
    }

    // ==================== Distance fields ====================

    /// All vertices within `max_dist` of `source`, nearest first.
    ///
    /// Vertices whose tentative distance exceeds the radius are never queued,
    /// so the work is proportional to the size of the neighbourhood.
    pub fn distances_within_radius(
        &self,
        source: VertexId,
        max_dist: f32,
        smooth: bool,
    ) -> Result<Neighborhood> {
        self.base.check_vertex(source)?;
        Self::check_radius(max_dist)?;

        let mut scratch = self.lock();
        let mut found = Neighborhood::default();
        scratch.seed(source.index(), 0.0);
        while let Some(v) = scratch.pop() {
            found.vertices.push(VertexId::new(v));
            found.distances.push(scratch.output[v]);
            found.parents.push(parent_of(scratch.parent[v]));
            scratch.relax(&self.base, v, smooth, max_dist, &length_cost, &no_heuristic);
        }
        Ok(found)
    }

    /// Distances from `source` to every vertex.
    pub fn distances_from_source(&self, source: VertexId, smooth: bool) -> Result<GeodesicResult> {
        self.base.check_vertex(source)?;

        let mut scratch = self.lock();
        scratch.seed(source.index(), 0.0);
        while let Some(v) = scratch.pop() {
            scratch.relax(&self.base, v, smooth, f32::INFINITY, &length_cost, &no_heuristic);
        }

        let n = self.base.num_vertices();
        let mut distances = vec![f32::INFINITY; n];
        let mut parents = vec![None; n];
        for v in 0..n {
            if scratch.has(v, FROZEN) {
                distances[v] = scratch.output[v];
                parents[v] = parent_of(scratch.parent[v]);
            }
        }
        Ok(GeodesicResult::new(distances, parents))
    }

    /// Distances from `source` to each vertex of `subset`, in subset order.
    ///
    /// The search stops as soon as every requested vertex is finalized.
    /// Unreachable vertices get `f32::INFINITY`.
    pub fn distances_to_subset(
        &self,
        source: VertexId,
        subset: &[VertexId],
        smooth: bool,
    ) -> Result<Vec<f32>> {
        self.base.check_vertex(source)?;
        self.check_all(subset)?;

        let mut scratch = self.lock();
        let mut remaining = 0usize;
        for &v in subset {
            if !scratch.has(v.index(), INTERESTED) {
                scratch.mark(v.index(), INTERESTED);
                remaining += 1;
            }
        }

        if remaining > 0 {
            scratch.seed(source.index(), 0.0);
            while let Some(v) = scratch.pop() {
                if scratch.has(v, INTERESTED) {
                    remaining -= 1;
                    if remaining == 0 {
                        break;
                    }
                }
                scratch.relax(&self.base, v, smooth, f32::INFINITY, &length_cost, &no_heuristic);
            }
        }

        Ok(subset
            .iter()
            .map(|v| {
                if scratch.has(v.index(), FROZEN) {
                    scratch.output[v.index()]
                } else {
                    f32::INFINITY
                }
            })
            .collect())
    }

    // ==================== Paths ====================

    /// Shortest path from `source` to `target` by A*.
    ///
    /// The heuristic is the straight-line distance to `target`. The search
    /// stops when `target` is popped. An empty path means `target` cannot be
    /// reached.
    pub fn shortest_path(
        &self,
        source: VertexId,
        target: VertexId,
        smooth: bool,
    ) -> Result<GeodesicPath> {
        self.base.check_vertex(source)?;
        self.base.check_vertex(target)?;

        let heuristic = self.euclidean_heuristic(target.index());
        let mut scratch = self.lock();
        self.run_to_target(&mut scratch, source, target, smooth, &length_cost, &heuristic);
        Ok(finish_path(&scratch, target))
    }

    /// Shortest path that is penalized for straying from `guide`.
    ///
    /// Each edge costs its length plus
    /// `length * (d(a) + d(b)) / (2 * avg_spacing)` where `d` is the
    /// distance of an endpoint from the guide line. Dividing by the average
    /// edge length keeps the trade-off independent of mesh resolution.
    pub fn shortest_path_along_line(
        &self,
        source: VertexId,
        target: VertexId,
        guide: &GuideLine,
        smooth: bool,
    ) -> Result<GeodesicPath> {
        self.base.check_vertex(source)?;
        self.base.check_vertex(target)?;

        let base = &*self.base;
        let penalty = 0.5 / base.avg_spacing();
        let scale = base.heuristic_scale();
        let goal = *base.coord(target.index());

        let cost = |step: &Step| {
            let off_line = guide.distance(base.coord(step.from)) + guide.distance(base.coord(step.to));
            Some(step.length + penalty * step.length * off_line)
        };
        // Straight to the line, then along it. The penalty grows with edge
        // length but not with the off-line distance, so corrected lengths
        // may shrink this term but never enlarge it.
        let line_scale = scale.min(1.0);
        let heuristic = |v: usize| {
            let p = base.coord(v);
            let remain = (p - goal).norm();
            let to_line = guide.distance(p);
            let line_term = if remain < to_line {
                remain * (2.0 * to_line - remain)
            } else {
                to_line * to_line
            };
            scale * remain + penalty * line_scale * line_term
        };

        let mut scratch = self.lock();
        self.run_to_target(&mut scratch, source, target, smooth, &cost, &heuristic);
        Ok(finish_path(&scratch, target))
    }

    /// Least-cost path where the cost integrates `data` along the path.
    ///
    /// Data are rescaled to `[0, 1]` over the vertices in `roi` (all vertices
    /// without one), inverted when following the maximum. A mesh edge costs
    /// `length * (1 + strength * (value(a) + value(b)))`; a shortcut
    /// interpolates the value at the point where it crosses its mesh edge.
    /// With a ROI, the path stays inside it and an endpoint outside it gives
    /// an empty path.
    pub fn path_following_data(
        &self,
        source: VertexId,
        target: VertexId,
        data: &[f32],
        roi: Option<&[f32]>,
        options: &DataFollowOptions,
    ) -> Result<GeodesicPath> {
        let n = self.base.num_vertices();
        self.base.check_vertex(source)?;
        self.base.check_vertex(target)?;
        MeshError::check_length("data", n, data.len())?;
        if let Some(roi) = roi {
            MeshError::check_length("roi", n, roi.len())?;
            if !(roi[source.index()] > 0.0 && roi[target.index()] > 0.0) {
                return Ok(GeodesicPath::default());
            }
        }
        if !(options.follow_strength >= 0.0) {
            return Err(MeshError::invalid_param(
                "follow_strength",
                options.follow_strength,
                "strength must be non-negative",
            ));
        }

        let inside = |v: usize| roi.map_or(true, |r| r[v] > 0.0);
        let (lo, hi) = (0..n)
            .filter(|&v| inside(v))
            .map(|v| data[v])
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(x), hi.max(x))
            });
        let hi = if lo == hi { lo + 1.0 } else { hi };
        let range = hi - lo;
        let rescaled: Vec<f32> = (0..n)
            .map(|v| match (inside(v), options.follow_maximum) {
                (false, _) => 0.0,
                (true, true) => (hi - data[v]) / range,
                (true, false) => (data[v] - lo) / range,
            })
            .collect();

        let strength = options.follow_strength;
        let cost = |step: &Step| {
            if !inside(step.to) {
                return None;
            }
            let (a, b) = (rescaled[step.from], rescaled[step.to]);
            Some(match step.crossing {
                None => step.length * (1.0 + strength * (a + b)),
                Some(c) => {
                    let w = c.edge_weight;
                    let at_edge =
                        rescaled[c.edge[0].index()] * w + rescaled[c.edge[1].index()] * (1.0 - w);
                    step.length
                        + strength
                            * (a * c.pieces[0] + b * c.pieces[1] + step.length * at_edge)
                }
            })
        };
        // Data may be zero along the best path, so only distance is admissible.
        let heuristic = self.euclidean_heuristic(target.index());

        let mut scratch = self.lock();
        self.run_to_target(&mut scratch, source, target, options.smooth, &cost, &heuristic);
        Ok(finish_path(&scratch, target))
    }

    /// Path from the nearest of `starts` to the nearest of `ends`.
    ///
    /// Runs one search seeded at every start and stops at the first end
    /// vertex reached. Paths longer than `max_dist` are not considered. The
    /// path runs from a start vertex to an end vertex; it is empty if no end
    /// is reachable.
    pub fn path_between_sets(
        &self,
        starts: &[VertexId],
        ends: &[VertexId],
        max_dist: f32,
        smooth: bool,
    ) -> Result<GeodesicPath> {
        self.check_all(starts)?;
        self.check_all(ends)?;
        Self::check_radius(max_dist)?;

        let mut scratch = self.lock();
        for &s in starts {
            if !scratch.has(s.index(), HAS_VALUE) {
                scratch.seed(s.index(), 0.0);
            }
        }
        for &e in ends {
            scratch.mark(e.index(), STOP);
        }

        let mut reached = None;
        while let Some(v) = scratch.pop() {
            if scratch.has(v, STOP) {
                reached = Some(v);
                break;
            }
            scratch.relax(&self.base, v, smooth, max_dist, &length_cost, &no_heuristic);
        }

        Ok(match reached {
            Some(end) => trace_path(&scratch, end),
            None => GeodesicPath::default(),
        })
    }

    /// The vertex of `region` nearest to `source`, with its distance.
    ///
    /// A vertex is in the region when its mask entry is set. The search stops
    /// at the first region vertex popped and never goes past `max_dist`.
    pub fn closest_vertex_in_region(
        &self,
        source: VertexId,
        region: &[bool],
        max_dist: f32,
        smooth: bool,
    ) -> Result<Option<(VertexId, f32)>> {
        self.base.check_vertex(source)?;
        MeshError::check_length("region", self.base.num_vertices(), region.len())?;
        Self::check_radius(max_dist)?;

        let mut scratch = self.lock();
        Ok(self
            .search_region(&mut scratch, source, region, max_dist, smooth)
            .map(|v| (VertexId::new(v), scratch.output[v])))
    }

    /// Path from `source` to the nearest vertex of `region`.
    pub fn path_to_region(
        &self,
        source: VertexId,
        region: &[bool],
        smooth: bool,
    ) -> Result<GeodesicPath> {
        self.base.check_vertex(source)?;
        MeshError::check_length("region", self.base.num_vertices(), region.len())?;

        let mut scratch = self.lock();
        Ok(
            match self.search_region(&mut scratch, source, region, f32::INFINITY, smooth) {
                Some(end) => trace_path(&scratch, end),
                None => GeodesicPath::default(),
            },
        )
    }

    // ==================== Internals ====================

    fn search_region(
        &self,
        scratch: &mut Scratch,
        source: VertexId,
        region: &[bool],
        max_dist: f32,
        smooth: bool,
    ) -> Option<usize> {
        scratch.seed(source.index(), 0.0);
        while let Some(v) = scratch.pop() {
            if region[v] {
                return Some(v);
            }
            scratch.relax(&self.base, v, smooth, max_dist, &length_cost, &no_heuristic);
        }
        None
    }

    fn run_to_target<C, H>(
        &self,
        scratch: &mut Scratch,
        source: VertexId,
        target: VertexId,
        smooth: bool,
        cost: &C,
        heuristic: &H,
    ) where
        C: Fn(&Step) -> Option<f32>,
        H: Fn(usize) -> f32,
    {
        let target = target.index();
        scratch.seed(source.index(), heuristic(source.index()));
        while let Some(v) = scratch.pop() {
            if v == target {
                break;
            }
            scratch.relax(&self.base, v, smooth, f32::INFINITY, cost, heuristic);
        }
    }
}

impl Pooled for GeodesicQuery {
    type Base = GeodesicBase;

    fn pooled_base(&self) -> &Arc<GeodesicBase> {
        &self.base
    }
}

#[inline]
fn parent_of(raw: u32) -> Option<VertexId> {
    if raw == ROOT || raw == UNREACHED {
        None
    } else {
        Some(VertexId::new(raw as usize))
    }
}

fn trace_path(scratch: &Scratch, end: usize) -> GeodesicPath {
    let (vertices, distances) = scratch.trace(end);
    GeodesicPath {
        vertices,
        distances,
    }
}

fn finish_path(scratch: &Scratch, target: VertexId) -> GeodesicPath {
    if scratch.has(target.index(), FROZEN) {
        trace_path(scratch, target.index())
    } else {
        GeodesicPath::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_triangles, Surface};
    use approx::assert_relative_eq;

    // n x n grid of unit squares in the z = 0 plane, vertex (i, j) at index j * (n + 1) + i
    fn create_grid(n: usize) -> Surface {
        let mut vertices = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f32, j as f32, 0.0));
            }
        }
        let mut faces = Vec::new();
        let idx = |i: usize, j: usize| j * (n + 1) + i;
        for j in 0..n {
            for i in 0..n {
                faces.push([idx(i, j), idx(i + 1, j), idx(i + 1, j + 1)]);
                faces.push([idx(i, j), idx(i + 1, j + 1), idx(i, j + 1)]);
            }
        }
        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn vid(i: usize) -> VertexId {
        VertexId::new(i)
    }

    #[test]
    fn test_distances_from_source_on_grid() {
        let surface = create_grid(3);
        let query = surface.geodesic_query();
        let result = query.distances_from_source(vid(0), false).unwrap();

        assert_eq!(result.distance(vid(0)), 0.0);
        assert_relative_eq!(result.distance(vid(3)), 3.0, epsilon = 1e-6);
        // Diagonals run (i, j) -> (i + 1, j + 1)
        assert_relative_eq!(result.distance(vid(15)), 3.0 * 2.0f32.sqrt(), epsilon = 1e-5);
        assert_eq!(result.reachable_count(), 16);
        assert_eq!(result.parent(vid(0)), None);

        let path = result.path_to(vid(15)).unwrap();
        assert_eq!(path.first(), Some(&vid(0)));
        assert_eq!(path.last(), Some(&vid(15)));
    }

    #[test]
    fn test_shortcuts_never_lengthen() {
        let surface = create_grid(4);
        let query = surface.geodesic_query();
        let plain = query.distances_from_source(vid(2), false).unwrap();
        let smooth = query.distances_from_source(vid(2), true).unwrap();
        for v in surface.vertex_ids() {
            assert!(smooth.distance(v) <= plain.distance(v) + 1e-6);
        }
        // (2, 0) to (3, 2) is a knight's move: sqrt(5) with a shortcut, 1 + sqrt(2) without
        let knight = vid(2 * 5 + 3);
        assert_relative_eq!(smooth.distance(knight), 5.0f32.sqrt(), epsilon = 1e-5);
        assert_relative_eq!(plain.distance(knight), 1.0 + 2.0f32.sqrt(), epsilon = 1e-5);
    }

    #[test]
    fn test_within_radius_is_bounded_and_sorted() {
        let surface = create_grid(4);
        let query = surface.geodesic_query();
        let near = query.distances_within_radius(vid(12), 1.0, false).unwrap();

        assert_eq!(near.vertices[0], vid(12));
        assert_eq!(near.parents[0], None);
        assert!(near.distances.iter().all(|&d| d <= 1.0));
        assert!(near.distances.windows(2).all(|w| w[0] <= w[1]));
        // Centre plus its four axis neighbours
        assert_eq!(near.len(), 5);

        assert!(query.distances_within_radius(vid(12), -1.0, false).is_err());
        assert!(query.distances_within_radius(vid(12), f32::NAN, false).is_err());
    }

    #[test]
    fn test_distances_to_subset_matches_full_search() {
        let surface = create_grid(4);
        let query = surface.geodesic_query();
        let full = query.distances_from_source(vid(0), true).unwrap();
        let subset = [vid(24), vid(7), vid(7), vid(0)];
        let partial = query.distances_to_subset(vid(0), &subset, true).unwrap();
        for (v, d) in subset.iter().zip(&partial) {
            assert_relative_eq!(*d, full.distance(*v), epsilon = 1e-6);
        }
        assert!(query.distances_to_subset(vid(0), &[], true).unwrap().is_empty());
    }

    #[test]
    fn test_shortest_path_matches_dijkstra() {
        let surface = create_grid(5);
        let query = surface.geodesic_query();
        for smooth in [false, true] {
            let path = query.shortest_path(vid(1), vid(33), smooth).unwrap();
            let full = query.distances_from_source(vid(1), smooth).unwrap();
            assert_eq!(path.start(), Some(vid(1)));
            assert_eq!(path.end(), Some(vid(33)));
            assert_relative_eq!(path.length().unwrap(), full.distance(vid(33)), epsilon = 1e-5);
        }

        let same = query.shortest_path(vid(4), vid(4), true).unwrap();
        assert_eq!(same.vertices, vec![vid(4)]);
        assert_eq!(same.distances, vec![0.0]);
    }

    #[test]
    fn test_disconnected_path_is_empty() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(6.0, 0.0, 0.0),
            Point3::new(5.0, 1.0, 0.0),
        ];
        let surface = build_from_triangles(&vertices, &[[0, 1, 2], [3, 4, 5]]).unwrap();
        let query = surface.geodesic_query();
        assert!(query.shortest_path(vid(0), vid(4), true).unwrap().is_empty());

        let full = query.distances_from_source(vid(0), true).unwrap();
        assert!(!full.is_reachable(vid(4)));
        assert_eq!(full.reachable_count(), 3);
        assert!(full.path_to(vid(4)).is_none());

        // A later query on the same object is unaffected
        let path = query.shortest_path(vid(3), vid(5), false).unwrap();
        assert_eq!(path.vertices, vec![vid(3), vid(5)]);
    }

    #[test]
    fn test_path_along_line_hugs_the_line() {
        let surface = create_grid(4);
        let query = surface.geodesic_query();
        // Guide along the bottom row, which is also the shortest route
        let guide = GuideLine::Line(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0));
        let path = query
            .shortest_path_along_line(vid(0), vid(4), &guide, false)
            .unwrap();
        let expected: Vec<_> = (0..=4).map(vid).collect();
        assert_eq!(path.vertices, expected);

        // A guide through the second row pulls the path up off the bottom row
        let second = GuideLine::Segment(Point3::new(0.0, 1.0, 0.0), Point3::new(4.0, 1.0, 0.0));
        let pulled = query
            .shortest_path_along_line(vid(0), vid(4), &second, false)
            .unwrap();
        assert_eq!(pulled.start(), Some(vid(0)));
        assert_eq!(pulled.end(), Some(vid(4)));
        assert!(pulled.vertices.iter().any(|v| v.index() >= 5));
    }

    #[test]
    fn test_path_along_line_optimal_with_stretched_lengths() {
        let surface = create_grid(6);
        let stretched: Vec<f32> = surface.vertex_areas().iter().map(|a| a * 4.0).collect();
        let base = Arc::new(GeodesicBase::with_corrected_areas(&surface, &stretched).unwrap());
        assert!(base.heuristic_scale() > 1.0);
        let query = GeodesicQuery::new(Arc::clone(&base));

        // Start three rows up, finish on the guide
        let guide = GuideLine::Line(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0));
        let (source, target) = (vid(3 * 7), vid(6));
        for smooth in [false, true] {
            let path = query
                .shortest_path_along_line(source, target, &guide, smooth)
                .unwrap();

            // Same cost searched without a heuristic
            let penalty = 0.5 / base.avg_spacing();
            let cost = |step: &Step| {
                let off_line =
                    guide.distance(base.coord(step.from)) + guide.distance(base.coord(step.to));
                Some(step.length + penalty * step.length * off_line)
            };
            let mut scratch = query.lock();
            query.run_to_target(&mut scratch, source, target, smooth, &cost, &no_heuristic);
            let reference = finish_path(&scratch, target);
            drop(scratch);

            assert_relative_eq!(
                path.length().unwrap(),
                reference.length().unwrap(),
                max_relative = 1e-5
            );
        }
    }

    #[test]
    fn test_path_following_data_prefers_low_values() {
        let surface = create_grid(4);
        let query = surface.geodesic_query();
        // High everywhere except the top row
        let data: Vec<f32> = (0..25).map(|v| if v >= 20 { 0.0 } else { 10.0 }).collect();
        let options = DataFollowOptions::default().with_strength(20.0).with_smooth(false);

        let path = query
            .path_following_data(vid(20), vid(24), &data, None, &options)
            .unwrap();
        assert_eq!(path.vertices, (20..25).map(vid).collect::<Vec<_>>());

        // Following the maximum avoids the top row
        let options = options.with_follow_maximum(true);
        let path = query
            .path_following_data(vid(0), vid(4), &data, None, &options)
            .unwrap();
        assert!(path.vertices.iter().all(|v| v.index() < 20));
    }

    #[test]
    fn test_path_following_data_respects_roi() {
        let surface = create_grid(4);
        let query = surface.geodesic_query();
        let data = vec![1.0; 25];
        // Only the left column and top row are in the ROI
        let roi: Vec<f32> = (0..25)
            .map(|v| if v % 5 == 0 || v >= 20 { 1.0 } else { 0.0 })
            .collect();
        let options = DataFollowOptions::default();

        let path = query
            .path_following_data(vid(0), vid(24), &data, Some(&roi), &options)
            .unwrap();
        assert!(path.vertices.iter().all(|v| roi[v.index()] > 0.0));
        assert_eq!(path.end(), Some(vid(24)));

        // Endpoint outside the ROI gives no path
        let outside = query
            .path_following_data(vid(0), vid(12), &data, Some(&roi), &options)
            .unwrap();
        assert!(outside.is_empty());

        let err = query
            .path_following_data(vid(0), vid(24), &data[..3], None, &options)
            .unwrap_err();
        assert!(matches!(err, MeshError::LengthMismatch { .. }));
    }

    #[test]
    fn test_closest_vertex_in_region() {
        let surface = create_grid(4);
        let query = surface.geodesic_query();
        let mut region = vec![false; 25];
        region[4] = true;
        region[24] = true;

        let (v, d) = query
            .closest_vertex_in_region(vid(2), &region, f32::INFINITY, false)
            .unwrap()
            .unwrap();
        assert_eq!(v, vid(4));
        assert_relative_eq!(d, 2.0, epsilon = 1e-6);

        assert!(query
            .closest_vertex_in_region(vid(2), &region, 1.5, false)
            .unwrap()
            .is_none());

        let path = query.path_to_region(vid(2), &region, false).unwrap();
        assert_eq!(path.vertices, vec![vid(2), vid(3), vid(4)]);
    }

    #[test]
    fn test_path_between_sets() {
        let surface = create_grid(4);
        let query = surface.geodesic_query();
        let starts = [vid(0), vid(20)];
        let ends = [vid(22), vid(4)];
        let path = query
            .path_between_sets(&starts, &ends, f32::INFINITY, false)
            .unwrap();
        // (0, 4) to (2, 4) is the closest pair
        assert_eq!(path.start(), Some(vid(20)));
        assert_eq!(path.end(), Some(vid(22)));
        assert_relative_eq!(path.length().unwrap(), 2.0, epsilon = 1e-6);

        let none = query.path_between_sets(&starts, &ends, 1.0, false).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_out_of_range_vertex() {
        let surface = create_grid(1);
        let query = surface.geodesic_query();
        assert!(matches!(
            query.distances_from_source(vid(4), true),
            Err(MeshError::VertexOutOfRange { vertex: 4, .. })
        ));
        assert!(query.shortest_path(vid(0), vid(9), true).is_err());
    }
}
