//! Octree over triangle bounding boxes.

use nalgebra::Point3;
use tracing::{debug, warn};

use super::OctreeOptions;

/// Axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// Bounding box of a set of points.
    pub fn around(points: &[Point3<f32>]) -> Self {
        let mut min = points[0];
        let mut max = points[0];
        for p in &points[1..] {
            min = min.inf(p);
            max = max.sup(p);
        }
        Self { min, max }
    }

    #[inline]
    fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Distance from `p` to the box, zero inside it.
    #[inline]
    pub fn distance_to(&self, p: &Point3<f32>) -> f32 {
        let below = self.min - p;
        let above = p - self.max;
        below.sup(&above).sup(&nalgebra::Vector3::zeros()).norm()
    }

    /// Closed-interval overlap test.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        (0..3).all(|a| self.min[a] <= other.max[a] && other.min[a] <= self.max[a])
    }

    /// Child octant holding `p`, as `x * 4 + y * 2 + z` with each bit set
    /// when `p` is on the upper side of the centre.
    #[inline]
    fn octant_of(&self, p: &Point3<f32>) -> [usize; 3] {
        let c = self.center();
        [
            usize::from(p.x >= c.x),
            usize::from(p.y >= c.y),
            usize::from(p.z >= c.z),
        ]
    }

    fn child(&self, octant: usize) -> Aabb {
        let c = self.center();
        let mut min = self.min;
        let mut max = c;
        for axis in 0..3 {
            if octant & (4 >> axis) != 0 {
                min[axis] = c[axis];
                max[axis] = self.max[axis];
            }
        }
        Aabb { min, max }
    }

    /// True if the ray from `origin` going in +Z can hit the box.
    #[inline]
    pub fn hit_by_ray_up(&self, origin: &Point3<f32>) -> bool {
        origin.x >= self.min.x
            && origin.x <= self.max.x
            && origin.y >= self.min.y
            && origin.y <= self.max.y
            && origin.z <= self.max.z
    }
}

#[derive(Debug)]
pub(crate) enum NodeKind {
    Leaf(Vec<u32>),
    Branch([u32; 8]),
}

#[derive(Debug)]
pub(crate) struct Node {
    pub bounds: Aabb,
    pub kind: NodeKind,
}

/// Octree whose leaves list every triangle whose bounding box overlaps them.
///
/// A triangle may sit in several leaves. Node 0 is the root.
#[derive(Debug)]
pub(crate) struct Octree {
    nodes: Vec<Node>,
}

impl Octree {
    pub const ROOT: u32 = 0;

    /// Insert every triangle box into an octree spanning `bounds`.
    pub fn build(bounds: Aabb, boxes: &[Aabb], options: &OctreeOptions) -> Self {
        let interval = if options.split_test_interval == 0 {
            warn!("octree split test interval is zero, testing on every insert");
            1
        } else {
            options.split_test_interval
        };
        let mut builder = Builder {
            nodes: vec![Node {
                bounds,
                kind: NodeKind::Leaf(Vec::new()),
            }],
            boxes,
            options,
            interval,
            capped: 0,
        };
        for tri in 0..boxes.len() {
            builder.insert(Self::ROOT, tri as u32, 0);
        }

        if builder.capped > 0 {
            warn!(
                leaves = builder.capped,
                max_depth = options.max_depth,
                "octree leaves hit the depth cap"
            );
        }
        let tree = Octree {
            nodes: builder.nodes,
        };
        debug!(
            nodes = tree.nodes.len(),
            leaves = tree.num_leaves(),
            entries = tree.num_entries(),
            "built octree"
        );
        tree
    }

    #[inline]
    pub fn node(&self, index: u32) -> &Node {
        &self.nodes[index as usize]
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Leaf(_)))
            .count()
    }

    /// Total triangle references over all leaves.
    pub fn num_entries(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| match &n.kind {
                NodeKind::Leaf(tris) => tris.len(),
                NodeKind::Branch(_) => 0,
            })
            .sum()
    }
}

struct Builder<'a> {
    nodes: Vec<Node>,
    boxes: &'a [Aabb],
    options: &'a OctreeOptions,
    interval: usize,
    capped: usize,
}

impl Builder<'_> {
    fn insert(&mut self, node: u32, tri: u32, depth: usize) {
        let bbox = self.boxes[tri as usize];
        match &mut self.nodes[node as usize].kind {
            NodeKind::Branch(children) => {
                let children = *children;
                for child in children {
                    if self.nodes[child as usize].bounds.overlaps(&bbox) {
                        self.insert(child, tri, depth + 1);
                    }
                }
            }
            NodeKind::Leaf(tris) => {
                tris.push(tri);
                let count = tris.len();
                let threshold = self.options.split_threshold;
                if count >= threshold && count % self.interval == threshold % self.interval {
                    if depth >= self.options.max_depth {
                        self.capped += 1;
                    } else if self.worth_splitting(node) {
                        self.split(node, depth);
                    }
                }
            }
        }
    }

    /// Trial classification: each triangle would land in 1, 2, 4 or 8
    /// children. Split when some triangle lands in fewer than 8 and the
    /// total stays under `max_duplication` times the current count.
    fn worth_splitting(&self, node: u32) -> bool {
        let Node { bounds, kind } = &self.nodes[node as usize];
        let NodeKind::Leaf(tris) = kind else {
            return false;
        };
        let mut total = 0usize;
        let mut narrowed = 0usize;
        for &t in tris {
            let bbox = &self.boxes[t as usize];
            let lo = bounds.octant_of(&bbox.min);
            let hi = bounds.octant_of(&bbox.max);
            let spread = (0..3).filter(|&a| lo[a] != hi[a]).count();
            let size = 1usize << spread;
            total += size;
            if size != 8 {
                narrowed += 1;
            }
        }
        narrowed > 0 && (total as f32) < self.options.max_duplication * tris.len() as f32
    }

    fn split(&mut self, node: u32, depth: usize) {
        let bounds = self.nodes[node as usize].bounds;
        let first = self.nodes.len() as u32;
        let mut children = [0u32; 8];
        for (octant, child) in children.iter_mut().enumerate() {
            *child = first + octant as u32;
            self.nodes.push(Node {
                bounds: bounds.child(octant),
                kind: NodeKind::Leaf(Vec::new()),
            });
        }
        let old = std::mem::replace(
            &mut self.nodes[node as usize].kind,
            NodeKind::Branch(children),
        );
        if let NodeKind::Leaf(tris) = old {
            for tri in tris {
                let bbox = self.boxes[tri as usize];
                for child in children {
                    if self.nodes[child as usize].bounds.overlaps(&bbox) {
                        self.insert(child, tri, depth + 1);
                    }
                }
            }
        }
    }
}
