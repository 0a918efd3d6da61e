//! Scratch state and the relaxation loop shared by all searches.

use super::base::{Crossing, GeodesicBase};
use crate::algo::heap::IndexedMinHeap;
use crate::mesh::VertexId;

/// Finalized; never relaxed again.
pub(crate) const FROZEN: u8 = 1;
/// A vertex the caller is waiting for.
pub(crate) const INTERESTED: u8 = 2;
/// `output` holds a tentative distance.
pub(crate) const HAS_VALUE: u8 = 4;
/// Popping this vertex ends the search.
pub(crate) const STOP: u8 = 8;

/// Parent of a search root.
pub(crate) const ROOT: u32 = u32::MAX;
/// Parent of a vertex the search never reached.
pub(crate) const UNREACHED: u32 = u32::MAX - 1;

/// An edge as seen by a cost function.
pub(crate) struct Step {
    pub from: usize,
    pub to: usize,
    pub length: f32,
    /// Set for shortcut edges.
    pub crossing: Option<Crossing>,
}

/// Per-query buffers, sized to the vertex count and reset after each search.
#[derive(Debug)]
pub(crate) struct Scratch {
    pub output: Vec<f32>,
    pub parent: Vec<u32>,
    pub marks: Vec<u8>,
    heuristic: Vec<f32>,
    changed: Vec<u32>,
    pub heap: IndexedMinHeap,
}

impl Scratch {
    pub fn new(num_vertices: usize) -> Self {
        Self {
            output: vec![0.0; num_vertices],
            parent: vec![UNREACHED; num_vertices],
            marks: vec![0; num_vertices],
            heuristic: vec![0.0; num_vertices],
            changed: Vec::new(),
            heap: IndexedMinHeap::new(num_vertices),
        }
    }

    /// Set mark bits, remembering the vertex for [`Scratch::reset`].
    #[inline]
    pub fn mark(&mut self, v: usize, bits: u8) {
        if self.marks[v] == 0 {
            self.changed.push(v as u32);
        }
        self.marks[v] |= bits;
    }

    #[inline]
    pub fn has(&self, v: usize, bits: u8) -> bool {
        self.marks[v] & bits != 0
    }

    /// Seed a root with distance zero.
    pub fn seed(&mut self, root: usize, heuristic: f32) {
        self.output[root] = 0.0;
        self.parent[root] = ROOT;
        self.heuristic[root] = heuristic;
        self.mark(root, HAS_VALUE);
        self.heap.push(root, heuristic);
    }

    /// Pop the next vertex and freeze it.
    #[inline]
    pub fn pop(&mut self) -> Option<usize> {
        let (v, _) = self.heap.pop()?;
        self.marks[v] |= FROZEN;
        Some(v)
    }

    /// Relax every edge out of `node`.
    ///
    /// `cost` returns the cost of a step, or `None` to skip it; `heuristic`
    /// is evaluated once per vertex when it first gets a value. Tentative
    /// distances above `limit` are dropped.
    pub fn relax<C, H>(
        &mut self,
        base: &GeodesicBase,
        node: usize,
        smooth: bool,
        limit: f32,
        cost: &C,
        heuristic: &H,
    ) where
        C: Fn(&Step) -> Option<f32>,
        H: Fn(usize) -> f32,
    {
        let links = base.neighbor_links(node);
        for link in links {
            let step = Step {
                from: node,
                to: link.target.index(),
                length: link.length,
                crossing: None,
            };
            self.update(&step, limit, cost, heuristic);
        }
        if smooth {
            let links = base.shortcut_links(node);
            let crossings = base.shortcut_crossings(node);
            for (link, crossing) in links.iter().zip(crossings) {
                let step = Step {
                    from: node,
                    to: link.target.index(),
                    length: link.length,
                    crossing: Some(*crossing),
                };
                self.update(&step, limit, cost, heuristic);
            }
        }
    }

    #[inline]
    fn update<C, H>(&mut self, step: &Step, limit: f32, cost: &C, heuristic: &H)
    where
        C: Fn(&Step) -> Option<f32>,
        H: Fn(usize) -> f32,
    {
        let to = step.to;
        if self.has(to, FROZEN) {
            return;
        }
        let Some(step_cost) = cost(step) else {
            return;
        };
        let tentative = self.output[step.from] + step_cost;
        if tentative > limit {
            return;
        }
        if !self.has(to, HAS_VALUE) {
            let h = heuristic(to);
            self.heuristic[to] = h;
            self.output[to] = tentative;
            self.parent[to] = step.from as u32;
            self.mark(to, HAS_VALUE);
            self.heap.push(to, tentative + h);
        } else if tentative < self.output[to] {
            self.output[to] = tentative;
            self.parent[to] = step.from as u32;
            self.heap.change_key(to, tentative + self.heuristic[to]);
        }
    }

    /// Walk parents from `end` back to a root, returning the path root-first.
    pub fn trace(&self, end: usize) -> (Vec<VertexId>, Vec<f32>) {
        let mut vertices = Vec::new();
        let mut current = end as u32;
        while current != ROOT && current != UNREACHED && vertices.len() <= self.parent.len() {
            vertices.push(VertexId::new(current as usize));
            current = self.parent[current as usize];
        }
        vertices.reverse();
        let distances = vertices.iter().map(|v| self.output[v.index()]).collect();
        (vertices, distances)
    }

    /// Clear marks, parents and the heap for every vertex the last search touched.
    pub fn reset(&mut self) {
        for &v in &self.changed {
            self.marks[v as usize] = 0;
            self.parent[v as usize] = UNREACHED;
        }
        self.changed.clear();
        self.heap.clear();
    }
}

/// Plain edge length.
#[inline]
pub(crate) fn length_cost(step: &Step) -> Option<f32> {
    Some(step.length)
}

/// No heuristic (Dijkstra).
#[inline]
pub(crate) fn no_heuristic(_: usize) -> f32 {
    0.0
}
