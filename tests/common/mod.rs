//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, VecDeque};

use nalgebra::{Point3, Vector3};
use sulcus::prelude::*;

/// Unit icosphere. `subdivisions = 3` gives 642 vertices.
pub fn icosphere(subdivisions: usize) -> Surface {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let scale = 1.0 / (1.0 + phi * phi).sqrt();

    let mut vertices: Vec<Point3<f32>> = [
        (-1.0, phi, 0.0),
        (1.0, phi, 0.0),
        (-1.0, -phi, 0.0),
        (1.0, -phi, 0.0),
        (0.0, -1.0, phi),
        (0.0, 1.0, phi),
        (0.0, -1.0, -phi),
        (0.0, 1.0, -phi),
        (phi, 0.0, -1.0),
        (phi, 0.0, 1.0),
        (-phi, 0.0, -1.0),
        (-phi, 0.0, 1.0),
    ]
    .iter()
    .map(|&(x, y, z)| Point3::new(x * scale, y * scale, z * scale))
    .collect();

    let mut faces = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut next = Vec::with_capacity(faces.len() * 4);
        let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
        for face in &faces {
            let mut mids = [0usize; 3];
            for i in 0..3 {
                let a = face[i];
                let b = face[(i + 1) % 3];
                let key = (a.min(b), a.max(b));
                mids[i] = *midpoints.entry(key).or_insert_with(|| {
                    let mid = (vertices[a].coords + vertices[b].coords) / 2.0;
                    vertices.push(Point3::from(mid.normalize()));
                    vertices.len() - 1
                });
            }
            next.push([face[0], mids[0], mids[2]]);
            next.push([face[1], mids[1], mids[0]]);
            next.push([face[2], mids[2], mids[1]]);
            next.push([mids[0], mids[1], mids[2]]);
        }
        faces = next;
    }

    build_from_triangles(&vertices, &faces).unwrap()
}

/// Flat `n` x `n` grid of unit squares in the xy plane, two triangles each.
pub fn grid(n: usize) -> Surface {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f32, j as f32, 0.0));
        }
    }

    let mut faces = Vec::with_capacity(2 * n * n);
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;
            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    build_from_triangles(&vertices, &faces).unwrap()
}

/// Closed unit cube `[0, 1]^3` with outward-facing triangles.
pub fn cube() -> Surface {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(0.0, 1.0, 1.0),
    ];
    let faces = vec![
        [0, 2, 1],
        [0, 3, 2],
        [4, 5, 6],
        [4, 6, 7],
        [0, 1, 5],
        [0, 5, 4],
        [2, 3, 7],
        [2, 7, 6],
        [1, 2, 6],
        [1, 6, 5],
        [0, 4, 7],
        [0, 7, 3],
    ];
    build_from_triangles(&vertices, &faces).unwrap()
}

/// Hop distance from `source` to every vertex by plain breadth-first search.
pub fn hop_distances(surface: &Surface, source: usize) -> Vec<Option<usize>> {
    let mut adjacency = vec![Vec::new(); surface.num_vertices()];
    for tri in surface.triangles() {
        for i in 0..3 {
            let a = tri[i].index();
            let b = tri[(i + 1) % 3].index();
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
    }

    let mut hops = vec![None; surface.num_vertices()];
    hops[source] = Some(0);
    let mut queue = VecDeque::from([source]);
    while let Some(v) = queue.pop_front() {
        let next = hops[v].map(|h| h + 1);
        for &n in &adjacency[v] {
            if hops[n].is_none() {
                hops[n] = next;
                queue.push_back(n);
            }
        }
    }
    hops
}

#[derive(PartialEq)]
struct Visit(f64, usize);

impl Eq for Visit {}

impl Ord for Visit {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.total_cmp(&self.0).then_with(|| self.1.cmp(&other.1))
    }
}

impl PartialOrd for Visit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra over mesh edges only, in double precision.
pub fn edge_dijkstra(surface: &Surface, source: usize) -> Vec<f64> {
    let coords = surface.coordinates();
    let mut adjacency = vec![Vec::new(); surface.num_vertices()];
    for tri in surface.triangles() {
        for i in 0..3 {
            let a = tri[i].index();
            let b = tri[(i + 1) % 3].index();
            let length = f64::from((coords[a] - coords[b]).norm());
            adjacency[a].push((b, length));
            adjacency[b].push((a, length));
        }
    }

    let mut dist = vec![f64::INFINITY; surface.num_vertices()];
    let mut heap = BinaryHeap::new();
    dist[source] = 0.0;
    heap.push(Visit(0.0, source));
    while let Some(Visit(d, v)) = heap.pop() {
        if d > dist[v] {
            continue;
        }
        for &(n, length) in &adjacency[v] {
            let candidate = d + length;
            if candidate < dist[n] {
                dist[n] = candidate;
                heap.push(Visit(candidate, n));
            }
        }
    }
    dist
}

/// Distance from `p` to triangle `abc` (region test after Ericson, Real-Time
/// Collision Detection 5.1.5).
pub fn point_triangle_distance(
    p: &Point3<f32>,
    a: &Point3<f32>,
    b: &Point3<f32>,
    c: &Point3<f32>,
) -> f32 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return ap.norm();
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return bp.norm();
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let t = d1 / (d1 - d3);
        return (p - (a + ab * t)).norm();
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return cp.norm();
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let t = d2 / (d2 - d6);
        return (p - (a + ac * t)).norm();
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let t = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return (p - (b + (c - b) * t)).norm();
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    let closest: Point3<f32> = a + ab * v + ac * w;
    (p - closest).norm()
}

/// Unsigned distance from `p` to the nearest triangle of `surface`, by
/// checking every triangle.
pub fn brute_force_distance(surface: &Surface, p: &Point3<f32>) -> f32 {
    surface
        .face_ids()
        .map(|f| {
            let [a, b, c] = surface.triangle_positions(f);
            point_triangle_distance(p, &a, &b, &c)
        })
        .fold(f32::INFINITY, f32::min)
}

/// Deterministic scatter of points in a box, for tests that need many queries.
pub fn scattered_points(count: usize, half_extent: f32) -> Vec<Point3<f32>> {
    let mut state = 0x2545_f491_u32;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state as f32 / u32::MAX as f32) * 2.0 - 1.0
    };
    (0..count)
        .map(|_| Point3::from(Vector3::new(next(), next(), next()) * half_extent))
        .collect()
}
