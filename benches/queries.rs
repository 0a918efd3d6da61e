//! Benchmarks for index construction and per-query cost.

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Point3;
use sulcus::prelude::*;

fn create_icosphere(subdivisions: usize) -> Surface {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
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
    .map(|&(x, y, z)| Point3::from(nalgebra::Vector3::new(x, y, z).normalize()))
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
                let (a, b) = (face[i], face[(i + 1) % 3]);
                mids[i] = *midpoints.entry((a.min(b), a.max(b))).or_insert_with(|| {
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

fn bench_index_construction(c: &mut Criterion) {
    let surface = create_icosphere(4);
    let triangles: Vec<[usize; 3]> = surface
        .triangles()
        .iter()
        .map(|t| t.map(|v| v.index()))
        .collect();

    c.bench_function("topology_base_sorted", |b| {
        b.iter(|| TopologyBase::new(surface.num_vertices(), black_box(&triangles), true))
    });

    c.bench_function("geodesic_base", |b| {
        b.iter(|| GeodesicBase::new(black_box(&surface)))
    });

    c.bench_function("signed_distance_base", |b| {
        b.iter(|| SignedDistanceBase::new(black_box(&surface), &OctreeOptions::default()))
    });
}

fn bench_queries(c: &mut Criterion) {
    let surface = create_icosphere(4);
    let geodesic = surface.geodesic_query();
    let signed = surface.signed_distance_query();

    c.bench_function("distances_from_source", |b| {
        b.iter(|| geodesic.distances_from_source(black_box(VertexId::new(0)), true))
    });

    c.bench_function("distances_within_radius", |b| {
        b.iter(|| geodesic.distances_within_radius(black_box(VertexId::new(0)), 0.3, true))
    });

    c.bench_function("shortest_path_antipodal", |b| {
        b.iter(|| geodesic.shortest_path(VertexId::new(0), black_box(VertexId::new(3)), true))
    });

    let probes: Vec<Point3<f32>> = (0..64)
        .map(|i| {
            let t = i as f32 * 0.37;
            Point3::new(t.sin() * 1.3, t.cos() * 0.8, (t * 0.5).sin())
        })
        .collect();
    c.bench_function("signed_distance_64_points", |b| {
        b.iter(|| {
            probes
                .iter()
                .map(|p| signed.signed_distance(p, SignPolicy::EvenOdd).unwrap_or(0.0))
                .sum::<f32>()
        })
    });
}

fn bench_smoothing(c: &mut Criterion) {
    let surface = create_icosphere(3);
    let options = KernelOptions::default().with_sigma(0.15);

    c.bench_function("smoothing_kernel_area", |b| {
        b.iter(|| SmoothingKernel::new(black_box(&surface), &options, None))
    });

    let kernel = SmoothingKernel::new(&surface, &options, None).unwrap();
    let data = Metric::from_values(surface.coordinates().iter().map(|p| p.z).collect());
    c.bench_function("smooth_column", |b| {
        b.iter(|| kernel.smooth_column(black_box(&data), 0, None, false))
    });
}

criterion_group!(benches, bench_index_construction, bench_queries, bench_smoothing);
criterion_main!(benches);
