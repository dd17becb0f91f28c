// Copyright 2025 the Box Cluster Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use box_cluster::{Aabb3D, BoxClusterer};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

fn gen_grid_boxes(n: usize, cell: f64) -> Vec<Aabb3D<f64>> {
    let mut out = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let x0 = x as f64 * cell;
                let y0 = y as f64 * cell;
                let z0 = z as f64 * cell;
                out.push(Aabb3D::from_origin_size(x0, y0, z0, cell, cell, cell));
            }
        }
    }
    out
}

fn to_rstar_boxes(v: &[Aabb3D<f64>]) -> Vec<Rectangle<[f64; 3]>> {
    v.iter()
        .map(|r| {
            Rectangle::from_corners([r.min_x, r.min_y, r.min_z], [r.max_x, r.max_y, r.max_z])
        })
        .collect()
}

fn bench_rtree_external_compare_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_external_compare_f64");
    for &n in &[12usize, 20] {
        let boxes = gen_grid_boxes(n, 10.0);
        let query = Aabb3D::<f64>::from_origin_size(30.0, 30.0, 30.0, 40.0, 40.0, 40.0);
        group.throughput(Throughput::Elements((n * n * n) as u64));

        group.bench_function(format!("box_cluster_build_query_n{}", n), |b| {
            b.iter_batched(
                BoxClusterer::<f64>::new,
                |mut clusterer| {
                    clusterer.add_boxes(boxes.iter().copied()).unwrap();
                    let hits: usize = clusterer.query_box(query).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_insert_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_boxes(&boxes),
                |rectangles| {
                    let mut tree = RTree::new();
                    for r in rectangles {
                        tree.insert(r);
                    }
                    let aabb = AABB::from_corners(
                        [query.min_x, query.min_y, query.min_z],
                        [query.max_x, query.max_y, query.max_z],
                    );
                    let hits: usize = tree.locate_in_envelope_intersecting(&aabb).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rtree_external_compare_f64);
criterion_main!(benches);
