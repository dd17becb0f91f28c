// Copyright 2025 the Box Cluster Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use box_cluster::{Aabb3D, BoxClusterer, ClusterConfig, FlatClusterer};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

fn gen_grid_boxes(n: usize, cell: f64, size: f64) -> Vec<Aabb3D<f64>> {
    let mut out = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let x0 = x as f64 * cell;
                let y0 = y as f64 * cell;
                let z0 = z as f64 * cell;
                out.push(Aabb3D::from_origin_size(x0, y0, z0, size, size, size));
            }
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// Objects scattered around a few hot spots, like the parts of a few pieces of equipment.
fn gen_clustered_boxes(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Aabb3D<f64>> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((
            rng.next_f64() * 2000.0,
            rng.next_f64() * 2000.0,
            rng.next_f64() * 200.0,
        ));
    }
    for (cx, cy, cz) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            let dz = (rng.next_f64() - 0.5) * spread;
            out.push(Aabb3D::from_origin_size(cx + dx, cy + dy, cz + dz, 4.0, 4.0, 4.0));
        }
    }
    out
}

fn bench_add_boxes(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_boxes");
    for &n in &[8usize, 16, 24] {
        let boxes = gen_grid_boxes(n, 10.0, 6.0);
        group.throughput(Throughput::Elements((n * n * n) as u64));
        group.bench_function(format!("rtree_grid_n{}", n), |b| {
            b.iter_batched(
                BoxClusterer::<f64>::new,
                |mut clusterer| {
                    clusterer.add_boxes(boxes.iter().copied()).unwrap();
                    black_box(clusterer.box_count());
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("flat_grid_n{}", n), |b| {
            b.iter_batched(
                FlatClusterer::<f64>::new,
                |mut clusterer| {
                    clusterer.add_boxes(boxes.iter().copied()).unwrap();
                    black_box(clusterer.box_count());
                },
                BatchSize::SmallInput,
            )
        });
    }
    for &cap in &[4usize, 8, 16] {
        let boxes = gen_clustered_boxes(32, 128, 60.0);
        let cfg = ClusterConfig::with_max_leaf_boxes(cap).unwrap();
        group.bench_function(format!("rtree_clustered_leaf{}", cap), |b| {
            b.iter_batched(
                || BoxClusterer::<f64>::with_config(cfg),
                |mut clusterer| {
                    clusterer.add_boxes(boxes.iter().copied()).unwrap();
                    black_box(clusterer.clusters().count());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_intersects_box(c: &mut Criterion) {
    let mut group = c.benchmark_group("intersects_box");
    let boxes = gen_clustered_boxes(64, 64, 80.0);
    let tree = BoxClusterer::from_boxes(boxes.iter().copied()).unwrap();
    let flat = FlatClusterer::from_boxes(boxes.iter().copied()).unwrap();
    let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
    let queries: Vec<_> = (0..256)
        .map(|_| {
            Aabb3D::from_origin_size(
                rng.next_f64() * 2000.0,
                rng.next_f64() * 2000.0,
                rng.next_f64() * 200.0,
                50.0,
                50.0,
                50.0,
            )
        })
        .collect();
    group.throughput(Throughput::Elements(queries.len() as u64));
    group.bench_function("rtree", |b| {
        b.iter(|| {
            let hits = queries.iter().filter(|q| tree.intersects_box(q)).count();
            black_box(hits);
        })
    });
    group.bench_function("flat", |b| {
        b.iter(|| {
            let hits = queries.iter().filter(|q| flat.intersects_box(q)).count();
            black_box(hits);
        })
    });
    group.finish();
}

fn bench_set_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_operations");
    let a = BoxClusterer::from_boxes(gen_clustered_boxes(32, 64, 60.0)).unwrap();
    let b = BoxClusterer::from_boxes(gen_grid_boxes(12, 150.0, 40.0)).unwrap();
    group.bench_function("union", |bench| {
        bench.iter(|| black_box(a.union(&b).box_count()))
    });
    group.bench_function("intersection", |bench| {
        bench.iter(|| black_box(a.intersection(&b).box_count()))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_add_boxes,
    bench_intersects_box,
    bench_set_operations
);
criterion_main!(benches);
