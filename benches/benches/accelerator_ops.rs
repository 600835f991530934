// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use quadrant_geometry::{Aabb3, Vec3};
use quadrant_tree::{Accelerator, NoopBuilder, Point, PointId, TreeConfig};

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

const EXTENT: f64 = 1000.0;

fn gen_random_points(count: usize, seed: u64) -> Vec<Point> {
    let mut rng = Rng::new(seed);
    (0..count as u64)
        .map(|i| {
            let x = rng.next_f64() * EXTENT;
            let y = rng.next_f64() * EXTENT;
            let z = rng.next_f64() * 10.0;
            Point::new(i, x, y, z)
        })
        .collect()
}

fn bounds() -> Aabb3 {
    Aabb3::new(Vec3::ZERO, Vec3::new(EXTENT, EXTENT, 10.0))
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[1_000_usize, 10_000] {
        let points = gen_random_points(n, 0x9e37_79b9);
        group.throughput(Throughput::Elements(n as u64));
        for capacity in [1_usize, 8] {
            let config = TreeConfig::default().with_capacity(capacity);
            group.bench_function(format!("bulk_n{n}_cap{capacity}"), |b| {
                b.iter_batched(
                    || points.clone(),
                    |pts| black_box(Accelerator::new(pts, config).unwrap()),
                    BatchSize::SmallInput,
                );
            });
        }
        group.bench_function(format!("incremental_n{n}"), |b| {
            // An empty tree gets a shallow depth limit, so set one explicitly.
            let config = TreeConfig::default().with_capacity(8).with_max_depth(8);
            b.iter_batched(
                || {
                    Accelerator::from_parts(Vec::new(), Some(bounds()), config, NoopBuilder)
                        .unwrap()
                },
                |mut acc| {
                    for p in &points {
                        acc.add_point(*p);
                    }
                    black_box(acc)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let n = 10_000_usize;
    let acc = Accelerator::new(gen_random_points(n, 7), TreeConfig::default().with_capacity(4))
        .unwrap();
    let mut rng = Rng::new(42);
    let probes: Vec<_> = (0..256)
        .map(|_| kurbo::Point::new(rng.next_f64() * EXTENT, rng.next_f64() * EXTENT))
        .collect();

    group.throughput(Throughput::Elements(probes.len() as u64));
    group.bench_function("find_by_id", |b| {
        b.iter(|| {
            for i in 0..probes.len() as u64 {
                black_box(acc.find_by_id(PointId(i * 37 % n as u64)));
            }
        });
    });
    group.bench_function("find_by_position", |b| {
        b.iter(|| {
            for p in &probes {
                black_box(acc.find_by_position(*p, 5.0));
            }
        });
    });
    group.finish();
}

fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete");
    let n = 10_000_usize;
    let points = gen_random_points(n, 3);
    let config = TreeConfig::default().with_capacity(4);
    group.throughput(Throughput::Elements(n as u64));
    group.bench_function("by_id_all", |b| {
        b.iter_batched(
            || Accelerator::new(points.clone(), config).unwrap(),
            |mut acc| {
                for p in &points {
                    acc.delete_by_id(p.id);
                }
                black_box(acc)
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("by_position_all", |b| {
        b.iter_batched(
            || Accelerator::new(points.clone(), config).unwrap(),
            |mut acc| {
                for p in &points {
                    acc.delete_point(p.position);
                }
                black_box(acc)
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_queries, bench_delete);
criterion_main!(benches);
