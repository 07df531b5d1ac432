/*
 * Flock Simulation Benchmark
 *
 * This file contains benchmarks for the flock simulation. It measures one
 * simulation tick for several population sizes in both update modes, and
 * the neighbourhood gathering that dominates a tick.
 */

use boids3d::{Flock, SimulationParams, UpdateMode, FIXED_DT};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

const SEED: u64 = 42;

// Populated flock with `members` boids besides the leader
fn seeded_flock(members: usize, mode: UpdateMode) -> Flock {
    let mut params = SimulationParams::default();
    params.initial_boids = members;
    params.update_mode = mode;

    let mut flock = Flock::with_seed(params, SEED);
    flock.populate();
    // Let the flock settle out of its spawn volume
    for _ in 0..60 {
        flock.update(FIXED_DT);
    }
    flock
}

// Benchmark a full tick in each update mode
fn bench_flock_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("flock_tick");

    for mode in [UpdateMode::Sequential, UpdateMode::Simultaneous] {
        for members in [30, 100, 300].iter() {
            let id = BenchmarkId::new(format!("{mode:?}"), members);
            group.bench_with_input(id, members, |b, &n| {
                let mut flock = seeded_flock(n, mode);
                b.iter(|| {
                    flock.update(black_box(FIXED_DT));
                });
            });
        }
    }

    group.finish();
}

// Benchmark gathering every member's neighbourhood without moving anyone
fn bench_neighborhoods(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighborhoods");

    for members in [30, 100, 300].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(members), members, |b, &n| {
            let flock = seeded_flock(n, UpdateMode::Sequential);
            let ids: Vec<_> = flock.ids().collect();
            b.iter(|| {
                for &id in &ids {
                    black_box(flock.neighborhood_of(id));
                }
            });
        });
    }

    group.finish();
}

// Configure the benchmark group
criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(5))
        .sample_size(50);
    targets = bench_flock_tick, bench_neighborhoods
}
criterion_main!(benches);
