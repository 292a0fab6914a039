//! Criterion benchmarks for the evolutionary TSP engine.
//!
//! Uses seeded random instances so every sample evolves the same
//! population, measuring engine overhead rather than instance luck.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tsp_evo::{EvoConfig, EvoRunner, Point};

fn random_points(count: usize, seed: u64) -> Vec<Point> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|_| Point::new(rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
        .collect()
}

fn bench_evolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolution");
    group.sample_size(10);

    for (cities, pop, gens) in [(20usize, 100usize, 50usize), (50, 200, 50), (100, 200, 30)] {
        let points = random_points(cities, 7);
        let config = EvoConfig::default()
            .with_population_size(pop)
            .with_generation_limit(gens)
            .with_seed(42)
            .with_parallel(false);

        group.bench_function(
            BenchmarkId::from_parameter(format!("{cities}c_{pop}p_{gens}g")),
            |b| {
                b.iter(|| EvoRunner::run(black_box(&points), black_box(&config)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_parallel_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_evaluation");
    group.sample_size(10);

    let points = random_points(200, 7);
    for parallel in [false, true] {
        let config = EvoConfig::default()
            .with_population_size(300)
            .with_generation_limit(10)
            .with_seed(42)
            .with_parallel(parallel);

        group.bench_function(
            BenchmarkId::from_parameter(if parallel { "rayon" } else { "serial" }),
            |b| {
                b.iter(|| EvoRunner::run(black_box(&points), black_box(&config)).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_evolution, bench_parallel_evaluation);
criterion_main!(benches);
