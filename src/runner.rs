//! The generational evolution loop.
//!
//! [`EvoRunner`] orchestrates the complete process:
//! initialization → evaluation → selection → variation → repeat.
//!
//! Each generation runs under a strict barrier: every individual is
//! evaluated before selection starts, and the next population is fully
//! built before it is evaluated. Within the evaluation phase, individuals
//! are independent and may be computed in parallel; the population buffer
//! is double-buffered across generations so no evaluation ever races a
//! mutation. Cancellation is observed only between generations, which
//! keeps the barrier intact.

use crate::config::EvoConfig;
use crate::error::Error;
use crate::genotype::{Genotype, Individual};
use crate::geometry::{round3, DistanceMatrix, Point};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Fitness summary of one generation.
///
/// `generation` 0 describes the initial population; all fitness fields
/// are rounded to 3 decimals. Records are immutable once emitted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Generation index (0 = initial population).
    pub generation: usize,
    /// Shortest tour length in the generation.
    pub best: f64,
    /// Longest tour length in the generation.
    pub worst: f64,
    /// Mean tour length of the generation.
    pub average: f64,
}

impl GenerationStats {
    fn from_fitness(generation: usize, fitness: &[f64]) -> Self {
        let mut best = f64::INFINITY;
        let mut worst = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &f in fitness {
            sum += f;
            if f < best {
                best = f;
            }
            if f > worst {
                worst = f;
            }
        }
        Self {
            generation,
            best: round3(best),
            worst: round3(worst),
            average: round3(sum / fitness.len() as f64),
        }
    }
}

/// Result of a completed run.
///
/// Carries the best individual observed across *all* generations, not
/// merely the final generation's best.
#[derive(Debug, Clone)]
pub struct EvoResult {
    /// The best tour, decoded back into points in visiting order.
    pub best_route: Vec<Point>,
    /// The best tour as indices into the input point slice.
    pub best_order: Vec<usize>,
    /// Total length of the best tour (rounded to 3 decimals).
    pub best_distance: f64,
    /// Number of generations actually executed.
    pub generations: usize,
    /// Whether the run stopped early due to stagnation.
    pub stagnated: bool,
    /// Whether the run was cancelled externally.
    pub cancelled: bool,
    /// One record per evaluated generation, including the initial one.
    pub stats: Vec<GenerationStats>,
}

/// Executes the evolutionary loop.
///
/// # Usage
///
/// ```
/// use tsp_evo::{EvoConfig, EvoRunner, Point};
///
/// let points = vec![
///     Point::new(0.0, 0.0),
///     Point::new(0.0, 1.0),
///     Point::new(1.0, 1.0),
///     Point::new(1.0, 0.0),
/// ];
/// let config = EvoConfig::default()
///     .with_population_size(20)
///     .with_generation_limit(50)
///     .with_seed(42);
///
/// let result = EvoRunner::run(&points, &config).unwrap();
/// assert_eq!(result.best_route.len(), points.len());
/// assert_eq!(result.stats.len(), 51);
/// ```
pub struct EvoRunner;

impl EvoRunner {
    /// Runs the engine on `points` with the given configuration.
    ///
    /// Fails with [`Error::InvalidConfiguration`] before the loop starts
    /// if the configuration is invalid or fewer than two points are
    /// supplied.
    pub fn run(points: &[Point], config: &EvoConfig) -> Result<EvoResult, Error> {
        Self::run_inner(points, config, Vec::new(), None)
    }

    /// Runs the engine with an optional cancellation flag.
    ///
    /// If `cancel` is `Some` and the flag becomes `true`, the engine
    /// stops before starting the next generation and returns the best
    /// solution found so far with `cancelled` set.
    pub fn run_with_cancel(
        points: &[Point],
        config: &EvoConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<EvoResult, Error> {
        Self::run_inner(points, config, Vec::new(), cancel)
    }

    /// Runs the engine starting from caller-supplied genotypes.
    ///
    /// Up to `population_size` seeds are adopted as the first
    /// individuals; the remainder of the initial population is filled
    /// with random permutations. Each seed must cover exactly the
    /// supplied points or the run fails with
    /// [`Error::InvalidGenotype`].
    pub fn run_seeded(
        points: &[Point],
        config: &EvoConfig,
        seeds: Vec<Genotype>,
    ) -> Result<EvoResult, Error> {
        Self::run_inner(points, config, seeds, None)
    }

    fn run_inner(
        points: &[Point],
        config: &EvoConfig,
        seeds: Vec<Genotype>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<EvoResult, Error> {
        config.validate()?;
        if points.len() < 2 {
            return Err(Error::InvalidConfiguration(format!(
                "a tour needs at least 2 points, got {}",
                points.len()
            )));
        }

        let n = points.len();
        for genotype in &seeds {
            if genotype.len() != n {
                return Err(Error::InvalidGenotype(format!(
                    "seed genotype covers {} cities, expected {n}",
                    genotype.len()
                )));
            }
        }

        let matrix = DistanceMatrix::from_points(points);
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::seed_from_u64(rand::random()),
        };

        // Initializing: adopted seeds first, random permutations after.
        let mut population: Vec<Individual> = seeds
            .into_iter()
            .take(config.population_size)
            .map(Individual::new)
            .collect();
        while population.len() < config.population_size {
            population.push(Individual::new(Genotype::random(n, &mut rng)));
        }

        evaluate_population(&matrix, &mut population, config.parallel);
        let mut fitness = collect_fitness(&population)?;

        let mut stats = Vec::with_capacity(config.generation_limit + 1);
        stats.push(GenerationStats::from_fitness(0, &fitness));

        let elite_idx = best_index(&fitness);
        let mut best = population[elite_idx].clone();
        let mut best_fitness = fitness[elite_idx];

        let mut stagnation_counter = 0usize;
        let mut stagnated = false;
        let mut cancelled = false;
        let mut generations = 0usize;

        for gen in 1..=config.generation_limit {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            // Selecting+Varying: the generation's best survives unchanged
            // (first index wins fitness ties), the remaining slots are
            // bred from selected parents.
            let elite_idx = best_index(&fitness);
            let mut next_gen: Vec<Individual> = Vec::with_capacity(config.population_size);
            next_gen.push(population[elite_idx].clone());

            while next_gen.len() < config.population_size {
                let p1 = config.selection.select(&fitness, &mut rng);

                let children = if rng.random_range(0.0..1.0) < config.crossover_rate {
                    let p2 = config.selection.select(&fitness, &mut rng);
                    let (c1, c2) = config.crossover.apply(
                        population[p1].genotype(),
                        population[p2].genotype(),
                        &mut rng,
                    )?;
                    vec![Individual::new(c1), Individual::new(c2)]
                } else {
                    vec![population[p1].clone()]
                };

                for mut child in children {
                    if next_gen.len() >= config.population_size {
                        break;
                    }
                    if rng.random_range(0.0..1.0) < config.mutation_rate {
                        child.apply_mutation(config.mutation, &mut rng);
                    }
                    next_gen.push(child);
                }
            }

            // Evaluating: only stale caches are recomputed; the elite
            // and unmutated clones keep theirs.
            evaluate_population(&matrix, &mut next_gen, config.parallel);
            population = next_gen;
            fitness = collect_fitness(&population)?;
            generations = gen;

            stats.push(GenerationStats::from_fitness(gen, &fitness));

            let gen_best_idx = best_index(&fitness);
            if fitness[gen_best_idx] < best_fitness {
                best = population[gen_best_idx].clone();
                best_fitness = fitness[gen_best_idx];
                stagnation_counter = 0;
            } else {
                stagnation_counter += 1;
            }

            if config.stagnation_limit > 0 && stagnation_counter >= config.stagnation_limit {
                stagnated = true;
                break;
            }
        }

        let best_order = best.genotype().order().to_vec();
        let best_route = best_order.iter().map(|&i| points[i]).collect();
        Ok(EvoResult {
            best_route,
            best_order,
            best_distance: best_fitness,
            generations,
            stagnated,
            cancelled,
            stats,
        })
    }
}

/// Evaluate every individual whose fitness cache is stale.
fn evaluate_population(matrix: &DistanceMatrix, population: &mut [Individual], parallel: bool) {
    if parallel {
        population
            .par_iter_mut()
            .for_each(|ind| evaluate_individual(matrix, ind));
    } else {
        for ind in population.iter_mut() {
            evaluate_individual(matrix, ind);
        }
    }
}

fn evaluate_individual(matrix: &DistanceMatrix, ind: &mut Individual) {
    if ind.fitness().is_none() {
        let length = matrix.tour_length(ind.genotype().order());
        ind.set_fitness(length);
    }
}

/// Read every fitness cache, failing if any is stale.
fn collect_fitness(population: &[Individual]) -> Result<Vec<f64>, Error> {
    population
        .iter()
        .map(|ind| {
            ind.fitness().ok_or_else(|| {
                Error::InvariantViolation("fitness cache read while stale".into())
            })
        })
        .collect()
}

/// Index of the lowest fitness; the first index wins ties, so results
/// stay deterministic under a fixed seed.
fn best_index(fitness: &[f64]) -> usize {
    let mut best = 0;
    for (i, &f) in fitness.iter().enumerate().skip(1) {
        if f < fitness[best] {
            best = i;
        }
    }
    best
}

// ============================================================================
// Tests
// ============================================================================
