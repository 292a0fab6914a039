//! Selection strategies for choosing parent tours.
//!
//! Selection operates on the current generation's fitness slice, which
//! the runner extracts once per generation after evaluation completes.
//! All strategies minimize: lower tour length = better. Fitness ties are
//! broken by insertion order (strict comparisons, stable sort), keeping
//! runs reproducible under a fixed seed.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"

use rand::Rng;

/// Selection strategy for choosing parents.
///
/// # Examples
///
/// ```
/// use tsp_evo::Selection;
///
/// // Tournament with size 3 (moderate selection pressure)
/// let sel = Selection::Tournament(3);
///
/// // Fitness-proportionate (roulette wheel)
/// let sel = Selection::Roulette;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Tournament selection: draw `k` individuals at random, keep the best.
    ///
    /// Higher `k` = stronger selection pressure.
    /// - k=2: light pressure (good for diversity)
    /// - k=3-5: moderate pressure (typical default)
    /// - k>5: strong pressure (risk of premature convergence)
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Fitness-proportionate (roulette wheel) selection.
    ///
    /// Selection probability is proportional to inverted fitness, so the
    /// shortest tours get the highest weight.
    ///
    /// **Warning**: susceptible to super-individual dominance when
    /// fitness variance is high.
    ///
    /// # Complexity
    /// O(n) per selection (linear scan)
    Roulette,

    /// Rank-based selection with linear ranking.
    ///
    /// Individuals are sorted by fitness and selection probability is
    /// proportional to rank position, not raw fitness, avoiding the
    /// scaling problems of roulette selection.
    ///
    /// # Complexity
    /// O(n log n) per selection (sort), O(n) scan
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Selects a parent index given the generation's fitness values.
    ///
    /// # Panics
    /// Panics if `fitness` is empty.
    pub fn select<R: Rng>(&self, fitness: &[f64], rng: &mut R) -> usize {
        assert!(!fitness.is_empty(), "cannot select from empty population");

        match self {
            Selection::Tournament(k) => tournament(fitness, *k, rng),
            Selection::Roulette => roulette(fitness, rng),
            Selection::Rank => rank(fitness, rng),
        }
    }
}

/// Tournament selection: draw k random indices, return the best.
///
/// A strict `<` keeps the earliest draw on ties.
fn tournament<R: Rng>(fitness: &[f64], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = fitness.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if fitness[idx] < fitness[best_idx] {
            best_idx = idx;
        }
    }
    best_idx
}

/// Roulette wheel selection using inverse fitness transformation.
///
/// For minimization: weight_i = max_fitness - fitness_i + epsilon, so
/// the shortest tour gets the highest weight.
fn roulette<R: Rng>(fitness: &[f64], rng: &mut R) -> usize {
    let n = fitness.len();
    if n == 1 {
        return 0;
    }

    let max_fitness = fitness.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let epsilon = 1e-10;

    let weights: Vec<f64> = fitness
        .iter()
        .map(|&f| {
            let w = max_fitness - f + epsilon;
            if w > 0.0 {
                w
            } else {
                epsilon
            }
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }

    n - 1 // floating-point fallback
}

/// Rank-based selection using linear ranking.
///
/// The stable sort keeps insertion order on equal fitness, so ties are
/// deterministic.
fn rank<R: Rng>(fitness: &[f64], rng: &mut R) -> usize {
    let n = fitness.len();
    if n == 1 {
        return 0;
    }

    let mut indexed: Vec<(usize, f64)> = fitness.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    // Linear ranking: rank 0 (best) gets weight n, worst gets weight 1.
    let total: f64 = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;

    for (rank, &(original_idx, _)) in indexed.iter().enumerate() {
        let weight = (n - rank) as f64;
        cumulative += weight;
        if cumulative > threshold {
            return original_idx;
        }
    }

    indexed.last().expect("population has n >= 2 elements").0 // fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_tournament_favors_best() {
        let fitness = [10.0, 5.0, 1.0, 8.0];
        let mut rng = SmallRng::seed_from_u64(42);

        let mut counts = [0u32; 4];
        let n = 10000;
        for _ in 0..n {
            let idx = Selection::Tournament(4).select(&fitness, &mut rng);
            counts[idx] += 1;
        }
        // Index 2 (fitness=1.0) should dominate.
        let best_count = counts[2];
        assert!(
            best_count > 6000,
            "expected best to be selected >60% of the time, got {best_count}/{n}"
        );
    }

    #[test]
    fn test_tournament_size_1_is_random() {
        let fitness = [10.0, 5.0, 1.0, 8.0];
        let mut rng = SmallRng::seed_from_u64(42);

        let mut counts = [0u32; 4];
        for _ in 0..10000 {
            let idx = Selection::Tournament(1).select(&fitness, &mut rng);
            counts[idx] += 1;
        }
        for &c in &counts {
            assert!(c > 1500, "expected uniform, got counts: {counts:?}");
        }
    }

    #[test]
    fn test_roulette_favors_best() {
        let fitness = [100.0, 50.0, 1.0, 80.0];
        let mut rng = SmallRng::seed_from_u64(42);

        let mut counts = [0u32; 4];
        for _ in 0..10000 {
            let idx = Selection::Roulette.select(&fitness, &mut rng);
            counts[idx] += 1;
        }
        let best_count = counts[2];
        let worst_count = counts[0];
        assert!(
            best_count > worst_count,
            "best should be selected more often: best={best_count}, worst={worst_count}"
        );
    }

    #[test]
    fn test_rank_favors_best() {
        let fitness = [100.0, 50.0, 1.0, 80.0];
        let mut rng = SmallRng::seed_from_u64(42);

        let mut counts = [0u32; 4];
        for _ in 0..10000 {
            let idx = Selection::Rank.select(&fitness, &mut rng);
            counts[idx] += 1;
        }
        let best_count = counts[2];
        let worst_count = counts[0];
        assert!(
            best_count > worst_count,
            "best should be selected more: best={best_count}, worst={worst_count}"
        );
    }

    #[test]
    fn test_single_individual() {
        let fitness = [5.0];
        let mut rng = SmallRng::seed_from_u64(42);

        assert_eq!(Selection::Tournament(3).select(&fitness, &mut rng), 0);
        assert_eq!(Selection::Roulette.select(&fitness, &mut rng), 0);
        assert_eq!(Selection::Rank.select(&fitness, &mut rng), 0);
    }

    #[test]
    fn test_equal_fitness_is_roughly_uniform() {
        let fitness = [5.0, 5.0, 5.0, 5.0];
        let mut rng = SmallRng::seed_from_u64(42);

        let mut counts = [0u32; 4];
        for _ in 0..10000 {
            let idx = Selection::Tournament(2).select(&fitness, &mut rng);
            counts[idx] += 1;
        }
        for &c in &counts {
            assert!(
                c > 1500,
                "expected roughly uniform with equal fitness, got {counts:?}"
            );
        }
    }

    #[test]
    fn test_deterministic_under_fixed_seed() {
        let fitness = [9.0, 2.0, 7.0, 4.0, 11.0];
        let picks = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            (0..32)
                .map(|_| Selection::Tournament(3).select(&fitness, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(7), picks(7));
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn test_empty_population_panics() {
        let mut rng = SmallRng::seed_from_u64(42);
        Selection::Tournament(3).select(&[], &mut rng);
    }
}
