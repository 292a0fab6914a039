//! Engine configuration.
//!
//! [`EvoConfig`] holds all parameters that control the evolutionary loop.
//! Values are stored exactly as given and checked by
//! [`validate`](EvoConfig::validate); out-of-range rates are reported as
//! [`Error::InvalidConfiguration`] rather than clamped, so a bad
//! configuration never starts a run.

use crate::error::Error;
use crate::operators::{Crossover, Mutation};
use crate::selection::Selection;

/// Configuration for an evolutionary TSP run.
///
/// # Defaults
///
/// Defaults follow the classic mutation-only setup: population 500, swap
/// mutation at rate 0.2, 200 generations, crossover disabled.
///
/// ```
/// use tsp_evo::EvoConfig;
///
/// let config = EvoConfig::default();
/// assert_eq!(config.population_size, 500);
/// assert_eq!(config.generation_limit, 200);
/// assert_eq!(config.crossover_rate, 0.0);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use tsp_evo::{EvoConfig, Selection};
///
/// let config = EvoConfig::default()
///     .with_population_size(200)
///     .with_selection(Selection::Tournament(5))
///     .with_mutation_rate(0.1)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvoConfig {
    /// Number of individuals in the population. Must be at least 2.
    pub population_size: usize,

    /// Number of generations to run before terminating.
    pub generation_limit: usize,

    /// Selection strategy for choosing parents.
    pub selection: Selection,

    /// Mutation operator applied to non-elite offspring.
    pub mutation: Mutation,

    /// Per-individual probability of mutating an offspring (0.0–1.0).
    pub mutation_rate: f64,

    /// Crossover operator used when crossover fires.
    pub crossover: Crossover,

    /// Probability of recombining two parents instead of cloning one
    /// (0.0–1.0). Zero disables crossover entirely.
    pub crossover_rate: f64,

    /// Number of generations without global-best improvement before
    /// stopping early. Zero disables stagnation-based termination.
    pub stagnation_limit: usize,

    /// Whether to evaluate individuals in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` uses a random seed, making
    /// the run non-deterministic.
    pub seed: Option<u64>,
}

impl Default for EvoConfig {
    fn default() -> Self {
        Self {
            population_size: 500,
            generation_limit: 200,
            selection: Selection::default(),
            mutation: Mutation::default(),
            mutation_rate: 0.2,
            crossover: Crossover::default(),
            crossover_rate: 0.0,
            stagnation_limit: 0,
            parallel: true,
            seed: None,
        }
    }
}

impl EvoConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the generation limit.
    pub fn with_generation_limit(mut self, n: usize) -> Self {
        self.generation_limit = n;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Sets the mutation operator.
    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutation = mutation;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the crossover operator.
    pub fn with_crossover(mut self, crossover: Crossover) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), Error> {
        if self.population_size < 2 {
            return Err(Error::InvalidConfiguration(
                "population_size must be at least 2".into(),
            ));
        }
        if self.generation_limit == 0 {
            return Err(Error::InvalidConfiguration(
                "generation_limit must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(Error::InvalidConfiguration(format!(
                "mutation_rate must be within [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(Error::InvalidConfiguration(format!(
                "crossover_rate must be within [0, 1], got {}",
                self.crossover_rate
            )));
        }
        if let Selection::Tournament(k) = self.selection {
            if k == 0 {
                return Err(Error::InvalidConfiguration(
                    "tournament size must be at least 1".into(),
                ));
            }
        }
        Ok(())
    }
}
