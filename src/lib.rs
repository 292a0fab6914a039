//! Generational evolutionary search for the Traveling Salesman Problem.
//!
//! Given an ordered set of 2-D points, the engine evolves a population of
//! candidate tours (permutations of point indices) under elitist
//! selection and permutation-preserving variation, and returns the best
//! closed tour found together with per-generation statistics. Fitness is
//! the total Euclidean tour length, minimized, rounded to 3 decimals on
//! the final total only.
//!
//! # Components
//!
//! - [`Point`] / [`DistanceMatrix`]: the pure distance model and the tour
//!   evaluator ([`DistanceMatrix::tour_length`])
//! - [`Genotype`] / [`Individual`]: validated permutations with a cached
//!   fitness value
//! - [`Mutation`] / [`Crossover`]: permutation-preserving variation
//!   strategies (swap mutation by default; order crossover optional)
//! - [`Selection`]: tournament (default), roulette, and rank selection
//! - [`EvoConfig`]: run parameters with builder-style setters
//! - [`EvoRunner`]: the generational loop, yielding an [`EvoResult`]
//!
//! # Reproducibility
//!
//! All randomness flows through one seedable generator: with
//! [`EvoConfig::with_seed`] the run is a pure function of
//! `(points, config, seed)`, including under parallel evaluation.
//!
//! # Example
//!
//! ```
//! use tsp_evo::{EvoConfig, EvoRunner, Point};
//!
//! let points = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(0.0, 1.0),
//!     Point::new(1.0, 1.0),
//!     Point::new(1.0, 0.0),
//! ];
//! let config = EvoConfig::default()
//!     .with_population_size(50)
//!     .with_generation_limit(100)
//!     .with_seed(42);
//!
//! let result = EvoRunner::run(&points, &config)?;
//! assert_eq!(result.best_route.len(), 4);
//! # Ok::<(), tsp_evo::Error>(())
//! ```

mod config;
mod error;
mod genotype;
mod geometry;
pub mod operators;
mod runner;
mod selection;

pub use config::EvoConfig;
pub use error::Error;
pub use genotype::{Genotype, Individual};
pub use geometry::{round3, DistanceMatrix, Point};
pub use operators::{Crossover, Mutation};
pub use runner::{EvoResult, EvoRunner, GenerationStats};
pub use selection::Selection;
