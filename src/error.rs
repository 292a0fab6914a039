//! Error taxonomy for the evolution engine.
//!
//! All errors are terminal for the run in which they occur: configuration
//! errors are reported before the loop starts, and the two internal
//! variants indicate operator or engine defects rather than recoverable
//! input problems. Nothing is silently repaired, since a repaired
//! permutation would mask the operator bug that produced it and bias the
//! search.

/// Errors surfaced by [`EvoRunner`](crate::EvoRunner) and the validating
/// constructors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration or the point set cannot support a run: fewer than
    /// two points, a population below 2, a zero generation limit, or an
    /// operator rate outside `[0, 1]`.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A constructed or recombined sequence is not a permutation of
    /// `[0, N)`: wrong length, duplicate index, or out-of-range index.
    /// Indicates a defective operator, not bad user input.
    #[error("invalid genotype: {0}")]
    InvalidGenotype(String),

    /// An internal consistency check failed, e.g. a fitness cache was read
    /// while stale. Fatal for the run.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
