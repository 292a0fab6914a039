//! Permutation genotypes and fitness-carrying individuals.
//!
//! A [`Genotype`] is an ordering of city indices and is always a valid
//! permutation of `[0, N)`: random construction shuffles a complete index
//! range, and explicit orders are validated on entry. Variation operators
//! mutate a genotype only under exclusive `&mut` access, so no invalid
//! intermediate state is ever observable.
//!
//! An [`Individual`] pairs a genotype with its cached tour length. The
//! cache is cleared in the same call that changes the genotype, which is
//! what lets the runner skip re-evaluating untouched survivors each
//! generation.

use crate::error::Error;
use rand::seq::SliceRandom;
use rand::Rng;

/// A candidate tour: a permutation of the city indices `0..N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genotype {
    order: Vec<usize>,
}

impl Genotype {
    /// Creates a uniformly random permutation of `0..city_count`
    /// (Fisher–Yates shuffle).
    pub fn random<R: Rng>(city_count: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..city_count).collect();
        order.shuffle(rng);
        Self { order }
    }

    /// Creates a genotype from an explicit visiting order.
    ///
    /// Fails with [`Error::InvalidGenotype`] if `order` is not a
    /// permutation of `0..city_count`: wrong length, a duplicate index,
    /// or an index out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use tsp_evo::Genotype;
    ///
    /// let g = Genotype::from_order(vec![2, 0, 1], 3).unwrap();
    /// assert_eq!(g.order(), &[2, 0, 1]);
    /// assert!(Genotype::from_order(vec![0, 0, 1], 3).is_err());
    /// ```
    pub fn from_order(order: Vec<usize>, city_count: usize) -> Result<Self, Error> {
        if order.len() != city_count {
            return Err(Error::InvalidGenotype(format!(
                "order has {} entries, expected {city_count}",
                order.len()
            )));
        }
        let mut seen = vec![false; city_count];
        for &city in &order {
            if city >= city_count {
                return Err(Error::InvalidGenotype(format!(
                    "city index {city} out of range for {city_count} cities"
                )));
            }
            if seen[city] {
                return Err(Error::InvalidGenotype(format!(
                    "city index {city} appears more than once"
                )));
            }
            seen[city] = true;
        }
        Ok(Self { order })
    }

    /// The visiting order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Number of cities in the tour.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` for the empty tour.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Exclusive access for the variation operators.
    ///
    /// Every operator in [`operators`](crate::operators) maps a valid
    /// permutation to a valid permutation, so the invariant holds across
    /// any sequence of applications.
    pub(crate) fn order_mut(&mut self) -> &mut Vec<usize> {
        &mut self.order
    }
}

/// A genotype paired with its cached fitness (total tour length).
///
/// `fitness() == None` means the cache is stale and must be recomputed
/// before being read; the runner treats a stale read as an
/// [`Error::InvariantViolation`].
#[derive(Debug, Clone)]
pub struct Individual {
    genotype: Genotype,
    fitness: Option<f64>,
}

impl Individual {
    /// Wraps a genotype with an empty fitness cache.
    pub fn new(genotype: Genotype) -> Self {
        Self {
            genotype,
            fitness: None,
        }
    }

    /// The tour this individual encodes.
    pub fn genotype(&self) -> &Genotype {
        &self.genotype
    }

    /// Cached tour length, or `None` if stale.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Stores a freshly computed tour length.
    pub(crate) fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Mutates the genotype with the given operator and clears the
    /// fitness cache in the same step, so a changed tour can never be
    /// read with its old length.
    pub(crate) fn apply_mutation<R: Rng>(
        &mut self,
        mutation: crate::operators::Mutation,
        rng: &mut R,
    ) {
        mutation.apply(&mut self.genotype, rng);
        self.fitness = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn is_permutation(order: &[usize], n: usize) -> bool {
        order.len() == n
            && order.iter().all(|&c| c < n)
            && order.iter().collect::<HashSet<_>>().len() == n
    }

    #[test]
    fn test_random_is_permutation() {
        let mut rng = SmallRng::seed_from_u64(42);
        for n in [0, 1, 2, 5, 20, 100] {
            let g = Genotype::random(n, &mut rng);
            assert!(is_permutation(g.order(), n), "not a permutation: {:?}", g.order());
        }
    }

    #[test]
    fn test_random_varies_with_rng() {
        let mut rng = SmallRng::seed_from_u64(7);
        let a = Genotype::random(30, &mut rng);
        let b = Genotype::random(30, &mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_order_accepts_valid() {
        let g = Genotype::from_order(vec![3, 1, 0, 2], 4).unwrap();
        assert_eq!(g.len(), 4);
        assert_eq!(g.order(), &[3, 1, 0, 2]);
    }

    #[test]
    fn test_from_order_rejects_wrong_length() {
        let err = Genotype::from_order(vec![0, 1], 3).unwrap_err();
        assert!(matches!(err, Error::InvalidGenotype(_)));
    }

    #[test]
    fn test_from_order_rejects_duplicate() {
        let err = Genotype::from_order(vec![0, 1, 1], 3).unwrap_err();
        assert!(matches!(err, Error::InvalidGenotype(_)));
    }

    #[test]
    fn test_from_order_rejects_out_of_range() {
        let err = Genotype::from_order(vec![0, 1, 3], 3).unwrap_err();
        assert!(matches!(err, Error::InvalidGenotype(_)));
    }

    #[test]
    fn test_empty_genotype() {
        let g = Genotype::from_order(vec![], 0).unwrap();
        assert!(g.is_empty());
    }

    #[test]
    fn test_individual_cache_lifecycle() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut ind = Individual::new(Genotype::random(10, &mut rng));
        assert_eq!(ind.fitness(), None);

        ind.set_fitness(12.5);
        assert_eq!(ind.fitness(), Some(12.5));

        ind.apply_mutation(crate::operators::Mutation::Swap, &mut rng);
        assert_eq!(ind.fitness(), None, "mutation must clear the cache");
        assert!(is_permutation(ind.genotype().order(), 10));
    }

    #[test]
    fn test_clone_keeps_cache() {
        let mut ind = Individual::new(Genotype::from_order(vec![1, 0], 2).unwrap());
        ind.set_fitness(3.0);
        let copy = ind.clone();
        assert_eq!(copy.fitness(), Some(3.0));
        assert_eq!(copy.genotype(), ind.genotype());
    }
}
