//! Variation operators for tour permutations.
//!
//! Every operator here maps a valid permutation to a valid permutation:
//! the closure property that makes these operators safe for tours, and
//! the reason swap mutation is the engine default over operators that
//! could duplicate or drop a city. Crossover offspring are additionally
//! revalidated on construction, so a defective implementation surfaces as
//! [`Error::InvalidGenotype`](crate::Error::InvalidGenotype) instead of a
//! silently repaired tour.
//!
//! # Mutation operators
//!
//! - [`swap_mutation`]: exchange two random positions — O(1)
//! - [`insert_mutation`]: remove and reinsert at a random position — O(n)
//! - [`invert_mutation`]: reverse a random segment (2-opt) — O(n)
//!
//! # Crossover operators
//!
//! - [`order_crossover`] (OX): Davis (1985) — preserves relative order
//! - [`pmx_crossover`] (PMX): Goldberg & Lingle (1985) — preserves absolute position
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"

use crate::error::Error;
use crate::genotype::Genotype;
use rand::Rng;

/// Mutation strategy applied to non-elite individuals.
///
/// All variants preserve the permutation invariant by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mutation {
    /// Exchange the cities at two random positions. The engine default.
    #[default]
    Swap,
    /// Remove a city and reinsert it at a random position.
    Insert,
    /// Reverse a random segment of the tour (a 2-opt move).
    Invert,
}

impl Mutation {
    /// Applies this mutation to `genotype` in place.
    pub fn apply<R: Rng>(&self, genotype: &mut Genotype, rng: &mut R) {
        let order = genotype.order_mut();
        match self {
            Mutation::Swap => swap_mutation(order, rng),
            Mutation::Insert => insert_mutation(order, rng),
            Mutation::Invert => invert_mutation(order, rng),
        }
    }
}

/// Crossover strategy for recombining two parent tours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crossover {
    /// Order crossover (OX). The engine default when crossover is enabled.
    #[default]
    Order,
    /// Partially mapped crossover (PMX).
    Pmx,
}

impl Crossover {
    /// Recombines two parents into two offspring.
    ///
    /// Offspring orders are revalidated via [`Genotype::from_order`]; an
    /// operator producing a non-permutation fails the run with
    /// [`Error::InvalidGenotype`] rather than being repaired.
    ///
    /// # Panics
    /// Panics if the parents have different lengths or are empty.
    pub fn apply<R: Rng>(
        &self,
        parent1: &Genotype,
        parent2: &Genotype,
        rng: &mut R,
    ) -> Result<(Genotype, Genotype), Error> {
        let n = parent1.len();
        let (c1, c2) = match self {
            Crossover::Order => order_crossover(parent1.order(), parent2.order(), rng),
            Crossover::Pmx => pmx_crossover(parent1.order(), parent2.order(), rng),
        };
        Ok((Genotype::from_order(c1, n)?, Genotype::from_order(c2, n)?))
    }
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Swap mutation: exchange two random positions.
///
/// # Complexity
/// O(1)
pub fn swap_mutation<R: Rng>(perm: &mut [usize], rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let i = rng.random_range(0..n);
    let j = rng.random_range(0..n);
    perm.swap(i, j);
}

/// Insert mutation: remove an element and reinsert at a random position.
///
/// # Complexity
/// O(n) due to array shifting
pub fn insert_mutation<R: Rng>(perm: &mut Vec<usize>, rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let from = rng.random_range(0..n);
    let item = perm.remove(from);
    let to = rng.random_range(0..n);
    perm.insert(to, item);
}

/// Invert mutation: reverse a random segment (2-opt move).
///
/// # Complexity
/// O(n) worst case for segment reversal
pub fn invert_mutation<R: Rng>(perm: &mut [usize], rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let (start, end) = random_segment(n, rng);
    perm[start..=end].reverse();
}

// ============================================================================
// Crossover operators
// ============================================================================

/// Order Crossover (OX) for permutations.
///
/// Preserves the **relative order** of cities from both parents.
///
/// # Algorithm (Davis, 1985)
///
/// 1. Select a random segment `[start, end]` from parent1
/// 2. Copy the segment to the child at the same positions
/// 3. Fill remaining positions with parent2's cities in parent2's order,
///    skipping cities already present in the child
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if parents have different lengths or are empty.
pub fn order_crossover<R: Rng>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    assert!(n > 0, "parents must not be empty");

    if n == 1 {
        return (parent1.to_vec(), parent2.to_vec());
    }

    let (start, end) = random_segment(n, rng);

    let child1 = ox_build_child(parent1, parent2, start, end);
    let child2 = ox_build_child(parent2, parent1, start, end);

    (child1, child2)
}

/// Build one OX child: copy segment from `template`, fill from `donor`.
fn ox_build_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let mut child = vec![usize::MAX; n];
    let mut in_segment = vec![false; n];

    for i in start..=end {
        child[i] = template[i];
        in_segment[template[i]] = true;
    }

    // Fill from donor, starting after the segment end, wrapping around.
    let mut pos = (end + 1) % n;
    for offset in 0..n {
        let donor_idx = (end + 1 + offset) % n;
        let val = donor[donor_idx];
        if !in_segment[val] {
            child[pos] = val;
            pos = (pos + 1) % n;
        }
    }

    child
}

/// Partially Mapped Crossover (PMX) for permutations.
///
/// Preserves the **absolute position** of cities from both parents as
/// much as possible.
///
/// # Algorithm (Goldberg & Lingle, 1985)
///
/// 1. Select a random segment `[start, end]` from parent1
/// 2. Copy the segment to the child at the same positions
/// 3. For each city in parent2's segment not yet in the child, place it
///    at the position found by following the mapping chain
/// 4. Fill remaining positions from parent2
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if parents have different lengths or are empty.
pub fn pmx_crossover<R: Rng>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    assert!(n > 0, "parents must not be empty");

    if n == 1 {
        return (parent1.to_vec(), parent2.to_vec());
    }

    let (start, end) = random_segment(n, rng);

    let child1 = pmx_build_child(parent1, parent2, start, end);
    let child2 = pmx_build_child(parent2, parent1, start, end);

    (child1, child2)
}

/// Build one PMX child: copy segment from `template`, map from `donor`.
fn pmx_build_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let sentinel = usize::MAX;
    let mut child = vec![sentinel; n];
    let mut placed = vec![false; n];

    for i in start..=end {
        child[i] = template[i];
        placed[template[i]] = true;
    }

    // For cities in the donor's segment not yet placed, follow the
    // mapping chain until a position outside the segment is free.
    for i in start..=end {
        let donor_val = donor[i];
        if placed[donor_val] {
            continue;
        }
        let mut pos = i;
        loop {
            let mapped_val = template[pos];
            let donor_pos = donor
                .iter()
                .position(|&v| v == mapped_val)
                .expect("valid permutation: every value in template exists in donor");
            if donor_pos < start || donor_pos > end {
                child[donor_pos] = donor_val;
                placed[donor_val] = true;
                break;
            }
            pos = donor_pos;
        }
    }

    for i in 0..n {
        if child[i] == sentinel {
            child[i] = donor[i];
        }
    }

    child
}

// ============================================================================
// Helpers
// ============================================================================

/// Pick a random segment `[start, end]` within `0..n` where `start <= end`.
fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

// ============================================================================
// Tests
// ============================================================================
