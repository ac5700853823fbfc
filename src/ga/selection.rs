//! Tournament selection.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::types::Individual;
use rand::Rng;

/// Tournament selection: draw `size` individuals uniformly **with
/// replacement** and return the index of the one with the lowest fitness.
///
/// Ties keep the earliest draw; a later contender must be strictly better to
/// replace the current winner. `size` is treated as at least 1.
///
/// # Complexity
/// O(size)
///
/// # Panics
/// Panics if `population` is empty.
pub fn tournament_select<I: Individual, R: Rng>(
    population: &[I],
    size: usize,
    rng: &mut R,
) -> usize {
    assert!(
        !population.is_empty(),
        "cannot select from empty population"
    );
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..size.max(1) {
        let idx = rng.random_range(0..n);
        if population[idx].fitness() < population[best_idx].fitness() {
            best_idx = idx;
        }
    }
    best_idx
}
