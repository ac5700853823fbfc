//! Seeded random source shared by the evolutionary loop.
//!
//! Every randomized operator takes an explicit `&mut R: Rng` handle; this
//! module only decides how that handle is created so that runs with the
//! same seed draw the same sequence.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic RNG from a 64-bit seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates an RNG from `seed`, or from a fresh random seed when `None`.
///
/// The seed actually used is returned alongside so callers can log it and
/// replay the run.
pub fn rng_from_option(seed: Option<u64>) -> (StdRng, u64) {
    let seed = seed.unwrap_or_else(rand::random);
    (create_rng(seed), seed)
}
