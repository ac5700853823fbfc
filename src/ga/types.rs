//! Core trait definitions for the evolutionary loop.
//!
//! [`Individual`] and [`GaProblem`] separate the generation mechanics in
//! [`GaRunner`](super::GaRunner) from the patrol problem, so the loop can be
//! exercised on small toy problems in tests.

use rand::Rng;

/// Marker trait for fitness values.
///
/// Lower fitness is considered better (minimization).
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// Returns a value representing the worst possible fitness.
    ///
    /// Used for individuals that have not been evaluated yet.
    fn worst() -> Self;

    /// Converts the fitness to `f64` for logging and statistics.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn worst() -> Self {
        f64::INFINITY
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// A candidate solution in the population.
///
/// Individuals carry their own evaluation; [`GaProblem::evaluate`] writes it
/// and the loop reads it back through [`fitness`](Individual::fitness).
pub trait Individual: Clone + Send + Sync {
    /// The fitness type. Must implement [`Fitness`].
    type Fitness: Fitness;

    /// Returns the current fitness of this individual.
    fn fitness(&self) -> Self::Fitness;
}

/// The problem plugged into the evolutionary loop.
///
/// One generation of the loop calls, per offspring and in this order:
/// [`crossover`](GaProblem::crossover), [`mutate`](GaProblem::mutate),
/// [`repair`](GaProblem::repair), then [`evaluate`](GaProblem::evaluate).
///
/// # Thread Safety
///
/// `GaProblem` must be `Send + Sync` because offspring may be evaluated in
/// parallel with rayon. Evaluation must therefore not touch the RNG.
pub trait GaProblem: Send + Sync {
    /// The individual (solution) type for this problem.
    type Individual: Individual;

    /// Creates a random, unevaluated individual.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Evaluates `individual` and stores the result on it.
    ///
    /// Must be deterministic: the same individual always gets the same
    /// fitness.
    fn evaluate(&self, individual: &mut Self::Individual);

    /// Produces one child by recombining two parents.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        parent2: &Self::Individual,
        rng: &mut R,
    ) -> Self::Individual;

    /// Mutates an individual in place; `rate` is the per-gene probability.
    fn mutate<R: Rng>(&self, individual: &mut Self::Individual, rate: f64, rng: &mut R);

    /// Deterministically fixes structural defects before evaluation.
    ///
    /// The default implementation is a no-op.
    fn repair(&self, _individual: &mut Self::Individual) {}

    /// Called at the end of each generation with the current best individual.
    ///
    /// The default implementation is a no-op.
    fn on_generation(&self, _generation: usize, _best: &Self::Individual) {}
}
