//! Drone patrol planning.
//!
//! A fleet of `k` drones leaves its home bases and flies one move per tick for
//! `T` ticks. Every grid cell with an urgency rate accumulates risk while
//! unwatched; a drone standing on it clears it. The search minimizes the total
//! urgency accumulated over the horizon.
//!
//! - [`Genome`]: base assignment plus a flat drone × tick action table
//! - [`evaluate`] / [`FlightSimulator`]: the fitness function
//! - [`operators`]: initialization, repair, mutation, crossover
//! - [`PatrolProblem`]: plugs all of the above into [`GaRunner`](crate::ga::GaRunner)

mod genome;
pub mod operators;
mod problem;
mod simulator;

pub use genome::Genome;
pub use problem::{PatrolProblem, ProblemError, MIN_TICKS};
pub use simulator::{
    evaluate, Evaluation, FlightSimulator, SimState, Violation, INVALID_PENALTY, TICK_PENALTY,
};
