//! Generational evolutionary loop.
//!
//! A small trait-based engine: the patrol problem implements [`GaProblem`],
//! which specifies how to create, repair, evaluate, crossover and mutate
//! individuals, and [`GaRunner`] drives elitist generational replacement with
//! tournament selection.
//!
//! # Key Types
//!
//! - [`GaConfig`]: population size, generation budget, tournament and elite
//!   sizes, mutation rate, seed
//! - [`GaRunner`]: executes the loop
//! - [`GaResult`]: best individual and per-generation history
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
mod runner;
mod selection;
mod types;

pub use config::{ConfigError, GaConfig};
pub use runner::{GaResult, GaRunner};
pub use selection::tournament_select;
pub use types::{Fitness, GaProblem, Individual};
