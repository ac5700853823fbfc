//! Evolutionary patrol planning for drone fleets.
//!
//! Searches, with a genetic algorithm, for the flight plan of `k` drones over
//! a `T`-tick horizon that minimizes the urgency accumulated by unwatched grid
//! cells.
//!
//! - [`grid`]: the static instance (dimensions, obstacles, urgency, bases)
//!   and its text loader
//! - [`patrol`]: flight plans, the flight simulator and genetic operators
//! - [`ga`]: the generational loop with tournament selection and elitism
//! - [`report`]: statistics and route CSV files, console route summaries
//! - [`random`]: seeded random source
//!
//! # Example
//!
//! ```
//! use uav_patrol::ga::{GaConfig, GaRunner};
//! use uav_patrol::grid::{Coord, Grid};
//! use uav_patrol::patrol::PatrolProblem;
//!
//! let grid = Grid::new(4, 4)
//!     .with_urgency(Coord::new(0, 0), 2.0)
//!     .with_urgency(Coord::new(3, 3), 1.0)
//!     .with_base(Coord::new(1, 1));
//! let problem = PatrolProblem::new(grid, 2, 10).unwrap();
//! let config = GaConfig::default()
//!     .with_population_size(20)
//!     .with_max_generations(10)
//!     .with_seed(1);
//! let result = GaRunner::run(&problem, &config).unwrap();
//! assert_eq!(result.generations, 10);
//! ```

pub mod ga;
pub mod grid;
pub mod patrol;
pub mod random;
pub mod report;
