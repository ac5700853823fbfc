//! Binds the patrol operators to the evolutionary loop.

use super::genome::Genome;
use super::operators;
use super::simulator;
use crate::ga::GaProblem;
use crate::grid::{Grid, GridError};
use rand::Rng;

/// Shortest horizon single-point crossover can cut.
pub const MIN_TICKS: usize = 3;

/// Errors raised when setting up a patrol problem.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProblemError {
    #[error("fleet must contain at least one drone")]
    NoDrones,
    #[error("horizon must be at least 3 ticks, got {0}")]
    HorizonTooShort(usize),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Patrol planning for `drones` drones over `ticks` ticks on a fixed grid.
///
/// Every offspring is crossed over, mutated with bounds-valid moves, repaired
/// and then scored by the flight simulator.
#[derive(Debug, Clone)]
pub struct PatrolProblem {
    grid: Grid,
    drones: usize,
    ticks: usize,
    report_every: Option<usize>,
}

impl PatrolProblem {
    /// Creates a problem after checking the grid and the fleet shape.
    pub fn new(grid: Grid, drones: usize, ticks: usize) -> Result<Self, ProblemError> {
        grid.validate()?;
        if drones == 0 {
            return Err(ProblemError::NoDrones);
        }
        if ticks < MIN_TICKS {
            return Err(ProblemError::HorizonTooShort(ticks));
        }
        Ok(Self {
            grid,
            drones,
            ticks,
            report_every: None,
        })
    }

    /// Logs the best fitness on the first generation and every tenth of
    /// `total_generations`.
    pub fn with_progress(mut self, total_generations: usize) -> Self {
        self.report_every = Some((total_generations / 10).max(1));
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn drones(&self) -> usize {
        self.drones
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }
}

impl GaProblem for PatrolProblem {
    type Individual = Genome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Genome {
        operators::random_genome(self.drones, self.ticks, &self.grid, rng)
    }

    fn evaluate(&self, genome: &mut Genome) {
        let eval = simulator::evaluate(genome, &self.grid);
        genome.set_evaluation(eval);
    }

    fn crossover<R: Rng>(&self, parent1: &Genome, parent2: &Genome, rng: &mut R) -> Genome {
        operators::crossover(parent1, parent2, rng)
    }

    fn mutate<R: Rng>(&self, genome: &mut Genome, rate: f64, rng: &mut R) {
        operators::mutate(genome, &self.grid, rate, rng);
    }

    fn repair(&self, genome: &mut Genome) {
        let fixed = operators::repair(genome, &self.grid);
        log::trace!("repair rewrote {fixed} out-of-bounds moves");
    }

    fn on_generation(&self, generation: usize, best: &Genome) {
        let Some(every) = self.report_every else {
            return;
        };
        if generation == 1 || generation % every == 0 {
            log::info!(
                "generation {generation}: best fitness {:.2} ({})",
                best.fitness(),
                if best.is_valid() { "valid" } else { "invalid" }
            );
        }
    }
}
