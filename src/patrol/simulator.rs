//! Flight simulation: the fitness function.
//!
//! A plan is replayed tick by tick against the grid. Every tick:
//!
//! 1. the current urgency level of every tracked cell is added to the total;
//! 2. cells not occupied by any drone grow by their rate;
//! 3. drones, in index order, propose their next cell; the first proposal that
//!    leaves the grid, enters an obstacle, or lands on a cell already claimed
//!    this tick that is not a base ends the simulation;
//! 4. drones move and the cells they occupied during the tick are cleared.
//!
//! A failed plan scores `total + INVALID_PENALTY + (T - t) * TICK_PENALTY`
//! where `t` is the failing tick, so plans that survive longer rank better.

use super::genome::Genome;
use crate::grid::{Coord, Grid};
use std::collections::HashSet;

/// Flat penalty added to every plan with a feasibility violation.
pub const INVALID_PENALTY: f64 = 10_000_000.0;

/// Penalty per tick left unflown when a plan fails.
pub const TICK_PENALTY: f64 = 10_000.0;

/// Outcome of simulating one plan.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    /// Accumulated urgency, plus the graduated penalty when invalid.
    pub fitness: f64,
    /// `true` iff all ticks were flown without a violation.
    pub valid: bool,
}

/// Why a proposed move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    OutOfBounds,
    Obstacle,
    /// Two drones claimed the same non-base cell.
    Collision,
}

/// Simulator lifecycle. `Failed` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    Running,
    Failed {
        tick: usize,
        drone: usize,
        violation: Violation,
    },
    Completed,
}

/// Step-wise replay of a [`Genome`] on a [`Grid`].
///
/// Most callers want [`evaluate`]; the simulator is exposed for inspecting
/// intermediate state in tests and tools.
pub struct FlightSimulator<'a> {
    grid: &'a Grid,
    genome: &'a Genome,
    cells: Vec<Coord>,
    rates: Vec<f64>,
    levels: Vec<f64>,
    occupied: Vec<bool>,
    positions: Vec<Coord>,
    candidates: Vec<Coord>,
    claimed: HashSet<Coord>,
    total: f64,
    tick: usize,
    state: SimState,
}

impl<'a> FlightSimulator<'a> {
    /// Places every drone on its base with all urgency levels at zero.
    pub fn new(genome: &'a Genome, grid: &'a Grid) -> Self {
        let (cells, rates): (Vec<Coord>, Vec<f64>) = grid.tracked_cells().unzip();
        let positions: Vec<Coord> = genome
            .base_ids()
            .iter()
            .map(|&id| grid.base(id))
            .collect();
        let n = cells.len();
        let k = positions.len();
        let state = if genome.ticks() == 0 {
            SimState::Completed
        } else {
            SimState::Running
        };
        Self {
            grid,
            genome,
            cells,
            rates,
            levels: vec![0.0; n],
            occupied: vec![false; n],
            candidates: Vec::with_capacity(k),
            claimed: HashSet::with_capacity(k),
            positions,
            total: 0.0,
            tick: 0,
            state,
        }
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    /// Number of ticks fully flown so far.
    pub fn tick(&self) -> usize {
        self.tick
    }

    /// Urgency accumulated so far.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Current drone positions.
    pub fn positions(&self) -> &[Coord] {
        &self.positions
    }

    /// Current urgency level of `at`, zero for untracked cells.
    pub fn level(&self, at: Coord) -> f64 {
        self.cells
            .binary_search(&at)
            .map_or(0.0, |i| self.levels[i])
    }

    /// Simulates one tick. Does nothing once the simulator is terminal.
    pub fn step(&mut self) -> SimState {
        if self.state != SimState::Running {
            return self.state;
        }
        let t = self.tick;

        // 1. Accrue current levels.
        self.total += self.levels.iter().sum::<f64>();

        // 2. Grow unwatched cells.
        self.occupied.iter_mut().for_each(|o| *o = false);
        for pos in &self.positions {
            if let Ok(i) = self.cells.binary_search(pos) {
                self.occupied[i] = true;
            }
        }
        for ((level, rate), &occupied) in self
            .levels
            .iter_mut()
            .zip(&self.rates)
            .zip(&self.occupied)
        {
            if !occupied {
                *level += rate;
            }
        }

        // 3. Propose and validate moves in drone order.
        self.candidates.clear();
        self.claimed.clear();
        for (drone, &pos) in self.positions.iter().enumerate() {
            let next = pos.step(self.genome.action(drone, t));
            if let Some(violation) = self.check(next) {
                self.state = SimState::Failed {
                    tick: t,
                    drone,
                    violation,
                };
                return self.state;
            }
            self.claimed.insert(next);
            self.candidates.push(next);
        }

        // 4. Commit and clear the cells watched during this tick.
        std::mem::swap(&mut self.positions, &mut self.candidates);
        for (level, &occupied) in self.levels.iter_mut().zip(&self.occupied) {
            if occupied {
                *level = 0.0;
            }
        }

        self.tick += 1;
        if self.tick == self.genome.ticks() {
            self.state = SimState::Completed;
        }
        self.state
    }

    fn check(&self, next: Coord) -> Option<Violation> {
        if !self.grid.in_bounds(next) {
            Some(Violation::OutOfBounds)
        } else if self.grid.is_obstacle(next) {
            Some(Violation::Obstacle)
        } else if self.claimed.contains(&next) && !self.grid.is_base(next) {
            Some(Violation::Collision)
        } else {
            None
        }
    }

    /// Runs to a terminal state and scores the plan.
    pub fn run(mut self) -> Evaluation {
        while self.step() == SimState::Running {}
        self.evaluation()
    }

    /// Scores the plan in its current state.
    ///
    /// A still-running simulation is scored by its accumulated urgency and
    /// reported invalid.
    pub fn evaluation(&self) -> Evaluation {
        match self.state {
            SimState::Completed => Evaluation {
                fitness: self.total,
                valid: true,
            },
            SimState::Failed { tick, .. } => {
                let remaining = (self.genome.ticks() - tick) as f64;
                Evaluation {
                    fitness: self.total + INVALID_PENALTY + remaining * TICK_PENALTY,
                    valid: false,
                }
            }
            SimState::Running => Evaluation {
                fitness: self.total,
                valid: false,
            },
        }
    }
}

/// Simulates `genome` over its whole horizon and returns its score.
///
/// Pure and deterministic: the same genome and grid always give the same
/// result.
pub fn evaluate(genome: &Genome, grid: &Grid) -> Evaluation {
    FlightSimulator::new(genome, grid).run()
}
