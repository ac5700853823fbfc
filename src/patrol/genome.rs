//! Flight plan chromosome.

use crate::ga::Individual;
use crate::grid::{Action, Coord, Grid};

use super::simulator::Evaluation;

/// A candidate flight plan for a fleet of `k` drones over `T` ticks.
///
/// Each drone has a home base id and one [`Action`] per tick. Actions are
/// stored in a single flat buffer indexed by `drone * T + tick`; the shape is
/// fixed at construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Genome {
    base_ids: Vec<usize>,
    actions: Vec<Action>,
    ticks: usize,
    fitness: f64,
    valid: bool,
}

impl Genome {
    /// Creates an unevaluated plan where every drone stays at its base.
    pub fn new(base_ids: Vec<usize>, ticks: usize) -> Self {
        let actions = vec![Action::Stay; base_ids.len() * ticks];
        Self::from_flat(base_ids, actions, ticks)
    }

    /// Creates an unevaluated plan from one action sequence per drone.
    ///
    /// # Panics
    /// Panics if the number of sequences differs from the number of drones or
    /// the sequences have different lengths.
    pub fn from_actions(base_ids: Vec<usize>, actions: &[Vec<Action>]) -> Self {
        assert_eq!(
            base_ids.len(),
            actions.len(),
            "one action sequence per drone"
        );
        let ticks = actions.first().map_or(0, Vec::len);
        assert!(
            actions.iter().all(|a| a.len() == ticks),
            "all drones must share the same horizon"
        );
        let flat = actions.iter().flatten().copied().collect();
        Self::from_flat(base_ids, flat, ticks)
    }

    pub(crate) fn from_flat(base_ids: Vec<usize>, actions: Vec<Action>, ticks: usize) -> Self {
        debug_assert_eq!(actions.len(), base_ids.len() * ticks);
        Self {
            base_ids,
            actions,
            ticks,
            fitness: f64::INFINITY,
            valid: false,
        }
    }

    /// Number of drones `k`.
    pub fn drones(&self) -> usize {
        self.base_ids.len()
    }

    /// Horizon `T`.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn base_id(&self, drone: usize) -> usize {
        self.base_ids[drone]
    }

    pub fn base_ids(&self) -> &[usize] {
        &self.base_ids
    }

    pub fn action(&self, drone: usize, tick: usize) -> Action {
        self.actions[drone * self.ticks + tick]
    }

    pub fn set_action(&mut self, drone: usize, tick: usize, action: Action) {
        self.actions[drone * self.ticks + tick] = action;
    }

    /// The action sequence of one drone.
    pub fn drone_actions(&self, drone: usize) -> &[Action] {
        let start = drone * self.ticks;
        &self.actions[start..start + self.ticks]
    }

    pub(crate) fn drone_actions_mut(&mut self, drone: usize) -> &mut [Action] {
        let start = drone * self.ticks;
        &mut self.actions[start..start + self.ticks]
    }

    /// Positions of `drone` from its base (tick 0) through every tick, without
    /// any feasibility check. Yields `T + 1` coordinates.
    pub fn trajectory<'a>(&'a self, drone: usize, grid: &Grid) -> impl Iterator<Item = Coord> + 'a {
        let start = grid.base(self.base_ids[drone]);
        std::iter::once(start).chain(self.drone_actions(drone).iter().scan(start, |pos, &a| {
            *pos = pos.step(a);
            Some(*pos)
        }))
    }

    /// Fitness of the last evaluation; `f64::INFINITY` before evaluation.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Whether the last evaluation completed the horizon without a violation.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Stores the outcome of a flight simulation.
    pub fn set_evaluation(&mut self, evaluation: Evaluation) {
        self.fitness = evaluation.fitness;
        self.valid = evaluation.valid;
    }

    /// Clears the evaluation, e.g. after the genes were recombined.
    pub(crate) fn invalidate(&mut self) {
        self.fitness = f64::INFINITY;
        self.valid = false;
    }
}

impl Individual for Genome {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }
}
