//! The static patrol area.

use super::coord::Coord;
use std::collections::{BTreeMap, HashSet};

/// Validation errors for a [`Grid`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    InvalidDimensions { rows: i32, cols: i32 },
    #[error("grid must define at least one base")]
    NoBases,
    #[error("base {id} at {at} lies outside the grid")]
    BaseOutOfBounds { id: usize, at: Coord },
    #[error("base {id} at {at} lies on an obstacle")]
    BaseOnObstacle { id: usize, at: Coord },
    #[error("urgency rate at {at} must be a non-negative number, got {rate}")]
    InvalidRate { at: Coord, rate: f64 },
}

/// Dimensions, obstacles, urgency rates and home bases of a patrol area.
///
/// A grid is assembled once (by hand or by the instance loader) and is then
/// only read during the search.
///
/// ```
/// use uav_patrol::grid::{Coord, Grid};
///
/// let grid = Grid::new(2, 2)
///     .with_urgency(Coord::new(0, 0), 1.0)
///     .with_base(Coord::new(1, 1));
/// assert!(grid.validate().is_ok());
/// assert!(grid.is_base(Coord::new(1, 1)));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    rows: i32,
    cols: i32,
    obstacles: HashSet<Coord>,
    urgency_rate: BTreeMap<Coord, f64>,
    bases: Vec<Coord>,
}

impl Grid {
    /// Creates an empty `rows × cols` grid with no obstacles, urgency or bases.
    pub fn new(rows: i32, cols: i32) -> Self {
        Self {
            rows,
            cols,
            obstacles: HashSet::new(),
            urgency_rate: BTreeMap::new(),
            bases: Vec::new(),
        }
    }

    /// Marks `at` as impassable.
    pub fn with_obstacle(mut self, at: Coord) -> Self {
        self.add_obstacle(at);
        self
    }

    /// Adds `rate` to the urgency accrual of `at`.
    ///
    /// Repeated entries for the same cell accumulate.
    pub fn with_urgency(mut self, at: Coord, rate: f64) -> Self {
        self.add_urgency(at, rate);
        self
    }

    /// Appends a home base; its id is its position in insertion order.
    pub fn with_base(mut self, at: Coord) -> Self {
        self.add_base(at);
        self
    }

    pub fn add_obstacle(&mut self, at: Coord) {
        self.obstacles.insert(at);
    }

    pub fn add_urgency(&mut self, at: Coord, rate: f64) {
        *self.urgency_rate.entry(at).or_insert(0.0) += rate;
    }

    pub fn add_base(&mut self, at: Coord) -> usize {
        self.bases.push(at);
        self.bases.len() - 1
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Whether `at` lies in `[0, rows) × [0, cols)`.
    pub fn in_bounds(&self, at: Coord) -> bool {
        at.row >= 0 && at.row < self.rows && at.col >= 0 && at.col < self.cols
    }

    pub fn is_obstacle(&self, at: Coord) -> bool {
        self.obstacles.contains(&at)
    }

    /// Whether any base sits on `at`.
    pub fn is_base(&self, at: Coord) -> bool {
        self.bases.contains(&at)
    }

    /// Coordinate of base `id`.
    ///
    /// # Panics
    /// Panics if `id` is not a valid base id.
    pub fn base(&self, id: usize) -> Coord {
        self.bases[id]
    }

    pub fn bases(&self) -> &[Coord] {
        &self.bases
    }

    pub fn num_bases(&self) -> usize {
        self.bases.len()
    }

    pub fn num_obstacles(&self) -> usize {
        self.obstacles.len()
    }

    /// Urgency accrual rate of `at`, zero for untracked cells.
    pub fn urgency_rate(&self, at: Coord) -> f64 {
        self.urgency_rate.get(&at).copied().unwrap_or(0.0)
    }

    /// Cells with an urgency rate, in row-major order.
    pub fn tracked_cells(&self) -> impl Iterator<Item = (Coord, f64)> + '_ {
        self.urgency_rate.iter().map(|(&c, &r)| (c, r))
    }

    pub fn num_tracked(&self) -> usize {
        self.urgency_rate.len()
    }

    /// Checks the structural assumptions the search relies on.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.rows <= 0 || self.cols <= 0 {
            return Err(GridError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.bases.is_empty() {
            return Err(GridError::NoBases);
        }
        for (id, &at) in self.bases.iter().enumerate() {
            if !self.in_bounds(at) {
                return Err(GridError::BaseOutOfBounds { id, at });
            }
            if self.is_obstacle(at) {
                return Err(GridError::BaseOnObstacle { id, at });
            }
        }
        if let Some((&at, &rate)) = self
            .urgency_rate
            .iter()
            .find(|(_, r)| !r.is_finite() || **r < 0.0)
        {
            return Err(GridError::InvalidRate { at, rate });
        }
        Ok(())
    }
}
