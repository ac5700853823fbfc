//! Text instance loader.
//!
//! An instance is a whitespace-separated token stream:
//!
//! ```text
//! FILAS 10
//! COLUMNAS 12
//! OBSTACULOS 2
//! 3 4
//! 3 5
//! URGENCIAS 2
//! 0 0 5
//! 7 9 2
//! BASES 1
//! 0 9 0
//! ```
//!
//! Labels are arbitrary words and are skipped. Urgency entries at the same
//! cell add up. Base ids are positional; the id written in the file is read
//! and discarded.

use super::coord::Coord;
use super::model::{Grid, GridError};
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

/// Errors raised while reading an instance.
#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    #[error("failed to read instance: {0}")]
    Io(#[from] std::io::Error),
    #[error("instance ended while reading {field}")]
    UnexpectedEof { field: &'static str },
    #[error("invalid number {token:?} for {field}")]
    InvalidNumber { field: &'static str, token: String },
    #[error("negative count {count} for {field}")]
    NegativeCount { field: &'static str, count: i64 },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Reads and validates the instance at `path`.
pub fn load_instance(path: impl AsRef<Path>) -> Result<Grid, InstanceError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_instance(&text)
}

/// Parses and validates an instance from its text.
pub fn parse_instance(text: &str) -> Result<Grid, InstanceError> {
    let mut tokens = Tokens {
        inner: text.split_whitespace(),
    };

    let rows: i32 = tokens.labeled("rows")?;
    let cols: i32 = tokens.labeled("cols")?;
    let mut grid = Grid::new(rows, cols);

    let n_obstacles = tokens.labeled_count("obstacle count")?;
    for _ in 0..n_obstacles {
        let row = tokens.next("obstacle row")?;
        let col = tokens.next("obstacle col")?;
        grid.add_obstacle(Coord::new(row, col));
    }

    let n_urgency = tokens.labeled_count("urgency count")?;
    for _ in 0..n_urgency {
        let row = tokens.next("urgency row")?;
        let col = tokens.next("urgency col")?;
        let rate: f64 = tokens.next("urgency rate")?;
        grid.add_urgency(Coord::new(row, col), rate);
    }

    let n_bases = tokens.labeled_count("base count")?;
    for _ in 0..n_bases {
        let _id: i64 = tokens.next("base id")?;
        let row = tokens.next("base row")?;
        let col = tokens.next("base col")?;
        grid.add_base(Coord::new(row, col));
    }

    if tokens.inner.next().is_some() {
        log::warn!("ignoring trailing tokens after the base list");
    }

    grid.validate()?;
    log::debug!(
        "loaded {}x{} grid: {} obstacles, {} urgency cells, {} bases",
        grid.rows(),
        grid.cols(),
        grid.num_obstacles(),
        grid.num_tracked(),
        grid.num_bases()
    );
    Ok(grid)
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl Tokens<'_> {
    fn next<T: FromStr>(&mut self, field: &'static str) -> Result<T, InstanceError> {
        let token = self
            .inner
            .next()
            .ok_or(InstanceError::UnexpectedEof { field })?;
        token.parse().map_err(|_| InstanceError::InvalidNumber {
            field,
            token: token.to_string(),
        })
    }

    /// Skips a label word, then parses the value after it.
    fn labeled<T: FromStr>(&mut self, field: &'static str) -> Result<T, InstanceError> {
        self.inner
            .next()
            .ok_or(InstanceError::UnexpectedEof { field })?;
        self.next(field)
    }

    fn labeled_count(&mut self, field: &'static str) -> Result<usize, InstanceError> {
        let count: i64 = self.labeled(field)?;
        usize::try_from(count).map_err(|_| InstanceError::NegativeCount { field, count })
    }
}
