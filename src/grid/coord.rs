//! Grid coordinates and the discrete action encoding.

/// A `(row, col)` cell position.
///
/// Ordering is row-major: rows ascending, then columns ascending. Components
/// are signed so that a move stepping off the grid (row `-1`) is still
/// representable while it is being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    /// Row index.
    pub row: i32,
    /// Column index.
    pub col: i32,
}

impl Coord {
    /// Creates a coordinate.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns the coordinate reached by applying `action` once.
    pub fn step(self, action: Action) -> Self {
        let (dr, dc) = action.offset();
        Self {
            row: self.row + dr,
            col: self.col + dc,
        }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// One of the nine moves a drone can make in a tick.
///
/// The discriminant is the wire code used in route files: `0` is
/// [`Stay`](Action::Stay) and `1..=8` walk the compass clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Action {
    #[default]
    Stay = 0,
    N = 1,
    NE = 2,
    E = 3,
    SE = 4,
    S = 5,
    SW = 6,
    W = 7,
    NW = 8,
}

/// `(Δrow, Δcol)` for each action, indexed by its code.
const OFFSETS: [(i32, i32); 9] = [
    (0, 0),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

impl Action {
    /// All actions in code order.
    pub const ALL: [Action; 9] = [
        Action::Stay,
        Action::N,
        Action::NE,
        Action::E,
        Action::SE,
        Action::S,
        Action::SW,
        Action::W,
        Action::NW,
    ];

    /// Number of distinct actions.
    pub const COUNT: usize = 9;

    /// Decodes an action code, returning `None` outside `0..=8`.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// The numeric code of this action.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// The `(Δrow, Δcol)` displacement of this action.
    pub fn offset(self) -> (i32, i32) {
        OFFSETS[self as usize]
    }
}
