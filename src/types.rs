// Tic-tac-toe value types shared by the board model, the search and the web API

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the board
pub const BOARD_SIZE: usize = 3;

/// A single cell: empty (`None`, serialized as `null`) or holding a mark
pub type Cell = Option<Mark>;

/// Wire representation of a board: rows of cells
pub type Grid = [[Cell; BOARD_SIZE]; BOARD_SIZE];

/// The two player marks. X always moves first.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Converts mark to string representation for API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }

    /// Returns the other mark
    pub fn opponent(&self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Parses "X" or "O" (exact, case-sensitive as on the wire)
    pub fn parse(s: &str) -> Option<Mark> {
        match s {
            "X" => Some(Mark::X),
            "O" => Some(Mark::O),
            _ => None,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (row, col) coordinate on the board
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    pub row: usize,
    pub col: usize,
}

impl Action {
    pub fn new(row: usize, col: usize) -> Self {
        Action { row, col }
    }

    /// All nine coordinates in row-major order: (0,0), (0,1), (0,2), (1,0), ...
    ///
    /// The search relies on this order for tie-breaking between equally
    /// valued moves.
    pub fn all() -> impl Iterator<Item = Action> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Action { row, col }))
    }

    /// Checks that both coordinates are inside the board
    pub fn in_bounds(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Result of line-scanning a board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Win(Mark),
    Draw,
}
