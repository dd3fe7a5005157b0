// Board model: immutable 3x3 board values and the rules derived from them
//
// Every operation is pure. Applying an action returns a fresh board and leaves
// the original untouched, so boards can be shared freely between threads.

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

use crate::error::{ActionFault, GameError, Result};
use crate::types::{Action, Cell, Grid, Mark, Outcome, BOARD_SIZE};

/// The eight winning lines: 3 rows, 3 columns, 2 diagonals
const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// A tic-tac-toe position. Serialized as a 3x3 grid of `null | "X" | "O"`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "Grid", into = "Grid")]
pub struct Board {
    cells: Grid,
}

impl Board {
    /// Returns the empty starting board
    pub fn initial() -> Self {
        Board {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Builds a board from a wire grid, rejecting mark counts no legal game can reach
    pub fn from_grid(cells: Grid) -> Result<Self> {
        let board = Board { cells };
        let x_count = board.count(Mark::X);
        let o_count = board.count(Mark::O);

        if x_count < o_count || x_count > o_count + 1 {
            return Err(GameError::InvalidState {
                reason: format!(
                    "invalid mark counts X={}, O={} (X must equal O or lead by one)",
                    x_count, o_count
                ),
            });
        }

        Ok(board)
    }

    /// Returns a copy of the underlying grid
    pub fn to_grid(&self) -> Grid {
        self.cells
    }

    /// Contents of the cell at (row, col), or `None` if out of range
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Number of cells holding `mark`
    pub fn count(&self, mark: Mark) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell == Some(mark))
            .count()
    }

    /// Number of marks placed so far
    pub fn ply(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_some()).count()
    }

    /// Mark of the player whose turn it is. X moves whenever the counts are level.
    pub fn player_to_move(&self) -> Mark {
        if self.count(Mark::X) <= self.count(Mark::O) {
            Mark::X
        } else {
            Mark::O
        }
    }

    /// All empty cells in row-major order
    pub fn legal_actions(&self) -> Vec<Action> {
        Action::all()
            .filter(|a| self.cells[a.row][a.col].is_none())
            .collect()
    }

    /// Places the mark of the player to move on `action`, returning the new board
    ///
    /// # Errors
    /// * `InvalidAction` with `OutOfRange` if either coordinate is outside 0..=2
    /// * `InvalidAction` with `Occupied` if the target cell is not empty
    pub fn apply_action(&self, action: Action) -> Result<Board> {
        if !action.in_bounds() {
            return Err(GameError::InvalidAction {
                row: action.row,
                col: action.col,
                fault: ActionFault::OutOfRange,
            });
        }

        if self.cells[action.row][action.col].is_some() {
            return Err(GameError::InvalidAction {
                row: action.row,
                col: action.col,
                fault: ActionFault::Occupied,
            });
        }

        let mut next = *self;
        next.cells[action.row][action.col] = Some(self.player_to_move());
        Ok(next)
    }

    /// Owner of a complete line, if any
    pub fn winner(&self) -> Option<Mark> {
        LINES.iter().find_map(|line| {
            let [a, b, c] = *line;
            match self.cells[a.0][a.1] {
                Some(mark)
                    if self.cells[b.0][b.1] == Some(mark)
                        && self.cells[c.0][c.1] == Some(mark) =>
                {
                    Some(mark)
                }
                _ => None,
            }
        })
    }

    /// Whether every cell holds a mark
    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| cell.is_some())
    }

    /// True once someone has won or the board is full
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    /// Outcome from X's perspective: +1 X wins, -1 O wins, 0 otherwise
    pub fn utility(&self) -> i32 {
        match self.winner() {
            Some(Mark::X) => 1,
            Some(Mark::O) => -1,
            None => 0,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self.winner() {
            Some(mark) => Outcome::Win(mark),
            None if self.is_full() => Outcome::Draw,
            None => Outcome::InProgress,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::initial()
    }
}

impl TryFrom<Grid> for Board {
    type Error = GameError;

    fn try_from(cells: Grid) -> Result<Self> {
        Board::from_grid(cells)
    }
}

impl From<Board> for Grid {
    fn from(board: Board) -> Grid {
        board.to_grid()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                let symbol = cell.map(|m| m.as_str()).unwrap_or(".");
                f.write_str(symbol)?;
            }
        }
        Ok(())
    }
}
