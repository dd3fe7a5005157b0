// Exhaustive minimax search
//
// X maximizes utility, O minimizes it. The traversal visits the full game tree
// with no pruning or memoization; from the empty board that is under a million
// nodes, which is cheap enough to recompute on every request.

use log::debug;
use rayon::prelude::*;

use crate::board::Board;
use crate::error::{GameError, Result};
use crate::types::{Action, Mark};

/// How the root of the search tree is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Evaluate every root action on the calling thread
    Sequential,
    /// Evaluate root actions concurrently on the rayon pool
    ParallelRoot,
}

/// Value of `board` when X moves next and both sides play perfectly
pub fn max_value(board: &Board) -> i32 {
    if board.is_terminal() {
        return board.utility();
    }

    board
        .legal_actions()
        .into_iter()
        .map(|action| min_value(&child(board, action)))
        .max()
        .unwrap_or_else(|| board.utility())
}

/// Value of `board` when O moves next and both sides play perfectly
pub fn min_value(board: &Board) -> i32 {
    if board.is_terminal() {
        return board.utility();
    }

    board
        .legal_actions()
        .into_iter()
        .map(|action| max_value(&child(board, action)))
        .min()
        .unwrap_or_else(|| board.utility())
}

/// Minimax value of any board, terminal or not
pub fn evaluate(board: &Board) -> i32 {
    match board.player_to_move() {
        Mark::X => max_value(board),
        Mark::O => min_value(board),
    }
}

/// Optimal action for the player to move, evaluated sequentially
///
/// Among equally valued actions the first one in row-major order wins.
///
/// # Errors
/// * `InvalidState` if the board is terminal
pub fn best_move(board: &Board) -> Result<Action> {
    Engine::new(ExecutionStrategy::Sequential)
        .search(board)
        .map(|decision| decision.action)
}

/// Successor used by the recursive value functions, which only ever expand
/// legal actions; the board rejects nothing but occupied or out-of-range cells.
fn child(board: &Board, action: Action) -> Board {
    match board.apply_action(action) {
        Ok(next) => next,
        Err(e) => unreachable!("legal action {} rejected: {}", action, e),
    }
}

/// Chosen action together with its minimax value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub value: i32,
}

/// Minimax search front end with a fixed root execution strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engine {
    strategy: ExecutionStrategy,
}

impl Engine {
    pub fn new(strategy: ExecutionStrategy) -> Self {
        Engine { strategy }
    }

    /// Optimal action for the player to move
    ///
    /// # Errors
    /// * `InvalidState` if the board is terminal or has no empty cell
    pub fn best_move(&self, board: &Board) -> Result<Action> {
        self.search(board).map(|decision| decision.action)
    }

    /// Scores every root action and picks the extremal one for the side to move
    pub fn search(&self, board: &Board) -> Result<Decision> {
        if board.is_terminal() {
            return Err(GameError::InvalidState {
                reason: "cannot search a finished game".to_string(),
            });
        }

        let mover = board.player_to_move();
        let actions = board.legal_actions();
        if actions.is_empty() {
            return Err(GameError::InvalidState {
                reason: "no legal actions available".to_string(),
            });
        }

        // Children are scored with the opponent's value function
        let score = |action: &Action| -> Result<Decision> {
            let next = board.apply_action(*action)?;
            let value = match mover {
                Mark::X => min_value(&next),
                Mark::O => max_value(&next),
            };
            Ok(Decision {
                action: *action,
                value,
            })
        };

        // Collecting an indexed parallel iterator keeps enumeration order
        let scored: Result<Vec<Decision>> = match self.strategy {
            ExecutionStrategy::Sequential => actions.iter().map(score).collect(),
            ExecutionStrategy::ParallelRoot => actions.par_iter().map(score).collect(),
        };
        let scored = scored?;

        let mut best = scored[0];
        for decision in &scored[1..] {
            let better = match mover {
                Mark::X => decision.value > best.value,
                Mark::O => decision.value < best.value,
            };
            if better {
                best = *decision;
            }
        }

        debug!(
            "{} to move: {} root actions scored, chose {} (value {})",
            mover,
            scored.len(),
            best.action,
            best.value
        );

        Ok(best)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(ExecutionStrategy::Sequential)
    }
}
