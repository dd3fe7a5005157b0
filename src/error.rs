//! Error types for the game core and the session layer

use std::fmt;
use thiserror::Error;

use crate::types::Mark;

/// Why an action was rejected by the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFault {
    Occupied,
    OutOfRange,
}

impl fmt::Display for ActionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionFault::Occupied => f.write_str("cell already occupied"),
            ActionFault::OutOfRange => f.write_str("coordinates out of range"),
        }
    }
}

/// Failures raised by the board model and the search engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid action ({row}, {col}): {fault}")]
    InvalidAction {
        row: usize,
        col: usize,
        fault: ActionFault,
    },

    #[error("invalid state: {reason}")]
    InvalidState { reason: String },
}

/// Failures raised while handling a session request.
///
/// Each variant carries the message shown to the player.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid symbol. Must be X or O")]
    InvalidSymbol,

    #[error("Missing row or col")]
    MissingCoordinates,

    #[error("Player not selected")]
    PlayerNotSelected,

    #[error("Cell out of range")]
    OutOfRange,

    #[error("Cell already occupied")]
    CellOccupied,

    #[error("Game already over")]
    GameOver,

    #[error("Not your turn")]
    NotYourTurn { to_move: Mark },

    #[error("Not AI turn")]
    NotAiTurn,

    #[error(transparent)]
    Game(#[from] GameError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl SessionError {
    /// HTTP status code the web layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            SessionError::Game(GameError::InvalidState { .. }) | SessionError::Internal(_) => 500,
            _ => 400,
        }
    }
}

/// Convenience type alias for core results
pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_action_message() {
        let err = GameError::InvalidAction {
            row: 1,
            col: 2,
            fault: ActionFault::Occupied,
        };
        assert_eq!(err.to_string(), "invalid action (1, 2): cell already occupied");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(SessionError::NotYourTurn { to_move: Mark::X }.status_code(), 400);
        assert_eq!(SessionError::Internal("join".to_string()).status_code(), 500);
        let state = GameError::InvalidState {
            reason: "terminal".to_string(),
        };
        assert_eq!(SessionError::from(state).status_code(), 500);
    }
}
