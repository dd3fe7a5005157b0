// Per-player game sessions
//
// A session pairs a board with the mark the human chose. Every request is a
// pure transition: it takes the current session value and returns the next
// one, so the caller decides where sessions live. The in-memory store at the
// bottom of this file is what the web server uses.

use log::debug;
use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::convert::TryFrom;

use crate::board::Board;
use crate::error::{ActionFault, GameError, SessionError};
use crate::search::{Decision, Engine};
use crate::types::{Action, Mark};

/// Body of POST /select-player. Any JSON value is accepted so that non-string
/// symbols are rejected as invalid symbols rather than as malformed bodies.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SelectPlayerRequest {
    pub symbol: Option<Value>,
}

impl SelectPlayerRequest {
    /// The symbol when it was sent as a JSON string
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_ref().and_then(Value::as_str)
    }
}

/// Body of POST /move. Coordinates are signed so negative input reaches range validation.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct MoveRequest {
    pub row: Option<i64>,
    pub col: Option<i64>,
}

/// Body of POST /reset
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequest {
    #[serde(default)]
    pub keep_player: bool,
}

/// Snapshot of a session as returned by every endpoint
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StateView {
    pub board: Board,
    pub current_player: Option<Mark>,
    pub human_player: Option<Mark>,
    pub is_human_turn: Option<bool>,
    pub is_terminal: bool,
    pub winner: Option<Mark>,
    pub is_draw: bool,
    pub needs_player_selection: bool,
}

/// A move the AI made, with the board it was computed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiDecision {
    pub board: Board,
    pub decision: Decision,
}

/// Result of a session transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUpdate {
    pub session: GameSession,
    pub ai_decision: Option<AiDecision>,
}

impl SessionUpdate {
    fn without_ai(session: GameSession) -> Self {
        SessionUpdate {
            session,
            ai_decision: None,
        }
    }
}

/// Board plus the human's mark (unset until the player picks one)
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameSession {
    pub board: Board,
    pub human: Option<Mark>,
}

impl GameSession {
    /// Fresh session: empty board, no player selected
    pub fn new() -> Self {
        GameSession::default()
    }

    pub fn view(&self) -> StateView {
        let is_terminal = self.board.is_terminal();
        let winner = if is_terminal { self.board.winner() } else { None };
        let current_player = if is_terminal {
            None
        } else {
            Some(self.board.player_to_move())
        };

        StateView {
            board: self.board,
            current_player,
            human_player: self.human,
            is_human_turn: self.human.map(|h| Some(h) == current_player),
            is_terminal,
            winner,
            is_draw: is_terminal && winner.is_none(),
            needs_player_selection: self.human.is_none(),
        }
    }

    /// Starts a new game with the human playing `symbol`.
    /// When the human takes O the AI opens as X.
    pub fn select_player(
        &self,
        symbol: Option<&str>,
        engine: &Engine,
    ) -> Result<SessionUpdate, SessionError> {
        let human = symbol.and_then(Mark::parse).ok_or(SessionError::InvalidSymbol)?;

        let session = GameSession {
            board: Board::initial(),
            human: Some(human),
        };
        session.open_for_ai(engine)
    }

    /// Applies the human's move, then the AI's reply unless the game just ended
    pub fn play_move(
        &self,
        row: Option<i64>,
        col: Option<i64>,
        engine: &Engine,
    ) -> Result<SessionUpdate, SessionError> {
        let (row, col) = match (row, col) {
            (Some(row), Some(col)) => (row, col),
            _ => return Err(SessionError::MissingCoordinates),
        };

        let human = self.human.ok_or(SessionError::PlayerNotSelected)?;

        let action = match (usize::try_from(row), usize::try_from(col)) {
            (Ok(row), Ok(col)) if Action::new(row, col).in_bounds() => Action::new(row, col),
            _ => return Err(SessionError::OutOfRange),
        };

        if self.board.cell(action.row, action.col) != Some(None) {
            return Err(SessionError::CellOccupied);
        }

        if self.board.is_terminal() {
            return Err(SessionError::GameOver);
        }

        let to_move = self.board.player_to_move();
        if to_move != human {
            return Err(SessionError::NotYourTurn { to_move });
        }

        let board = self.board.apply_action(action).map_err(map_action_error)?;
        let after_human = GameSession { board, ..*self };

        if board.is_terminal() {
            debug!("Game finished by human move {}", action);
            return Ok(SessionUpdate::without_ai(after_human));
        }

        after_human.reply(engine)
    }

    /// Lets the AI move when it is its turn
    pub fn ai_move(&self, engine: &Engine) -> Result<SessionUpdate, SessionError> {
        let human = self.human.ok_or(SessionError::PlayerNotSelected)?;

        if self.board.is_terminal() {
            return Err(SessionError::GameOver);
        }

        if self.board.player_to_move() != human.opponent() {
            return Err(SessionError::NotAiTurn);
        }

        self.reply(engine)
    }

    /// Clears the board. The player choice survives only with `keep_player`,
    /// in which case an O human immediately faces the AI's opening move.
    pub fn reset(&self, keep_player: bool, engine: &Engine) -> Result<SessionUpdate, SessionError> {
        if !keep_player {
            return Ok(SessionUpdate::without_ai(GameSession::new()));
        }

        let session = GameSession {
            board: Board::initial(),
            human: self.human,
        };
        session.open_for_ai(engine)
    }

    /// On a fresh board, the AI opens if the human chose O
    fn open_for_ai(self, engine: &Engine) -> Result<SessionUpdate, SessionError> {
        if self.human == Some(Mark::O) {
            self.reply(engine)
        } else {
            Ok(SessionUpdate::without_ai(self))
        }
    }

    fn reply(self, engine: &Engine) -> Result<SessionUpdate, SessionError> {
        let decision = engine.search(&self.board)?;
        let board = self
            .board
            .apply_action(decision.action)
            .map_err(map_action_error)?;

        Ok(SessionUpdate {
            session: GameSession { board, ..self },
            ai_decision: Some(AiDecision {
                board: self.board,
                decision,
            }),
        })
    }
}

fn map_action_error(err: GameError) -> SessionError {
    match err {
        GameError::InvalidAction {
            fault: ActionFault::Occupied,
            ..
        } => SessionError::CellOccupied,
        GameError::InvalidAction {
            fault: ActionFault::OutOfRange,
            ..
        } => SessionError::OutOfRange,
        other => SessionError::Game(other),
    }
}

/// In-memory session table keyed by cookie id
pub struct SessionStore {
    sessions: Mutex<HashMap<String, GameSession>>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        SessionStore {
            sessions: Mutex::new(HashMap::new()),
            max_sessions,
        }
    }

    /// Random 128-bit id, hex encoded
    pub fn new_id() -> String {
        format!("{:032x}", rand::rng().random::<u128>())
    }

    /// Returns the stored session or a fresh one (not yet stored)
    pub fn load(&self, id: &str) -> GameSession {
        self.sessions.lock().get(id).copied().unwrap_or_default()
    }

    /// Stores `session` under `id`, evicting an arbitrary entry when full
    pub fn save(&self, id: &str, session: GameSession) {
        let mut sessions = self.sessions.lock();

        if !sessions.contains_key(id) && sessions.len() >= self.max_sessions {
            let evicted = sessions.keys().next().cloned();
            if let Some(key) = evicted {
                debug!("Session store full, evicting {}", key);
                sessions.remove(&key);
            }
        }

        sessions.insert(id.to_string(), session);
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_needs_player_selection() {
        let view = GameSession::new().view();
        assert!(view.needs_player_selection);
        assert_eq!(view.is_human_turn, None);
        assert_eq!(view.current_player, Some(Mark::X));
        assert!(!view.is_terminal);
    }

    #[test]
    fn test_state_view_uses_camel_case() {
        let json = serde_json::to_value(GameSession::new().view()).unwrap();
        assert!(json.get("needsPlayerSelection").is_some());
        assert!(json.get("isHumanTurn").unwrap().is_null());
        assert_eq!(json["currentPlayer"], "X");
    }

    #[test]
    fn test_select_request_accepts_any_symbol_value() {
        let req: SelectPlayerRequest = serde_json::from_str(r#"{"symbol": 1}"#).unwrap();
        assert_eq!(req.symbol(), None);
        assert_eq!(
            GameSession::new()
                .select_player(req.symbol(), &Engine::default())
                .unwrap_err(),
            SessionError::InvalidSymbol
        );

        let req: SelectPlayerRequest = serde_json::from_str(r#"{"symbol": "O"}"#).unwrap();
        assert_eq!(req.symbol(), Some("O"));

        let req: SelectPlayerRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.symbol(), None);
    }

    #[test]
    fn test_reset_request_defaults_keep_player() {
        let req: ResetRequest = serde_json::from_str("{}").unwrap();
        assert!(!req.keep_player);
        let req: ResetRequest = serde_json::from_str(r#"{"keepPlayer": true}"#).unwrap();
        assert!(req.keep_player);
    }

    #[test]
    fn test_store_evicts_when_full() {
        let store = SessionStore::new(2);
        store.save("a", GameSession::new());
        store.save("b", GameSession::new());
        store.save("a", GameSession::new());
        assert_eq!(store.len(), 2);

        store.save("c", GameSession::new());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_new_ids_are_distinct_hex() {
        let a = SessionStore::new_id();
        let b = SessionStore::new_id();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
