//! Session Transition Tests
//!
//! Each request is a pure function from one session value to the next; these
//! tests drive full games through the transitions without a server.

use minimax_tictactoe::board::Board;
use minimax_tictactoe::error::SessionError;
use minimax_tictactoe::search::Engine;
use minimax_tictactoe::session::GameSession;
use minimax_tictactoe::types::{Action, Mark};

fn engine() -> Engine {
    Engine::default()
}

#[test]
fn test_selecting_x_leaves_board_empty() {
    let update = GameSession::new()
        .select_player(Some("X"), &engine())
        .unwrap();

    assert!(update.ai_decision.is_none());
    assert_eq!(update.session.board, Board::initial());

    let view = update.session.view();
    assert_eq!(view.human_player, Some(Mark::X));
    assert_eq!(view.is_human_turn, Some(true));
    assert!(!view.needs_player_selection);
}

#[test]
fn test_selecting_o_lets_ai_open() {
    let update = GameSession::new()
        .select_player(Some("O"), &engine())
        .unwrap();

    let ai = update.ai_decision.expect("AI should open for an O human");
    assert_eq!(ai.board, Board::initial());
    assert_eq!(ai.decision.action, Action::new(0, 0));

    let view = update.session.view();
    assert_eq!(view.board.ply(), 1);
    assert_eq!(view.current_player, Some(Mark::O));
    assert_eq!(view.is_human_turn, Some(true));
}

#[test]
fn test_invalid_symbol_is_rejected() {
    let session = GameSession::new();
    assert_eq!(
        session.select_player(Some("Z"), &engine()).unwrap_err(),
        SessionError::InvalidSymbol
    );
    assert_eq!(
        session.select_player(None, &engine()).unwrap_err(),
        SessionError::InvalidSymbol
    );
}

#[test]
fn test_move_validation_order() {
    let e = engine();
    let fresh = GameSession::new();

    assert_eq!(
        fresh.play_move(None, Some(1), &e).unwrap_err(),
        SessionError::MissingCoordinates
    );
    assert_eq!(
        fresh.play_move(Some(1), Some(1), &e).unwrap_err(),
        SessionError::PlayerNotSelected
    );

    let session = fresh.select_player(Some("X"), &e).unwrap().session;
    assert_eq!(
        session.play_move(Some(3), Some(0), &e).unwrap_err(),
        SessionError::OutOfRange
    );
    assert_eq!(
        session.play_move(Some(-1), Some(0), &e).unwrap_err(),
        SessionError::OutOfRange
    );

    let after = session.play_move(Some(1), Some(1), &e).unwrap().session;
    assert_eq!(
        after.play_move(Some(1), Some(1), &e).unwrap_err(),
        SessionError::CellOccupied
    );
}

#[test]
fn test_human_move_gets_ai_reply() {
    let e = engine();
    let session = GameSession::new()
        .select_player(Some("X"), &e)
        .unwrap()
        .session;

    let update = session.play_move(Some(1), Some(1), &e).unwrap();
    let ai = update.ai_decision.expect("AI should answer");

    assert_eq!(ai.board.cell(1, 1), Some(Some(Mark::X)));
    assert_eq!(update.session.board.ply(), 2);
    assert_eq!(update.session.view().is_human_turn, Some(true));
}

#[test]
fn test_not_your_turn_and_not_ai_turn() {
    let e = engine();
    let session = GameSession::new()
        .select_player(Some("O"), &e)
        .unwrap()
        .session;

    // Human is O and it is O's turn: the AI must wait
    assert_eq!(session.ai_move(&e).unwrap_err(), SessionError::NotAiTurn);

    // O human on an empty board: the AI has not opened yet
    let stale = GameSession {
        board: Board::initial(),
        human: Some(Mark::O),
    };
    assert_eq!(
        stale.play_move(Some(1), Some(1), &e).unwrap_err(),
        SessionError::NotYourTurn { to_move: Mark::X }
    );

    let update = stale.ai_move(&e).unwrap();
    assert_eq!(update.session.board.ply(), 1);
}

#[test]
fn test_ai_move_requires_player() {
    assert_eq!(
        GameSession::new().ai_move(&engine()).unwrap_err(),
        SessionError::PlayerNotSelected
    );
}

#[test]
fn test_full_game_against_ai_never_won_by_human() {
    let e = engine();
    let mut session = GameSession::new()
        .select_player(Some("X"), &e)
        .unwrap()
        .session;

    // Human always plays the first empty cell
    while !session.board.is_terminal() {
        let action = session.board.legal_actions()[0];
        session = session
            .play_move(Some(action.row as i64), Some(action.col as i64), &e)
            .unwrap()
            .session;
    }

    let view = session.view();
    assert!(view.is_terminal);
    assert_eq!(view.current_player, None);
    assert_ne!(view.winner, Some(Mark::X));
    assert_eq!(
        session.play_move(Some(0), Some(0), &e).unwrap_err(),
        SessionError::CellOccupied
    );
}

#[test]
fn test_move_on_finished_game_is_game_over() {
    let e = engine();
    // X has won on the top row; (2,2) is still empty
    let grid = [
        [Some(Mark::X), Some(Mark::X), Some(Mark::X)],
        [Some(Mark::O), Some(Mark::O), None],
        [None, None, None],
    ];
    let session = GameSession {
        board: Board::from_grid(grid).unwrap(),
        human: Some(Mark::O),
    };

    assert_eq!(
        session.play_move(Some(2), Some(2), &e).unwrap_err(),
        SessionError::GameOver
    );
    assert_eq!(session.ai_move(&e).unwrap_err(), SessionError::GameOver);

    let view = session.view();
    assert_eq!(view.winner, Some(Mark::X));
    assert!(!view.is_draw);
    assert_eq!(view.is_human_turn, Some(false));
}

#[test]
fn test_reset_clears_or_keeps_player() {
    let e = engine();
    let session = GameSession::new()
        .select_player(Some("O"), &e)
        .unwrap()
        .session;

    let cleared = session.reset(false, &e).unwrap();
    assert!(cleared.ai_decision.is_none());
    assert!(cleared.session.view().needs_player_selection);
    assert_eq!(cleared.session.board, Board::initial());

    let kept = session.reset(true, &e).unwrap();
    assert!(kept.ai_decision.is_some(), "AI reopens for an O human");
    assert_eq!(kept.session.human, Some(Mark::O));
    assert_eq!(kept.session.board.ply(), 1);
}
