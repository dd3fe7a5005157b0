//! Board Model Tests
//!
//! Turn order, terminal detection and the wire grid format, exercised
//! through whole games rather than single moves.

use minimax_tictactoe::board::Board;
use minimax_tictactoe::types::{Action, Mark, Outcome};

/// Plays `moves` from the empty board, panicking on an illegal move
fn play(moves: &[(usize, usize)]) -> Board {
    moves.iter().fold(Board::initial(), |board, &(r, c)| {
        board
            .apply_action(Action::new(r, c))
            .expect("test game should only contain legal moves")
    })
}

#[test]
fn test_player_to_move_alternates_every_ply() {
    let mut board = Board::initial();
    let mut expected = Mark::X;

    while !board.is_terminal() {
        assert_eq!(board.player_to_move(), expected, "ply {}", board.ply());
        let action = *board.legal_actions().last().unwrap();
        board = board.apply_action(action).unwrap();
        expected = expected.opponent();
    }

    assert!(board.ply() >= 5);
}

#[test]
fn test_every_cell_is_filled_by_the_mover() {
    let mut board = Board::initial();
    for action in Action::all() {
        if board.is_terminal() {
            break;
        }
        let mover = board.player_to_move();
        let next = board.apply_action(action).unwrap();
        assert_eq!(next.cell(action.row, action.col), Some(Some(mover)));
        assert_eq!(next.ply(), board.ply() + 1);
        board = next;
    }
}

#[test]
fn test_legal_actions_exclude_occupied_cells() {
    let board = play(&[(1, 1), (0, 0), (2, 2)]);
    let actions = board.legal_actions();

    assert_eq!(actions.len(), 6);
    assert!(!actions.contains(&Action::new(1, 1)));
    assert!(!actions.contains(&Action::new(0, 0)));
    assert!(!actions.contains(&Action::new(2, 2)));
    assert_eq!(actions[0], Action::new(0, 1), "actions are row-major");
}

#[test]
fn test_terminal_boards_have_no_moves_unless_won_early() {
    // X wins down the first column on ply 5 with four cells still empty
    let won = play(&[(0, 0), (0, 1), (1, 0), (1, 1), (2, 0)]);
    assert!(won.is_terminal());
    assert_eq!(won.outcome(), Outcome::Win(Mark::X));
    assert_eq!(won.legal_actions().len(), 4);

    // X O X / X O O / O X X
    let drawn = play(&[
        (0, 0),
        (0, 1),
        (0, 2),
        (1, 1),
        (1, 0),
        (1, 2),
        (2, 1),
        (2, 0),
        (2, 2),
    ]);
    assert!(drawn.is_terminal());
    assert!(drawn.legal_actions().is_empty());
}

#[test]
fn test_full_board_draw_has_zero_utility() {
    let json = r#"[["X","O","X"],["X","O","O"],["O","X","X"]]"#;
    let board: Board = serde_json::from_str(json).unwrap();

    assert!(board.is_terminal());
    assert_eq!(board.winner(), None);
    assert_eq!(board.utility(), 0);
}

#[test]
fn test_parsing_rejects_grid_with_o_ahead() {
    let json = r#"[["O",null,null],[null,null,null],[null,null,null]]"#;
    let result: Result<Board, _> = serde_json::from_str(json);
    assert!(result.is_err());
}

#[test]
fn test_parsing_rejects_wrong_shape_and_symbols() {
    let short = r#"[[null,null,null],[null,null,null]]"#;
    assert!(serde_json::from_str::<Board>(short).is_err());

    let bad_symbol = r#"[["Z",null,null],[null,null,null],[null,null,null]]"#;
    assert!(serde_json::from_str::<Board>(bad_symbol).is_err());
}

#[test]
fn test_wire_round_trip_of_mid_game_board() {
    let board = play(&[(0, 2), (1, 1), (2, 0), (1, 0)]);
    let json = serde_json::to_value(board).unwrap();
    let parsed: Board = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, board);
    assert_eq!(parsed.player_to_move(), Mark::X);
}
