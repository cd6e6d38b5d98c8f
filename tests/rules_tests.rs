//! Whole-game rule checks driven through the public `Game` interface.
//!
//! Run with: cargo test --test rules_tests

use chess_rules::board::Board;
use chess_rules::config::{CastlingRule, RulesConfig};
use chess_rules::error::ChessError;
use chess_rules::game::Game;
use chess_rules::types::{Color, GameState, PieceKind, Position};
use pretty_assertions::assert_eq;
use rand::prelude::*;

fn pos(s: &str) -> Position {
    Position::from_algebraic(s).unwrap()
}

fn play(game: &mut Game, moves: &[&str]) {
    for m in moves {
        let (from, to) = m.split_at(2);
        let outcome = game.make_move(pos(from), pos(to));
        assert!(outcome.success, "{m}: {}", outcome.message);
    }
}

fn game_from(diagram: &str, to_move: Color, castling: CastlingRule) -> Game {
    let board = Board::from_diagram(diagram, to_move).unwrap();
    let config = RulesConfig {
        castling,
        ..RulesConfig::default()
    };
    Game::from_board(board, config)
}

#[test]
fn twenty_moves_for_each_side_at_the_start() {
    let mut game = Game::new();
    let white_moves = game.all_legal_moves();
    assert_eq!(white_moves.len(), 20);

    for (from, to) in white_moves {
        assert!(game.make_move(from, to).success);
        assert_eq!(game.all_legal_moves().len(), 20, "after {from}{to}");
        assert!(game.undo_last_move());
    }
}

#[test]
fn random_playouts_never_leave_own_king_in_check() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..12 {
        let mut game = Game::new();
        for _ in 0..80 {
            let moves = game.all_legal_moves();
            let Some(&(from, to)) = moves.choose(&mut rng) else {
                assert!(game.is_game_over());
                break;
            };
            let mover = game.current_player();
            let before = game.board().clone();

            game.try_move(from, to).unwrap();
            assert!(!game.board().is_in_check(mover), "{from}{to} left the king hanging");

            // a single take back restores the exact position
            let after = game.board().clone();
            assert!(game.undo_last_move());
            assert_eq!(game.board(), &before);
            game.try_move(from, to).unwrap();
            assert_eq!(game.board(), &after);

            if game.is_game_over() {
                break;
            }
        }

        while game.undo_last_move() {}
        assert_eq!(game.board(), &Board::new());
        assert!(game.move_log().is_empty());
    }
}

#[test]
fn move_for_the_wrong_side_is_rejected() {
    let mut game = Game::new();
    assert_eq!(
        game.try_move(pos("e7"), pos("e5")),
        Err(ChessError::WrongPlayerPiece(pos("e7")))
    );
    assert_eq!(
        game.try_move(pos("e4"), pos("e5")),
        Err(ChessError::NoPieceAtSource(pos("e4")))
    );
    assert_eq!(
        game.try_move(pos("b1"), pos("d2")),
        Err(ChessError::IllegalMove {
            from: pos("b1"),
            to: pos("d2")
        })
    );
    assert_eq!(game.board(), &Board::new());
}

#[test]
fn en_passant_only_right_after_the_double_push() {
    let mut game = Game::new();
    play(&mut game, &["h2h3", "a7a5", "h3h4", "a5a4", "b2b4"]);
    assert_eq!(game.board().en_passant_target(), Some(pos("b3")));
    assert!(game.legal_moves_from(pos("a4")).contains(&pos("b3")));

    let notation = game.try_move(pos("a4"), pos("b3")).unwrap();
    assert_eq!(notation, "axb3");
    assert_eq!(game.board().get_piece(pos("b4")), None);
    assert_eq!(
        game.board().get_piece(pos("b3")).map(|p| (p.color, p.kind)),
        Some((Color::Black, PieceKind::Pawn))
    );
    assert_eq!(game.board().captured_by(Color::Black).len(), 1);

    // taking it back puts the white pawn on b4, not b3
    assert!(game.undo_last_move());
    assert_eq!(
        game.board().get_piece(pos("b4")).map(|p| p.color),
        Some(Color::White)
    );
    assert_eq!(game.board().get_piece(pos("b3")), None);

    // waiting a move forfeits the capture
    play(&mut game, &["h7h6", "h4h5"]);
    assert!(!game.legal_moves_from(pos("a4")).contains(&pos("b3")));
}

#[test]
fn castling_under_both_rules() {
    let diagram = "k.......
                   ........
                   ........
                   ........
                   ........
                   ........
                   ........
                   R...K..R";
    for rule in [CastlingRule::Standard, CastlingRule::Permissive] {
        let mut game = game_from(diagram, Color::White, rule);
        let king_moves = game.legal_moves_from(pos("e1"));
        assert!(king_moves.contains(&pos("g1")), "{rule:?}");
        assert!(king_moves.contains(&pos("c1")), "{rule:?}");

        assert_eq!(game.try_move(pos("e1"), pos("c1")).unwrap(), "O-O-O");
        assert_eq!(
            game.board().get_piece(pos("d1")).map(|p| p.kind),
            Some(PieceKind::Rook)
        );

        // undo puts both pieces home and castling is available again
        assert!(game.undo_last_move());
        assert_eq!(game.board().get_piece(pos("d1")), None);
        assert!(game.board().get_piece(pos("a1")).is_some_and(|r| !r.has_moved));
        assert!(game.legal_moves_from(pos("e1")).contains(&pos("c1")));
    }
}

#[test]
fn castling_after_the_king_moved_and_returned() {
    let mut game = game_from(
        "k.......
         ........
         ........
         ........
         ........
         ........
         ........
         R...K..R",
        Color::White,
        CastlingRule::Standard,
    );
    play(&mut game, &["e1f1", "a8b8", "f1e1", "b8a8"]);
    let king_moves = game.legal_moves_from(pos("e1"));
    assert!(!king_moves.contains(&pos("g1")));
    assert!(!king_moves.contains(&pos("c1")));
}

#[test]
fn castling_across_an_attacked_square() {
    // the bishop on c4 covers f1 but not g1
    let diagram = "k.......
                   ........
                   ........
                   ........
                   ..b.....
                   ........
                   ........
                   ....K..R";

    let mut game = game_from(diagram, Color::White, CastlingRule::Standard);
    assert!(!game.legal_moves_from(pos("e1")).contains(&pos("g1")));

    let mut game = game_from(diagram, Color::White, CastlingRule::Permissive);
    assert!(game.legal_moves_from(pos("e1")).contains(&pos("g1")));
}

#[test]
fn castling_into_check_is_never_allowed() {
    // the rook on g8 covers the landing square
    let diagram = "k.....r.
                   ........
                   ........
                   ........
                   ........
                   ........
                   ........
                   ....K..R";
    for rule in [CastlingRule::Standard, CastlingRule::Permissive] {
        let mut game = game_from(diagram, Color::White, rule);
        assert!(!game.legal_moves_from(pos("e1")).contains(&pos("g1")), "{rule:?}");
    }
}

#[test]
fn scholars_mate() {
    let mut game = Game::new();
    play(
        &mut game,
        &["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"],
    );
    assert_eq!(game.game_state(), GameState::Checkmate);
    assert_eq!(game.get_winner(), Some(Color::White));
    assert_eq!(game.get_game_status(), "Checkmate! White wins!");
    assert_eq!(
        game.get_move_history(),
        vec!["1. e4 e5", "2. Bc4 Nc6", "3. Qh5 Nf6", "4. Qxf7#"]
    );
    assert!(game.all_legal_moves().is_empty());
}

#[test]
fn ten_move_stalemate() {
    let mut game = Game::new();
    play(
        &mut game,
        &[
            "e2e3", "a7a5", "d1h5", "a8a6", "h5a5", "h7h5", "h2h4", "a6h6", "a5c7", "f7f6",
            "c7d7", "e8f7", "d7b7", "d8d3", "b7b8", "d3h7", "b8c8", "f7g6", "c8e6",
        ],
    );
    assert_eq!(game.game_state(), GameState::Stalemate);
    assert_eq!(game.get_winner(), None);
    assert_eq!(game.get_game_status(), "Stalemate! Game is a draw.");
    assert_eq!(game.move_log()[10], "Qxd7+");
}

#[test]
fn promotion_by_capture() {
    let mut game = game_from(
        "k..r....
         ..P.....
         ........
         ........
         ........
         ........
         ........
         ....K...",
        Color::White,
        CastlingRule::Standard,
    );
    assert_eq!(game.try_move(pos("c7"), pos("d8")).unwrap(), "cxd8=Q+");
    assert_eq!(
        game.board().get_piece(pos("d8")).map(|p| (p.color, p.kind)),
        Some((Color::White, PieceKind::Queen))
    );
    assert_eq!(game.board().captured_by(Color::White).len(), 1);

    assert!(game.undo_last_move());
    assert_eq!(
        game.board().get_piece(pos("d8")).map(|p| (p.color, p.kind)),
        Some((Color::Black, PieceKind::Rook))
    );
    assert_eq!(
        game.board().get_piece(pos("c7")).map(|p| p.kind),
        Some(PieceKind::Pawn)
    );
}

#[test]
fn board_codes_follow_the_moves() {
    let mut game = Game::new();
    play(&mut game, &["e2e4"]);
    assert_eq!(
        game.board_codes(),
        vec![
            "rnbqkbnr", "pppppppp", "........", "........", "....P...", "........",
            "PPPP.PPP", "RNBQKBNR",
        ]
    );
    let snapshot = game.get_board_snapshot();
    assert!(snapshot[6][4].is_none());
    assert_eq!(snapshot[4][4].map(|s| s.kind), Some(PieceKind::Pawn));
}
