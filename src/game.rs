use chrono::prelude::*;

use crate::board::{Board, Snapshot};
use crate::config::RulesConfig;
use crate::error::ChessResult;
use crate::movegen::CastleSide;
use crate::types::*;

/// Two-click selection state for interactive clients
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Selected {
        position: Position,
        legal_moves: Vec<Position>,
    },
}

/// What a client gets back from a move attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub success: bool,
    pub message: String,
    /// Algebraic notation of the move when it was accepted
    pub notation: Option<String>,
}

/// A full game: board, derived state, move log and click selection.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    state: GameState,
    selection: Selection,
    notation: Vec<String>,
    config: RulesConfig,
    game_start_time: DateTime<Local>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Game::with_config(RulesConfig::default())
    }

    pub fn with_config(config: RulesConfig) -> Self {
        Game::from_board(Board::new(), config)
    }

    /// Continue from an arbitrary position. The state is derived right away,
    /// so a position with the side to move already mated reads as Checkmate.
    ///
    /// Moves already in the board's history are replayed from their starting
    /// position to rebuild the move log, so it stays in step with undo.
    pub fn from_board(mut board: Board, config: RulesConfig) -> Self {
        board.set_castling_rule(config.castling);

        let mut start = board.clone();
        let mut played = vec![];
        while let Ok(record) = start.undo_last_move() {
            played.push(record);
        }

        let mut game = Self {
            board: start,
            state: GameState::Playing,
            selection: Selection::Idle,
            notation: vec![],
            config: RulesConfig {
                verbose: false,
                ..config
            },
            game_start_time: Local::now(),
        };
        game.update_game_state();
        let mut replaying = true;
        for record in played.into_iter().rev() {
            if replaying {
                let logged = game.notation.len();
                let reproduced = game.try_move(record.from, record.to).is_ok()
                    && game.board.last_move() == Some(&record);
                if reproduced {
                    continue;
                }
                // history the rules cannot reproduce is logged by squares
                game.notation.truncate(logged);
                replaying = false;
            }
            game.notation.push(format!("{}{}", record.from, record.to));
        }

        game.board = board;
        game.config = config;
        game.update_game_state();
        game
    }

    pub fn reset(&mut self) {
        *self = Game::with_config(self.config);
        self.log("new game".to_string());
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.config.verbose = verbose;
    }

    pub fn start_time(&self) -> DateTime<Local> {
        self.game_start_time
    }

    pub fn current_player(&self) -> Color {
        self.board.current_player()
    }

    pub fn game_state(&self) -> GameState {
        self.state
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn get_winner(&self) -> Option<Color> {
        match self.state {
            GameState::Checkmate => Some(self.board.current_player().other_color()),
            _ => None,
        }
    }

    pub fn get_game_status(&self) -> String {
        let player = self.board.current_player();
        match self.state {
            GameState::Checkmate => format!("Checkmate! {} wins!", player.other_color()),
            GameState::Stalemate => "Stalemate! Game is a draw.".to_string(),
            GameState::Draw => "Game is a draw!".to_string(),
            GameState::Check => format!("{player} is in check!"),
            GameState::Playing => format!("{player} to move"),
        }
    }

    pub fn get_board_snapshot(&self) -> Snapshot {
        self.board.snapshot()
    }

    pub fn board_codes(&self) -> Vec<String> {
        self.board.to_codes()
    }

    /// Capture counts per capturing side: `Captured - W: 1, B: 0`
    pub fn captured_summary(&self) -> String {
        format!(
            "Captured - W: {}, B: {}",
            self.board.captured_by(Color::White).len(),
            self.board.captured_by(Color::Black).len()
        )
    }

    /// Move log paired by move number: `["1. e4 e5", "2. Nf3"]`
    pub fn get_move_history(&self) -> Vec<String> {
        self.notation
            .chunks(2)
            .enumerate()
            .map(|(i, pair)| format!("{}. {}", i + 1, pair.join(" ")))
            .collect()
    }

    /// Every accepted move in order, one entry per ply
    pub fn move_log(&self) -> &[String] {
        &self.notation
    }

    /// Legal targets of the piece on `pos`; empty when the square is empty
    pub fn legal_moves_from(&mut self, pos: Position) -> Vec<Position> {
        match self.board.get_piece(pos).copied() {
            Some(piece) => self.board.get_valid_moves(&piece),
            None => vec![],
        }
    }

    pub fn all_legal_moves(&mut self) -> Vec<(Position, Position)> {
        let color = self.board.current_player();
        self.board.all_valid_moves(color)
    }

    pub fn make_move(&mut self, from: Position, to: Position) -> MoveOutcome {
        let moved = self
            .board
            .get_piece(from)
            .map(|p| format!("{} {}", p.color, p.kind.to_human()))
            .unwrap_or_default();
        match self.try_move(from, to) {
            Ok(notation) => MoveOutcome {
                success: true,
                message: format!("{moved} moved from {from} to {to}"),
                notation: Some(notation),
            },
            Err(err) => MoveOutcome {
                success: false,
                message: format!("Invalid move: {err}"),
                notation: None,
            },
        }
    }

    /// Play a move, castling and promotion included, and return its notation
    pub fn try_move(&mut self, from: Position, to: Position) -> ChessResult<String> {
        let is_castle = self.board.get_piece(from).is_some_and(|p| {
            p.kind == PieceKind::King && CastleSide::from_king_move(from, to).is_some()
        });

        self.board.try_make_move(from, to)?;
        if is_castle {
            self.board.relocate_castling_rook(from, to);
        }
        self.board.promote(to);
        self.update_game_state();
        self.selection = Selection::Idle;

        let notation = match self.board.last_move() {
            Some(record) => self.describe_move(record),
            None => format!("{from}{to}"),
        };
        self.notation.push(notation.clone());
        self.log(format!(
            "move {}: {} ({}-{})",
            (self.notation.len() + 1) / 2,
            notation,
            from,
            to
        ));
        Ok(notation)
    }

    pub fn undo_last_move(&mut self) -> bool {
        self.try_undo().is_ok()
    }

    pub fn try_undo(&mut self) -> ChessResult<()> {
        let record = self.board.undo_last_move()?;
        let notation = self.notation.pop();
        self.selection = Selection::Idle;
        self.update_game_state();
        self.log(format!(
            "undo {} ({}-{})",
            notation.unwrap_or_default(),
            record.from,
            record.to
        ));
        Ok(())
    }

    /// Feed a click on `pos` into the selection state machine. Returns whether
    /// the click selected, deselected or moved.
    pub fn select_square(&mut self, pos: Position) -> bool {
        let own_piece = self
            .board
            .get_piece(pos)
            .is_some_and(|p| p.color == self.board.current_player());

        match self.selection.clone() {
            Selection::Idle => {
                if own_piece {
                    self.select(pos);
                }
                own_piece
            }
            Selection::Selected { position, .. } if position == pos => {
                self.deselect();
                true
            }
            Selection::Selected { .. } if own_piece => {
                self.select(pos);
                true
            }
            Selection::Selected {
                position,
                legal_moves,
            } if legal_moves.contains(&pos) => {
                let success = self.make_move(position, pos).success;
                self.deselect();
                success
            }
            Selection::Selected { .. } => {
                self.deselect();
                false
            }
        }
    }

    fn select(&mut self, pos: Position) {
        let legal_moves = self.legal_moves_from(pos);
        self.selection = Selection::Selected {
            position: pos,
            legal_moves,
        };
    }

    pub fn deselect(&mut self) {
        self.selection = Selection::Idle;
    }

    fn update_game_state(&mut self) {
        let color = self.board.current_player();
        let in_check = self.board.is_in_check(color);
        let has_moves = self.board.has_valid_moves(color);
        self.state = match (in_check, has_moves) {
            (true, false) => GameState::Checkmate,
            (false, false) => GameState::Stalemate,
            _ if self.config.insufficient_material_draw
                && self.board.has_insufficient_material() =>
            {
                GameState::Draw
            }
            (true, true) => GameState::Check,
            (false, true) => GameState::Playing,
        };
    }

    /// Short algebraic form of a played move, with `+`/`#` from the current state
    fn describe_move(&self, record: &MoveRecord) -> String {
        let mut notation = match record.castling_rook {
            Some(_) if record.to.col > record.from.col => "O-O".to_string(),
            Some(_) => "O-O-O".to_string(),
            None => {
                let capture = if record.captured.is_some() { "x" } else { "" };
                let prefix = match record.piece.kind {
                    PieceKind::Pawn if record.captured.is_some() => {
                        record.from.file_char().to_string()
                    }
                    PieceKind::Pawn => String::new(),
                    kind => kind.to_char().to_string(),
                };
                format!("{prefix}{capture}{}", record.to)
            }
        };
        if record.promoted {
            notation.push_str("=Q");
        }
        match self.state {
            GameState::Checkmate => notation.push('#'),
            GameState::Check => notation.push('+'),
            _ => {}
        }
        notation
    }

    fn log(&self, message: String) {
        if self.config.verbose {
            println!("[{}] {}", Local::now().format("%H:%M:%S"), message);
        }
    }
}
