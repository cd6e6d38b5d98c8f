use itertools::{iproduct, Itertools};

use crate::config::CastlingRule;
use crate::error::{ChessError, ChessResult};
use crate::movegen::{
    moves_with_castling, observed_squares, pseudo_legal_moves, CastleSide, KING_HOME_COL,
};
use crate::types::*;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Grid of pieces addressed as `squares[row][col]`
type Grid = [[Option<Piece>; BOARD_SIZE as usize]; BOARD_SIZE as usize];

pub type Snapshot = [[Option<SquareView>; BOARD_SIZE as usize]; BOARD_SIZE as usize];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: Grid,
    current_player: Color,
    move_history: Vec<MoveRecord>,
    /// Pieces captured by each color, indexed by `Color::index`
    captured_pieces: [Vec<Piece>; 2],
    king_positions: [Position; 2],
    en_passant_target: Option<Position>,
    castling_rule: CastlingRule,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard starting position, White to move
    pub fn new() -> Board {
        let mut board = Board::empty(Color::White);
        for (col, kind) in BACK_RANK.iter().enumerate() {
            let col = col as i8;
            for color in [Color::White, Color::Black] {
                board.place(Piece::new(
                    color,
                    *kind,
                    Position {
                        row: color.home_row(),
                        col,
                    },
                ));
                board.place(Piece::new(
                    color,
                    PieceKind::Pawn,
                    Position {
                        row: color.pawn_start_row(),
                        col,
                    },
                ));
            }
        }
        board
    }

    fn empty(current_player: Color) -> Board {
        Board {
            squares: [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize],
            current_player,
            move_history: vec![],
            captured_pieces: [vec![], vec![]],
            king_positions: [
                Position {
                    row: Color::White.home_row(),
                    col: KING_HOME_COL,
                },
                Position {
                    row: Color::Black.home_row(),
                    col: KING_HOME_COL,
                },
            ],
            en_passant_target: None,
            castling_rule: CastlingRule::default(),
        }
    }

    /// Build a position from eight rows of piece chars, rank 8 first.
    ///
    /// Uppercase is White, lowercase Black, `.` an empty square; whitespace
    /// inside a row is ignored. Kings, rooks and pawns away from their home
    /// squares are marked as having moved.
    pub fn from_diagram(diagram: &str, current_player: Color) -> ChessResult<Board> {
        let rows: Vec<Vec<char>> = diagram
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();
        if rows.len() != BOARD_SIZE as usize {
            return Err(ChessError::InvalidDiagram(format!(
                "expected 8 rows, found {}",
                rows.len()
            )));
        }

        let mut board = Board::empty(current_player);
        let mut king_counts = [0; 2];
        for (row, chars) in rows.iter().enumerate() {
            if chars.len() != BOARD_SIZE as usize {
                return Err(ChessError::InvalidDiagram(format!(
                    "row {} has {} squares",
                    row + 1,
                    chars.len()
                )));
            }
            for (col, &c) in chars.iter().enumerate() {
                if c == '.' {
                    continue;
                }
                let position = Position {
                    row: row as i8,
                    col: col as i8,
                };
                let mut piece = Piece::from_char(c, position).ok_or_else(|| {
                    ChessError::InvalidDiagram(format!("unexpected char {c:?}"))
                })?;
                piece.has_moved = !is_home_square(&piece);
                if piece.kind == PieceKind::King {
                    king_counts[piece.color.index()] += 1;
                }
                board.place(piece);
            }
        }
        if king_counts != [1, 1] {
            return Err(ChessError::InvalidDiagram(
                "each side needs exactly one king".to_string(),
            ));
        }
        Ok(board)
    }

    fn place(&mut self, piece: Piece) {
        self.set_piece(piece.position, Some(piece));
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn en_passant_target(&self) -> Option<Position> {
        self.en_passant_target
    }

    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.move_history.last()
    }

    /// Pieces `color` has captured, in capture order
    pub fn captured_by(&self, color: Color) -> &[Piece] {
        &self.captured_pieces[color.index()]
    }

    pub fn king_position(&self, color: Color) -> Position {
        self.king_positions[color.index()]
    }

    pub fn castling_rule(&self) -> CastlingRule {
        self.castling_rule
    }

    pub fn set_castling_rule(&mut self, rule: CastlingRule) {
        self.castling_rule = rule;
    }

    pub fn get_piece(&self, pos: Position) -> Option<&Piece> {
        if !pos.is_valid() {
            return None;
        }
        self.squares[pos.row as usize][pos.col as usize].as_ref()
    }

    /// Put `piece` on `pos` (or clear it). The piece's own position and the
    /// king cache follow.
    pub fn set_piece(&mut self, pos: Position, piece: Option<Piece>) {
        if !pos.is_valid() {
            return;
        }
        let piece = piece.map(|mut p| {
            p.position = pos;
            if p.kind == PieceKind::King {
                self.king_positions[p.color.index()] = pos;
            }
            p
        });
        self.squares[pos.row as usize][pos.col as usize] = piece;
    }

    pub fn remove_piece(&mut self, pos: Position) -> Option<Piece> {
        if !pos.is_valid() {
            return None;
        }
        self.squares[pos.row as usize][pos.col as usize].take()
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.get_piece(pos).is_none()
    }

    pub fn is_enemy(&self, pos: Position, color: Color) -> bool {
        self.get_piece(pos).is_some_and(|p| p.color != color)
    }

    pub fn is_friendly(&self, pos: Position, color: Color) -> bool {
        self.get_piece(pos).is_some_and(|p| p.color == color)
    }

    pub fn pieces(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.squares
            .iter()
            .flatten()
            .flatten()
            .filter(move |p| p.color == color)
    }

    pub fn get_all_pieces(&self, color: Color) -> Vec<Piece> {
        self.pieces(color).copied().collect()
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        let king_position = self.king_position(color);
        self.pieces(color.other_color())
            .any(|piece| pseudo_legal_moves(piece, self).contains(&king_position))
    }

    /// Does any piece of `by` attack `pos`
    pub fn is_square_observed(&self, pos: Position, by: Color) -> bool {
        self.pieces(by)
            .any(|piece| observed_squares(piece, self).contains(&pos))
    }

    /// Square of the pawn taken if `piece` moving to `to` is an en passant capture
    fn en_passant_capture_square(&self, piece: &Piece, to: Position) -> Option<Position> {
        let is_en_passant = piece.kind == PieceKind::Pawn
            && self.en_passant_target == Some(to)
            && to.col != piece.position.col;
        is_en_passant.then_some(Position {
            row: to.row - piece.color.pawn_direction(),
            col: to.col,
        })
    }

    /// Play `from`-`to` on the board, see whether `color` is in check, then put
    /// everything back.
    pub fn would_be_in_check(&mut self, from: Position, to: Position, color: Color) -> bool {
        let Some(moving) = self.get_piece(from).copied() else {
            return self.is_in_check(color);
        };
        let saved_kings = self.king_positions;

        let en_passant_victim = self
            .en_passant_capture_square(&moving, to)
            .and_then(|square| self.remove_piece(square));
        self.remove_piece(from);
        let captured = self.remove_piece(to);
        self.set_piece(to, Some(moving));

        let in_check = self.is_in_check(color);

        self.set_piece(to, captured);
        self.set_piece(from, Some(moving));
        if let Some(victim) = en_passant_victim {
            self.set_piece(victim.position, Some(victim));
        }
        self.king_positions = saved_kings;
        in_check
    }

    /// Legal target squares of `piece`, castling included for kings
    pub fn get_valid_moves(&mut self, piece: &Piece) -> Vec<Position> {
        let candidates = match piece.kind {
            PieceKind::King => moves_with_castling(piece, self),
            _ => pseudo_legal_moves(piece, self),
        };
        candidates
            .into_iter()
            .filter(|&to| !self.would_be_in_check(piece.position, to, piece.color))
            .collect()
    }

    /// Every legal `(from, to)` pair for `color`
    pub fn all_valid_moves(&mut self, color: Color) -> Vec<(Position, Position)> {
        let mut moves = vec![];
        for piece in self.get_all_pieces(color) {
            for to in self.get_valid_moves(&piece) {
                moves.push((piece.position, to));
            }
        }
        moves
    }

    pub fn has_valid_moves(&mut self, color: Color) -> bool {
        self.get_all_pieces(color)
            .iter()
            .any(|piece| !self.get_valid_moves(piece).is_empty())
    }

    pub fn make_move(&mut self, from: Position, to: Position) -> bool {
        self.try_make_move(from, to).is_ok()
    }

    /// Validate and play a single piece move. The rook half of a castle is
    /// not moved here, see [`Board::relocate_castling_rook`].
    pub fn try_make_move(&mut self, from: Position, to: Position) -> ChessResult<MoveRecord> {
        let piece = *self
            .get_piece(from)
            .ok_or(ChessError::NoPieceAtSource(from))?;
        if piece.color != self.current_player {
            return Err(ChessError::WrongPlayerPiece(from));
        }
        if !self.get_valid_moves(&piece).contains(&to) {
            return Err(ChessError::IllegalMove { from, to });
        }

        let captured = match self.en_passant_capture_square(&piece, to) {
            Some(square) => self.remove_piece(square),
            None => self.remove_piece(to),
        };
        if let Some(captured) = captured {
            self.captured_pieces[piece.color.index()].push(captured);
        }

        let mut moved = piece;
        moved.move_to(to);
        self.remove_piece(from);
        self.set_piece(to, Some(moved));

        let record = MoveRecord {
            from,
            to,
            piece,
            captured,
            en_passant_target: self.en_passant_target,
            castling_rook: None,
            promoted: false,
        };

        self.en_passant_target = if piece.kind == PieceKind::Pawn && (to.row - from.row).abs() == 2
        {
            Some(Position {
                row: (from.row + to.row) / 2,
                col: from.col,
            })
        } else {
            None
        };

        self.move_history.push(record);
        self.current_player = self.current_player.other_color();
        Ok(record)
    }

    /// Move the rook belonging to a castle whose king step was just played.
    /// Castling eligibility was settled when the king move was generated.
    pub fn relocate_castling_rook(
        &mut self,
        king_from: Position,
        king_to: Position,
    ) -> Option<CastlingRook> {
        let side = CastleSide::from_king_move(king_from, king_to)?;
        let rook_from = Position {
            row: king_from.row,
            col: side.rook_col(),
        };
        let rook_to = Position {
            row: king_from.row,
            col: side.rook_target_col(),
        };
        let rook = self.remove_piece(rook_from)?;
        let mut moved = rook;
        moved.move_to(rook_to);
        self.set_piece(rook_to, Some(moved));

        let castling_rook = CastlingRook { rook, to: rook_to };
        if let Some(record) = self.move_history.last_mut() {
            record.castling_rook = Some(castling_rook);
        }
        Some(castling_rook)
    }

    /// Replace a pawn standing on the last rank with a queen
    pub fn promote(&mut self, pos: Position) -> bool {
        let Some(pawn) = self.get_piece(pos).copied() else {
            return false;
        };
        if pawn.kind != PieceKind::Pawn || (pos.row != 0 && pos.row != BOARD_SIZE - 1) {
            return false;
        }
        let mut queen = Piece::new(pawn.color, PieceKind::Queen, pos);
        queen.has_moved = true;
        self.set_piece(pos, Some(queen));
        if let Some(record) = self.move_history.last_mut().filter(|r| r.to == pos) {
            record.promoted = true;
        }
        true
    }

    /// Take back the latest move, rook half of a castle and promotion included
    pub fn undo_last_move(&mut self) -> ChessResult<MoveRecord> {
        let record = self
            .move_history
            .pop()
            .ok_or(ChessError::NoHistoryToUndo)?;

        if let Some(castling_rook) = record.castling_rook {
            self.remove_piece(castling_rook.to);
            self.set_piece(castling_rook.rook.position, Some(castling_rook.rook));
        }

        // the recorded piece is the pawn for a promotion, which removes the queen
        self.remove_piece(record.to);
        self.set_piece(record.from, Some(record.piece));

        if let Some(captured) = record.captured {
            self.set_piece(captured.position, Some(captured));
            self.captured_pieces[record.piece.color.index()].pop();
        }

        self.en_passant_target = record.en_passant_target;
        self.current_player = record.piece.color;
        Ok(record)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.squares
            .map(|row| row.map(|square| square.as_ref().map(SquareView::from)))
    }

    /// One string per row, rank 8 first: `P R N B Q K` for White, lowercase
    /// for Black, `.` for an empty square
    pub fn to_codes(&self) -> Vec<String> {
        self.squares
            .iter()
            .map(|row| {
                row.iter()
                    .map(|square| square.as_ref().map_or('.', Piece::to_char))
                    .collect::<String>()
            })
            .collect()
    }

    /// Board with rank and file labels, using unicode symbols or the
    /// diagram letters
    pub fn draw_board(&self, unicode: bool) -> String {
        let files = "  a b c d e f g h";
        let rows = (0..BOARD_SIZE).map(|row| {
            let rank = BOARD_SIZE - row;
            let squares = (0..BOARD_SIZE)
                .map(|col| match self.get_piece(Position { row, col }) {
                    Some(piece) if unicode => piece.to_symbol().to_string(),
                    Some(piece) => piece.to_char().to_string(),
                    None => ".".to_string(),
                })
                .join(" ");
            format!("{rank} {squares} {rank}")
        });
        std::iter::once(files.to_string())
            .chain(rows)
            .chain(std::iter::once(files.to_string()))
            .join("\n")
    }

    /// Neither side has enough material left to deliver mate
    pub fn has_insufficient_material(&self) -> bool {
        let non_kings: Vec<(Piece, bool)> = iproduct!(0..BOARD_SIZE, 0..BOARD_SIZE)
            .filter_map(|(row, col)| self.get_piece(Position { row, col }))
            .filter(|p| p.kind != PieceKind::King)
            .map(|p| (*p, (p.position.row + p.position.col) % 2 == 0))
            .collect();

        match non_kings.as_slice() {
            [] => true,
            [(piece, _)] => matches!(piece.kind, PieceKind::Bishop | PieceKind::Knight),
            pieces => pieces
                .iter()
                .map(|(p, light)| (p.kind, *light))
                .all_equal_value()
                .is_ok_and(|(kind, _)| kind == PieceKind::Bishop),
        }
    }
}

fn is_home_square(piece: &Piece) -> bool {
    let pos = piece.position;
    let home_row = piece.color.home_row();
    match piece.kind {
        PieceKind::King => pos.row == home_row && pos.col == KING_HOME_COL,
        PieceKind::Rook => pos.row == home_row && (pos.col == 0 || pos.col == BOARD_SIZE - 1),
        PieceKind::Pawn => pos.row == piece.color.pawn_start_row(),
        _ => true,
    }
}
