//! Pseudo-legal move generation, one generator per piece kind.
//!
//! Nothing here looks at whether a move leaves the mover's own king attacked;
//! that filtering belongs to [`Board::get_valid_moves`].

use crate::board::Board;
use crate::config::CastlingRule;
use crate::rays::{Direction, JumpTable, KING_STEPS, KNIGHT_JUMPS, RAYS};
use crate::types::{Piece, PieceKind, Position};

/// Column the king starts on
pub const KING_HOME_COL: i8 = 4;

/// Outcome of looking at one candidate target square
enum PotentialMove {
    Empty,
    Capture,
    Blocked,
}

impl PotentialMove {
    fn is_landing(&self) -> bool {
        !matches!(self, PotentialMove::Blocked)
    }

    fn continue_search_in_direction(&self) -> bool {
        matches!(self, PotentialMove::Empty)
    }
}

fn check_move_target(board: &Board, piece: &Piece, target: Position) -> PotentialMove {
    match board.get_piece(target) {
        Some(other) if other.color == piece.color => PotentialMove::Blocked,
        Some(_) => PotentialMove::Capture,
        None => PotentialMove::Empty,
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub fn rook_col(&self) -> i8 {
        match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        }
    }

    /// Column the king lands on
    pub fn king_target_col(&self) -> i8 {
        match self {
            CastleSide::Kingside => 6,
            CastleSide::Queenside => 2,
        }
    }

    /// Column the rook lands on, which is also the square the king passes over
    pub fn rook_target_col(&self) -> i8 {
        match self {
            CastleSide::Kingside => 5,
            CastleSide::Queenside => 3,
        }
    }

    /// Which side a two-column king move castles on
    pub fn from_king_move(from: Position, to: Position) -> Option<CastleSide> {
        if from.row != to.row {
            return None;
        }
        match to.col - from.col {
            2 => Some(CastleSide::Kingside),
            -2 => Some(CastleSide::Queenside),
            _ => None,
        }
    }
}

pub fn pseudo_legal_moves(piece: &Piece, board: &Board) -> Vec<Position> {
    if !piece.position.is_valid() {
        return vec![];
    }
    match piece.kind {
        PieceKind::Pawn => pawn_moves(piece, board),
        PieceKind::Rook => sliding_moves(piece, board, &Direction::ORTHOGONAL),
        PieceKind::Bishop => sliding_moves(piece, board, &Direction::DIAGONAL),
        PieceKind::Queen => sliding_moves(piece, board, &Direction::ALL),
        PieceKind::Knight => jump_moves(piece, board, &KNIGHT_JUMPS),
        PieceKind::King => jump_moves(piece, board, &KING_STEPS),
    }
}

/// Squares `piece` attacks. Differs from the pseudo-legal moves only for
/// pawns, which attack both forward diagonals whatever stands there and never
/// attack the squares they push to.
pub fn observed_squares(piece: &Piece, board: &Board) -> Vec<Position> {
    match piece.kind {
        PieceKind::Pawn => pawn_observed_squares(piece),
        _ => pseudo_legal_moves(piece, board),
    }
}

/// King moves including castling. Kept apart from [`pseudo_legal_moves`] so
/// that check detection never recurses into castling eligibility.
pub fn moves_with_castling(king: &Piece, board: &Board) -> Vec<Position> {
    let mut moves = pseudo_legal_moves(king, board);
    if king.kind != PieceKind::King {
        return moves;
    }
    for side in [CastleSide::Kingside, CastleSide::Queenside] {
        if can_castle(king, board, side) {
            moves.push(Position {
                row: king.position.row,
                col: side.king_target_col(),
            });
        }
    }
    moves
}

fn can_castle(king: &Piece, board: &Board, side: CastleSide) -> bool {
    let row = king.color.home_row();
    if king.has_moved || king.position != (Position { row, col: KING_HOME_COL }) {
        return false;
    }

    let rook_position = Position {
        row,
        col: side.rook_col(),
    };
    let rook_ready = board.get_piece(rook_position).is_some_and(|rook| {
        rook.kind == PieceKind::Rook && rook.color == king.color && !rook.has_moved
    });
    if !rook_ready {
        return false;
    }

    let (low, high) = if side.rook_col() < KING_HOME_COL {
        (side.rook_col() + 1, KING_HOME_COL)
    } else {
        (KING_HOME_COL + 1, side.rook_col())
    };
    if !(low..high).all(|col| board.is_empty(Position { row, col })) {
        return false;
    }

    match board.castling_rule() {
        CastlingRule::Permissive => true,
        CastlingRule::Standard => {
            // the landing square is left to the general legality filter
            let passing = Position {
                row,
                col: side.rook_target_col(),
            };
            let enemy = king.color.other_color();
            !board.is_in_check(king.color) && !board.is_square_observed(passing, enemy)
        }
    }
}

fn pawn_moves(piece: &Piece, board: &Board) -> Vec<Position> {
    let mut moves = vec![];
    let direction = piece.color.pawn_direction();

    if let Some(one_step) = piece.position.offset(direction, 0) {
        if board.is_empty(one_step) {
            moves.push(one_step);
            if piece.position.row == piece.color.pawn_start_row() {
                if let Some(two_steps) = piece.position.offset(2 * direction, 0) {
                    if board.is_empty(two_steps) {
                        moves.push(two_steps);
                    }
                }
            }
        }
    }

    for target in pawn_observed_squares(piece) {
        if board.is_enemy(target, piece.color) || is_en_passant_capture(piece, board, target) {
            moves.push(target);
        }
    }
    moves
}

fn pawn_observed_squares(piece: &Piece) -> Vec<Position> {
    let direction = piece.color.pawn_direction();
    [-1, 1]
        .into_iter()
        .filter_map(|col_delta| piece.position.offset(direction, col_delta))
        .collect()
}

/// `target` is the en passant square and an enemy pawn sits right behind it
fn is_en_passant_capture(piece: &Piece, board: &Board, target: Position) -> bool {
    if board.en_passant_target() != Some(target) {
        return false;
    }
    let victim = Position {
        row: target.row - piece.color.pawn_direction(),
        col: target.col,
    };
    board
        .get_piece(victim)
        .is_some_and(|p| p.kind == PieceKind::Pawn && p.color != piece.color)
}

fn sliding_moves(piece: &Piece, board: &Board, directions: &[Direction]) -> Vec<Position> {
    let mut moves = vec![];
    for direction in directions {
        for &target in RAYS.ray(piece.position, *direction) {
            let potential = check_move_target(board, piece, target);
            if potential.is_landing() {
                moves.push(target);
            }
            if !potential.continue_search_in_direction() {
                break;
            }
        }
    }
    moves
}

fn jump_moves(piece: &Piece, board: &Board, table: &JumpTable) -> Vec<Position> {
    table
        .targets(piece.position)
        .iter()
        .copied()
        .filter(|&target| check_move_target(board, piece, target).is_landing())
        .collect()
}
