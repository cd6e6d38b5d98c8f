use std::fmt;
use std::str::FromStr;

use crate::error::{ChessError, ChessResult};

pub const BOARD_SIZE: i8 = 8;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn from_case(c: char) -> Color {
        if c.is_uppercase() {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn other_color(&self) -> Color {
        if *self == Color::White {
            Color::Black
        } else {
            Color::White
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }

    /// Row the pieces of this color start on
    pub fn home_row(&self) -> i8 {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    /// Row delta of a single pawn step
    pub fn pawn_direction(&self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    pub fn pawn_start_row(&self) -> i8 {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_human())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'r' => Some(PieceKind::Rook),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Lowercase English name, as used in move messages
    pub fn to_human(&self) -> &str {
        match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

/// A square on the board. Row 0 is rank 8, col 0 is file a.
///
/// Positions can be built out of range (move generators step off the edge);
/// `is_valid` tells whether it is on the board.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub fn new(row: i32, col: i32) -> ChessResult<Position> {
        if (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col) {
            Ok(Position {
                row: row as i8,
                col: col as i8,
            })
        } else {
            Err(ChessError::InvalidPosition { row, col })
        }
    }

    pub fn is_valid(&self) -> bool {
        (0..BOARD_SIZE).contains(&self.row) && (0..BOARD_SIZE).contains(&self.col)
    }

    /// The square `(row_delta, col_delta)` away, if it is still on the board
    pub fn offset(&self, row_delta: i8, col_delta: i8) -> Option<Position> {
        let pos = Position {
            row: self.row + row_delta,
            col: self.col + col_delta,
        };
        pos.is_valid().then_some(pos)
    }

    pub fn from_algebraic(s: &str) -> ChessResult<Position> {
        let token = s.trim();
        let invalid = || ChessError::InvalidAlgebraic(s.to_string());
        let mut chars = token.chars();
        let (file_char, rank_char) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file.to_ascii_lowercase(), rank),
            _ => return Err(invalid()),
        };
        if !('a'..='h').contains(&file_char) || !('1'..='8').contains(&rank_char) {
            return Err(invalid());
        }
        let col = file_char as i8 - 'a' as i8;
        let rank = rank_char as i8 - '0' as i8;
        Ok(Position {
            row: BOARD_SIZE - rank,
            col,
        })
    }

    pub fn to_algebraic(&self) -> String {
        format!("{}{}", self.file_char(), BOARD_SIZE - self.row)
    }

    pub fn file_char(&self) -> char {
        (b'a' + self.col as u8) as char
    }
}

impl FromStr for Position {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_algebraic(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.to_algebraic())
        } else {
            write!(f, "({}, {})", self.row, self.col)
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
    pub position: Position,
    pub has_moved: bool,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind, position: Position) -> Piece {
        Piece {
            color,
            kind,
            position,
            has_moved: false,
        }
    }

    /// Parse a diagram char (uppercase White, lowercase Black)
    pub fn from_char(c: char, position: Position) -> Option<Piece> {
        PieceKind::from_char(c).map(|kind| Piece::new(Color::from_case(c), kind, position))
    }

    pub fn to_char(&self) -> char {
        let c = self.kind.to_char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn to_symbol(&self) -> &str {
        let is_white = self.color == Color::White;
        match (self.kind, is_white) {
            (PieceKind::Pawn, true) => "♙",
            (PieceKind::Pawn, false) => "♟",
            (PieceKind::Rook, true) => "♖",
            (PieceKind::Rook, false) => "♜",
            (PieceKind::Knight, true) => "♘",
            (PieceKind::Knight, false) => "♞",
            (PieceKind::Bishop, true) => "♗",
            (PieceKind::Bishop, false) => "♝",
            (PieceKind::Queen, true) => "♕",
            (PieceKind::Queen, false) => "♛",
            (PieceKind::King, true) => "♔",
            (PieceKind::King, false) => "♚",
        }
    }

    pub fn move_to(&mut self, position: Position) {
        self.position = position;
        self.has_moved = true;
    }
}

/// What a client needs to draw a square
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SquareView {
    pub color: Color,
    pub kind: PieceKind,
}

impl From<&Piece> for SquareView {
    fn from(piece: &Piece) -> Self {
        SquareView {
            color: piece.color,
            kind: piece.kind,
        }
    }
}

/// Rook half of a castling move
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct CastlingRook {
    /// The rook as it stood before castling
    pub rook: Piece,
    pub to: Position,
}

/// Information needed to undo a move.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MoveRecord {
    pub from: Position,
    pub to: Position,
    /// The moved piece as it was before the move
    pub piece: Piece,
    /// Captured piece, carrying its own square (differs from `to` for en passant)
    pub captured: Option<Piece>,
    /// En passant target before the move
    pub en_passant_target: Option<Position>,
    pub castling_rook: Option<CastlingRook>,
    pub promoted: bool,
}

impl MoveRecord {
    pub fn is_castle(&self) -> bool {
        self.castling_rook.is_some()
    }

    pub fn is_en_passant(&self) -> bool {
        self.captured.is_some_and(|p| p.position != self.to)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum GameState {
    Playing,
    Check,
    Checkmate,
    Stalemate,
    Draw,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        matches!(
            self,
            GameState::Checkmate | GameState::Stalemate | GameState::Draw
        )
    }
}
