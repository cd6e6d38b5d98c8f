use thiserror::Error;

use crate::types::Position;

/// Everything that can go wrong when talking to the rules engine.
///
/// None of these are fatal: a rejected command leaves the board untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    #[error("position ({row}, {col}) is off the board")]
    InvalidPosition { row: i32, col: i32 },
    #[error("invalid square {0:?}, expected a file a-h followed by a rank 1-8")]
    InvalidAlgebraic(String),
    #[error("no piece at {0}")]
    NoPieceAtSource(Position),
    #[error("the piece at {0} belongs to the other player")]
    WrongPlayerPiece(Position),
    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: Position, to: Position },
    #[error("no moves to undo")]
    NoHistoryToUndo,
    #[error("invalid board diagram: {0}")]
    InvalidDiagram(String),
}

pub type ChessResult<T> = Result<T, ChessError>;
