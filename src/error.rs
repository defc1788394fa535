//! Error types for board construction, move execution, and the command front-end.

use thiserror::Error;

use crate::constants::{MAX_SIZE, MIN_SIZE};

/// Reasons a stone cannot be placed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// Point is not empty
    #[error("illegal move: point {0} is occupied")]
    Occupied(usize),
    /// Point is padding or lies outside the cell array
    #[error("illegal move: point {0} is not on the board")]
    OffBoard(usize),
}

/// Errors raised when building a board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("board size {0} out of range ({MIN_SIZE}..={MAX_SIZE})")]
    InvalidSize(usize),
}

/// Errors reported back to a GTP client as `? message`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GtpError {
    #[error("missing argument")]
    MissingArgument,
    #[error("invalid color {0}")]
    InvalidColor(String),
    #[error("invalid point {0}")]
    InvalidPoint(String),
    #[error("invalid size {0}")]
    InvalidSize(String),
    #[error("invalid number {0}")]
    InvalidNumber(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Board(#[from] BoardError),
}
