//! Error type shared by the recoverable parts of the crate.
//!
//! Parsing, configuration and opening-book loading report failures through
//! `ChessError`. Contract violations inside search (depth outside the
//! engine's range, searching a position with no legal moves) are bugs in the
//! caller and panic instead.

use thiserror::Error;

pub type ChessResult<T> = Result<T, ChessError>;

#[derive(Debug, Error)]
pub enum ChessError {
    /// A FEN-style field set could not be interpreted.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// A square name outside `a1..=h8`.
    #[error("invalid square '{0}'")]
    InvalidSquare(String),

    /// A recognised engine option was given a value it cannot take.
    #[error("invalid value '{value}' for option '{name}'")]
    InvalidOption { name: String, value: String },

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    /// The opening book resource could not be opened or read.
    #[error("opening book I/O failure: {0}")]
    BookIo(#[from] std::io::Error),

    /// The opening book stream ended in the middle of a record.
    #[error("opening book truncated after {records} records")]
    TruncatedBook { records: usize },

    /// An opening book record announced an impossible candidate count.
    #[error("opening book record {records} has {count} candidates (expected 1..=5)")]
    CorruptBook { records: usize, count: u8 },

    /// Move text that names no legal move of the position it was read against.
    #[error("'{0}' is not a legal move in this position")]
    NotLegal(String),

    /// A game loop was handed a move the position does not allow.
    #[error("{engine} played illegal move {mv}")]
    IllegalMove { engine: String, mv: String },
}
