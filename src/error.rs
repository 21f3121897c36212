//! Construction-time errors.
//!
//! In-game move rejection never raises an error (see [`crate::board::Board::play`]);
//! this module only covers malformed input encountered while building a
//! [`crate::board::Board`] from a FEN string.

use thiserror::Error;

/// Reasons a FEN string failed to parse into a [`crate::board::Board`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("expected at least 4 space-separated FEN fields, found {0}")]
    WrongFieldCount(usize),

    #[error("piece placement field has {0} ranks, expected {1}")]
    WrongRankCount(usize, u8),

    #[error("invalid piece placement character '{0}'")]
    InvalidPlacementChar(char),

    #[error("rank '{0}' does not sum to {1} files")]
    RankDoesNotFillBoard(String, u8),

    #[error("invalid active color field '{0}', expected 'w' or 'b'")]
    InvalidColor(String),

    #[error("invalid castling ability field '{0}'")]
    InvalidCastling(String),

    #[error("invalid en passant target '{0}'")]
    InvalidEnPassant(String),

    #[error("missing white king")]
    MissingWhiteKing,

    #[error("missing black king")]
    MissingBlackKing,

    #[error("more than one king for {0:?}")]
    MultipleKings(crate::color::Color),
}
