//! One history entry per successfully played half-move.

use crate::geometry::Square;

/// A snapshot taken immediately after a half-move was applied.
///
/// `fen` is stamped during [`crate::board::Board`]'s refresh step, after the
/// move that produced this entry has fully landed; it is therefore the
/// position *after* `pgn` was played, not before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Castling ability immediately after this move was applied.
    pub castling_ability: String,
    /// The square the moved piece started from.
    pub from_sq: Square,
    /// The square the moved piece ended on (the castling king's target for
    /// a castling move).
    pub to_sq: Square,
    /// The SAN text of the move, possibly later suffixed with `+`/`#`.
    pub pgn: String,
    pub fen: String,
    /// The en passant target square this move produced, if any.
    pub ep_after: Option<Square>,
}
