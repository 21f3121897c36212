//! Captured-material bookkeeping.

use crate::geometry::Square;
use crate::piece::{PieceKind, RookType};

/// A plain-data snapshot of a piece at the moment it was captured or did
/// the capturing. Never a live board participant — see §5 resource policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturedPieceInfo {
    pub kind: PieceKind,
    pub sq: Square,
    pub rook_type: Option<RookType>,
}

/// One capture: the piece that did the capturing and the piece it removed
/// from the board (the latter may be on a different square than the
/// capturing piece's destination, for en passant).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRecord {
    pub capturing: CapturedPieceInfo,
    pub captured: CapturedPieceInfo,
}
