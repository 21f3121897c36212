//! Piece identity.
//!
//! Movement and attack generation live in [`crate::rules::PieceRules`], not
//! on `Piece` itself — `Piece` is pure data, matching the "no deep
//! inheritance" guidance: a piece is a `(kind, color, square, rook_type)`
//! header, and behavior is dispatched through the capability trait.

use crate::color::Color;
use crate::geometry::Square;

/// The six classical piece kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// All promotion targets, in the order candidates are generated by
/// [`crate::pgn::lan_to_pgn`] and search-style callers that enumerate every
/// promotion.
pub const PROMOTION_TARGETS: [PieceKind; 4] =
    [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen];

impl PieceKind {
    /// The SAN letter for this kind (`""` for pawns, which carry no letter).
    pub fn san_letter(self) -> &'static str {
        match self {
            PieceKind::Pawn => "",
            PieceKind::Knight => "N",
            PieceKind::Bishop => "B",
            PieceKind::Rook => "R",
            PieceKind::Queen => "Q",
            PieceKind::King => "K",
        }
    }

    /// The FEN letter for this kind, uppercase; caller lowercases for black.
    pub fn fen_letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_letter(c: char) -> Option<PieceKind> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// Which castling side (if any) a rook currently services.
///
/// A rook that has moved away from its home square, or that was produced by
/// promotion, is `Plain` and never participates in castling bookkeeping
/// again even if it returns to a corner square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RookType {
    CastleShort,
    CastleLong,
    Plain,
}

/// A piece instance sitting on a particular square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub sq: Square,
    /// `Some` only for `PieceKind::Rook`.
    pub rook_type: Option<RookType>,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color, sq: Square) -> Self {
        Piece { kind, color, sq, rook_type: None }
    }

    pub fn new_rook(color: Color, sq: Square, rook_type: RookType) -> Self {
        Piece { kind: PieceKind::Rook, color, sq, rook_type: Some(rook_type) }
    }

    /// Returns a copy of this piece relocated to `sq`, preserving `rook_type`.
    pub fn moved_to(self, sq: Square) -> Piece {
        Piece { sq, ..self }
    }
}
