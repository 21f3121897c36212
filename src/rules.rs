//! Capability traits that make the engine variant-parameterised.
//!
//! [`SquareGeometry`] describes board size/coloring, [`PieceRules`]
//! describes per-kind pseudo-legal movement and attack generation, and
//! [`crate::castling::CastlingRule`] / [`crate::notation::MoveNotation`]
//! (defined in their own modules, re-exported here) round out the
//! collaborator interfaces consumed by [`crate::board::Board`]. Each trait
//! has exactly one implementation shipped by this crate — the standard
//! 8x8 ruleset — which is the "reference instance" the rest of the crate is
//! tested against.

use std::collections::HashMap;
use std::fmt;

use crate::color::Color;
use crate::geometry::{Square, Standard8x8};
use crate::piece::{Piece, PieceKind};

pub use crate::castling::{CastlingRule, CastlingSide, CastlingSquares, StandardCastlingRule};
pub use crate::notation::{MoveNotation, StandardNotation};

/// Board size and square coloring, injected into the engine at construction.
pub trait SquareGeometry: fmt::Debug + Send + Sync {
    fn files(&self) -> u8;
    fn ranks(&self) -> u8;
    fn square_color(&self, sq: Square) -> Color;
    fn all_squares(&self) -> Vec<Square>;
}

/// A read-only snapshot of occupancy handed to [`PieceRules`] methods.
///
/// This plays the role the original per-piece "board back-reference" played
/// in the object-oriented source, without requiring [`PieceRules`] to depend
/// on [`crate::board::Board`] itself (which in turn depends on `PieceRules`).
pub struct Position<'a> {
    pub pieces: &'a HashMap<Square, Piece>,
    pub geometry: &'a dyn SquareGeometry,
    pub en_passant: Option<Square>,
}

impl<'a> Position<'a> {
    pub fn piece_at(&self, sq: Square) -> Option<&Piece> {
        self.pieces.get(&sq)
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.pieces.get(&sq).is_none()
    }
}

/// Per-kind pseudo-legal move and attack generation.
///
/// Implementations must not consider king safety: pins and checks are
/// filtered by [`crate::board::Board`] on top of whatever this trait
/// returns (see [`crate::board::Board::legal`]).
pub trait PieceRules: fmt::Debug + Send + Sync {
    /// Pseudo-legal destination squares for `piece` (includes captures and,
    /// for pawns, a legal en passant destination; excludes castling, which
    /// [`CastlingRule`] governs separately).
    fn move_squares(&self, piece: &Piece, pos: &Position) -> Vec<Square>;

    /// Squares `piece` attacks, used for check detection. For pawns this is
    /// the diagonal capture squares regardless of what occupies them; for
    /// other pieces it coincides with [`PieceRules::move_squares`] minus the
    /// en passant destination.
    fn attacks(&self, piece: &Piece, pos: &Position) -> Vec<Square>;

    /// Whether a pawn sitting on `piece.sq` has reached the back rank and
    /// must be promoted.
    fn is_promoted(&self, piece: &Piece, geometry: &dyn SquareGeometry) -> bool;
}

const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];
const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1),
];

fn sliding_moves(piece: &Piece, pos: &Position, dirs: &[(i8, i8)]) -> Vec<Square> {
    let mut out = Vec::new();
    for &(df, dr) in dirs {
        let mut cur = piece.sq;
        loop {
            match cur.offset(df, dr, pos.geometry) {
                None => break,
                Some(next) => {
                    cur = next;
                    match pos.piece_at(cur) {
                        None => out.push(cur),
                        Some(other) if other.color != piece.color => {
                            out.push(cur);
                            break;
                        }
                        Some(_) => break,
                    }
                }
            }
        }
    }
    out
}

fn stepping_moves(piece: &Piece, pos: &Position, offsets: &[(i8, i8)]) -> Vec<Square> {
    offsets
        .iter()
        .filter_map(|&(df, dr)| piece.sq.offset(df, dr, pos.geometry))
        .filter(|&sq| pos.piece_at(sq).map_or(true, |other| other.color != piece.color))
        .collect()
}

fn pawn_direction(color: Color) -> i8 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

fn pawn_home_rank(color: Color, geometry: &dyn SquareGeometry) -> u8 {
    match color {
        Color::White => 1,
        Color::Black => geometry.ranks() - 2,
    }
}

pub(crate) fn pawn_back_rank(color: Color, geometry: &dyn SquareGeometry) -> u8 {
    match color {
        Color::White => geometry.ranks() - 1,
        Color::Black => 0,
    }
}

fn pawn_attack_squares(piece: &Piece, pos: &Position) -> Vec<Square> {
    let dir = pawn_direction(piece.color);
    [(-1, dir), (1, dir)]
        .into_iter()
        .filter_map(|(df, dr)| piece.sq.offset(df, dr, pos.geometry))
        .collect()
}

fn pawn_moves(piece: &Piece, pos: &Position) -> Vec<Square> {
    let mut out = Vec::new();
    let dir = pawn_direction(piece.color);

    if let Some(one) = piece.sq.offset(0, dir, pos.geometry) {
        if pos.is_empty(one) {
            out.push(one);
            if piece.sq.rank == pawn_home_rank(piece.color, pos.geometry) {
                if let Some(two) = piece.sq.offset(0, dir * 2, pos.geometry) {
                    if pos.is_empty(two) {
                        out.push(two);
                    }
                }
            }
        }
    }

    for target in pawn_attack_squares(piece, pos) {
        let is_enemy = pos.piece_at(target).map_or(false, |other| other.color != piece.color);
        let is_en_passant = pos.en_passant == Some(target);
        if is_enemy || is_en_passant {
            out.push(target);
        }
    }

    out
}

/// The standard chess piece-movement ruleset.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPieceRules;

impl PieceRules for StandardPieceRules {
    fn move_squares(&self, piece: &Piece, pos: &Position) -> Vec<Square> {
        match piece.kind {
            PieceKind::Pawn => pawn_moves(piece, pos),
            PieceKind::Knight => stepping_moves(piece, pos, &KNIGHT_OFFSETS),
            PieceKind::King => stepping_moves(piece, pos, &KING_OFFSETS),
            PieceKind::Bishop => sliding_moves(piece, pos, &BISHOP_DIRS),
            PieceKind::Rook => sliding_moves(piece, pos, &ROOK_DIRS),
            PieceKind::Queen => {
                let mut moves = sliding_moves(piece, pos, &BISHOP_DIRS);
                moves.extend(sliding_moves(piece, pos, &ROOK_DIRS));
                moves
            }
        }
    }

    fn attacks(&self, piece: &Piece, pos: &Position) -> Vec<Square> {
        match piece.kind {
            PieceKind::Pawn => pawn_attack_squares(piece, pos),
            _ => self.move_squares(piece, pos),
        }
    }

    fn is_promoted(&self, piece: &Piece, geometry: &dyn SquareGeometry) -> bool {
        piece.kind == PieceKind::Pawn && piece.sq.rank == pawn_back_rank(piece.color, geometry)
    }
}

/// Convenience: the standard 8x8 geometry paired with standard piece rules,
/// used by [`crate::board::Board::new`] and [`crate::board::Board::from_fen`].
pub fn standard_geometry() -> Standard8x8 {
    Standard8x8
}
