//! FEN parsing and serialization.
//!
//! [`parse_fen`] is the shared entry point used by [`crate::board::Board::from_fen`]
//! and [`crate::board::Board::with_rules`]; [`Board::to_fen`]/[`Board::to_fen_with_counters`]
//! are the inverse.

use std::collections::HashMap;
use std::fmt;

use crate::board::Board;
use crate::color::Color;
use crate::error::FenError;
use crate::geometry::Square;
use crate::piece::{Piece, PieceKind, RookType};
use crate::rules::SquareGeometry;

/// The fields extracted from a FEN string, before they are folded into a
/// [`Board`].
pub(crate) struct ParsedFen {
    pub pieces: HashMap<Square, Piece>,
    pub turn: Color,
    pub castling_ability: String,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

pub(crate) fn parse_fen(fen: &str, geometry: &dyn SquareGeometry) -> Result<ParsedFen, FenError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(FenError::WrongFieldCount(fields.len()));
    }

    let pieces = parse_placement(fields[0], geometry)?;
    let turn = Color::from_char(fields[1].chars().next().unwrap_or('?'))
        .ok_or_else(|| FenError::InvalidColor(fields[1].to_string()))?;
    let castling_ability = parse_castling(fields[2])?;
    let en_passant = parse_en_passant(fields[3])?;
    let halfmove_clock = fields.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
    let fullmove_number = fields.get(5).and_then(|s| s.parse().ok()).unwrap_or(1);

    let white_kings = pieces.values().filter(|p| p.color == Color::White && p.kind == PieceKind::King).count();
    let black_kings = pieces.values().filter(|p| p.color == Color::Black && p.kind == PieceKind::King).count();
    if white_kings == 0 {
        return Err(FenError::MissingWhiteKing);
    }
    if black_kings == 0 {
        return Err(FenError::MissingBlackKing);
    }
    if white_kings > 1 {
        return Err(FenError::MultipleKings(Color::White));
    }
    if black_kings > 1 {
        return Err(FenError::MultipleKings(Color::Black));
    }

    Ok(ParsedFen { pieces, turn, castling_ability, en_passant, halfmove_clock, fullmove_number })
}

fn parse_placement(field: &str, geometry: &dyn SquareGeometry) -> Result<HashMap<Square, Piece>, FenError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != geometry.ranks() as usize {
        return Err(FenError::WrongRankCount(ranks.len(), geometry.ranks()));
    }

    let mut pieces = HashMap::new();
    for (row, rank_str) in ranks.iter().enumerate() {
        let rank = geometry.ranks() - 1 - row as u8;
        let mut file: u8 = 0;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as u8;
                continue;
            }
            if file >= geometry.files() {
                return Err(FenError::RankDoesNotFillBoard(rank_str.to_string(), geometry.files()));
            }
            let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
            let kind = PieceKind::from_letter(c).ok_or(FenError::InvalidPlacementChar(c))?;
            let sq = Square::new(file, rank);
            let piece = if kind == PieceKind::Rook {
                Piece::new_rook(color, sq, infer_rook_type(sq, color, geometry))
            } else {
                Piece::new(kind, color, sq)
            };
            pieces.insert(sq, piece);
            file += 1;
        }
        if file != geometry.files() {
            return Err(FenError::RankDoesNotFillBoard(rank_str.to_string(), geometry.files()));
        }
    }
    Ok(pieces)
}

/// A rook on its home corner starts out servicing that side's castle; any
/// other rook (including one placed there by a non-standard FEN after the
/// back rank has otherwise changed) is treated as plain. Castling-ability
/// characters in the FEN are the final authority on whether the right is
/// still live; this only seeds `rook_type` for bookkeeping.
fn infer_rook_type(sq: Square, color: Color, geometry: &dyn SquareGeometry) -> RookType {
    let back_rank = match color {
        Color::White => 0,
        Color::Black => geometry.ranks() - 1,
    };
    if sq.rank != back_rank {
        return RookType::Plain;
    }
    if sq.file == 0 {
        RookType::CastleLong
    } else if sq.file == geometry.files() - 1 {
        RookType::CastleShort
    } else {
        RookType::Plain
    }
}

fn parse_castling(field: &str) -> Result<String, FenError> {
    if field == "-" {
        return Ok("-".to_string());
    }
    if field.is_empty() || !field.chars().all(|c| "KQkq".contains(c)) {
        return Err(FenError::InvalidCastling(field.to_string()));
    }
    Ok(field.to_string())
}

fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    Square::from_algebraic(field).map(Some).ok_or_else(|| FenError::InvalidEnPassant(field.to_string()))
}

impl Board {
    /// The four-field canonical FEN: `<placement> <turn> <castling> <ep>`.
    /// This is the form compared against in history round-trip checks.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {}",
            self.placement_field(),
            self.turn.as_char(),
            self.castling_ability,
            self.en_passant().map(|sq| sq.to_algebraic()).unwrap_or_else(|| "-".to_string()),
        )
    }

    /// The six-field FEN including the halfmove clock and fullmove number.
    pub fn to_fen_with_counters(&self) -> String {
        format!("{} {} {}", self.to_fen(), self.halfmove_clock, self.fullmove_number)
    }

    fn placement_field(&self) -> String {
        let ranks = self.geometry.ranks();
        let files = self.geometry.files();
        let mut rows = Vec::with_capacity(ranks as usize);
        for rank in (0..ranks).rev() {
            let mut row = String::new();
            let mut empty_run = 0u8;
            for file in 0..files {
                match self.pieces.get(&Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_run > 0 {
                            row.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        let letter = piece.kind.fen_letter();
                        row.push(if piece.color == Color::White { letter } else { letter.to_ascii_lowercase() });
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                row.push_str(&empty_run.to_string());
            }
            rows.push(row);
        }
        rows.join("/")
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen_with_counters())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_start_fen_round_trips() {
        let board = Board::new();
        assert_eq!(board.to_fen_with_counters(), crate::board::STANDARD_START_FEN);
    }

    #[test]
    fn rejects_too_few_fields() {
        let err = Board::from_fen("8/8/8/8/8/8/8/8").unwrap_err();
        assert_eq!(err, FenError::WrongFieldCount(1));
    }

    #[test]
    fn rejects_missing_king() {
        let err = Board::from_fen("8/8/8/8/8/8/8/7k w - - 0 1").unwrap_err();
        assert_eq!(err, FenError::MissingWhiteKing);
    }

    #[test]
    fn rejects_bad_castling_field() {
        let err = Board::from_fen("8/8/8/8/8/8/8/K6k w XYZ - 0 1").unwrap_err();
        assert_eq!(err, FenError::InvalidCastling("XYZ".to_string()));
    }

    #[test]
    fn custom_fen_round_trips_through_to_fen() {
        let fen = "8/P7/8/8/8/8/8/k6K w - - 0 1";
        let board = Board::from_fen(fen).unwrap();
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn to_array_matches_placement() {
        let board = Board::new();
        let array = board.to_array();
        assert_eq!(array.len(), 8);
        assert_eq!(array[0][0].unwrap().kind, PieceKind::Rook);
        assert_eq!(array[7][4].unwrap().kind, PieceKind::King);
    }
}
