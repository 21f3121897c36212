//! PGN half-move (SAN) parsing and the LAN square-exploder.
//!
//! Parsing only produces a [`ParsedMove`] *descriptor*; it does not itself
//! decide which piece on the board the move refers to or whether the move
//! is legal — that disambiguation/legality work happens in
//! [`crate::board::Board`] (see §4.1–4.3 of `SPEC_FULL.md`).

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::color::Color;
use crate::geometry::Square;
use crate::piece::PieceKind;

/// The shape of a parsed half-move, mirroring the move types a notation
/// collaborator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Pawn,
    PawnCaptures,
    PawnPromotes,
    Piece,
    PieceCaptures,
    King,
    KingCaptures,
    CastleShort,
    CastleLong,
}

/// A parsed, not-yet-disambiguated half-move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMove {
    pub color: Color,
    /// `PieceKind::Pawn` for pawn moves; ignored for castling.
    pub kind: PieceKind,
    /// Disambiguation substring: empty, a file letter, a rank digit, or a
    /// full square. Matched by *containment* against a candidate's square,
    /// per §4.1/§9 ("substring disambiguation").
    pub sq_current: String,
    pub sq_next: Square,
    pub is_capture: bool,
    pub move_kind: MoveKind,
    pub new_kind: Option<PieceKind>,
    pub pgn: String,
}

/// Parses PGN half-moves and LAN strings, and maps move kinds to their SAN
/// token fragments.
pub trait MoveNotation: fmt::Debug + Send + Sync {
    fn parse(&self, color: Color, pgn: &str) -> Option<ParsedMove>;

    /// Splits a LAN string (`e2e4`, `e7e8q`) into its from/to squares and
    /// optional promotion letter.
    fn explode_sqs(&self, lan: &str) -> Option<(Square, Square, Option<PieceKind>)>;

    /// The token placed between move number and black's first move in
    /// movetext when a game starts with black to move (`"..."`).
    fn ellipsis(&self) -> &'static str {
        "..."
    }
}

static SAN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<piece>[KQRBN])?(?P<disambig>[a-h]?[1-8]?)(?P<capture>x)?(?P<dest>[a-h][1-8])(?:=(?P<promo>[QRBN]))?[+#]?$").unwrap()
});

/// The standard SAN/PGN notation parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardNotation;

impl StandardNotation {
    fn strip_check_suffix(s: &str) -> &str {
        s.trim_end_matches(['+', '#'])
    }
}

impl MoveNotation for StandardNotation {
    fn parse(&self, color: Color, pgn: &str) -> Option<ParsedMove> {
        let trimmed = pgn.trim();
        let normalized = Self::strip_check_suffix(trimmed);

        if matches!(normalized, "O-O" | "0-0") {
            return Some(ParsedMove {
                color,
                kind: PieceKind::King,
                sq_current: String::new(),
                sq_next: Square::new(0, 0),
                is_capture: false,
                move_kind: MoveKind::CastleShort,
                new_kind: None,
                pgn: trimmed.to_string(),
            });
        }
        if matches!(normalized, "O-O-O" | "0-0-0") {
            return Some(ParsedMove {
                color,
                kind: PieceKind::King,
                sq_current: String::new(),
                sq_next: Square::new(0, 0),
                is_capture: false,
                move_kind: MoveKind::CastleLong,
                new_kind: None,
                pgn: trimmed.to_string(),
            });
        }

        let caps = SAN_RE.captures(trimmed)?;
        let piece_letter = caps.name("piece").map(|m| m.as_str());
        let disambig = caps.name("disambig").map(|m| m.as_str()).unwrap_or("");
        let is_capture = caps.name("capture").is_some();
        let dest = Square::from_algebraic(caps.name("dest")?.as_str())?;
        let promo = caps
            .name("promo")
            .and_then(|m| PieceKind::from_letter(m.as_str().chars().next().unwrap()));

        let kind = match piece_letter {
            Some(letter) => PieceKind::from_letter(letter.chars().next().unwrap())?,
            None => PieceKind::Pawn,
        };

        let move_kind = match (kind, is_capture, promo.is_some()) {
            (PieceKind::Pawn, _, true) => MoveKind::PawnPromotes,
            (PieceKind::Pawn, true, false) => MoveKind::PawnCaptures,
            (PieceKind::Pawn, false, false) => MoveKind::Pawn,
            (PieceKind::King, true, _) => MoveKind::KingCaptures,
            (PieceKind::King, false, _) => MoveKind::King,
            (_, true, _) => MoveKind::PieceCaptures,
            (_, false, _) => MoveKind::Piece,
        };

        Some(ParsedMove {
            color,
            kind,
            sq_current: disambig.to_string(),
            sq_next: dest,
            is_capture,
            move_kind,
            new_kind: promo,
            pgn: trimmed.to_string(),
        })
    }

    fn explode_sqs(&self, lan: &str) -> Option<(Square, Square, Option<PieceKind>)> {
        let chars: Vec<char> = lan.chars().collect();
        if chars.len() < 4 {
            return None;
        }
        let from = Square::from_algebraic(&chars[0..2].iter().collect::<String>())?;
        let to = Square::from_algebraic(&chars[2..4].iter().collect::<String>())?;
        let promo = chars.get(4).and_then(|c| PieceKind::from_letter(*c));
        Some((from, to, promo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_pawn_push() {
        let notation = StandardNotation;
        let mv = notation.parse(Color::White, "e4").unwrap();
        assert_eq!(mv.kind, PieceKind::Pawn);
        assert_eq!(mv.sq_next, Square::from_algebraic("e4").unwrap());
        assert!(!mv.is_capture);
        assert_eq!(mv.move_kind, MoveKind::Pawn);
    }

    #[test]
    fn parses_disambiguated_knight_capture() {
        let notation = StandardNotation;
        let mv = notation.parse(Color::White, "Nbxd2").unwrap();
        assert_eq!(mv.kind, PieceKind::Knight);
        assert_eq!(mv.sq_current, "b");
        assert!(mv.is_capture);
        assert_eq!(mv.move_kind, MoveKind::PieceCaptures);
    }

    #[test]
    fn parses_promotion_with_check_suffix() {
        let notation = StandardNotation;
        let mv = notation.parse(Color::White, "a8=N+").unwrap();
        assert_eq!(mv.new_kind, Some(PieceKind::Knight));
        assert_eq!(mv.move_kind, MoveKind::PawnPromotes);
        assert_eq!(mv.pgn, "a8=N+");
    }

    #[test]
    fn parses_castling() {
        let notation = StandardNotation;
        assert_eq!(notation.parse(Color::White, "O-O").unwrap().move_kind, MoveKind::CastleShort);
        assert_eq!(notation.parse(Color::Black, "O-O-O#").unwrap().move_kind, MoveKind::CastleLong);
    }

    #[test]
    fn explodes_lan_with_promotion() {
        let notation = StandardNotation;
        let (from, to, promo) = notation.explode_sqs("e7e8Q").unwrap();
        assert_eq!(from, Square::from_algebraic("e7").unwrap());
        assert_eq!(to, Square::from_algebraic("e8").unwrap());
        assert_eq!(promo, Some(PieceKind::Queen));
    }
}
