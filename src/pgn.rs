//! Long algebraic notation support and movetext rendering.
//!
//! [`Board::play_lan`] is the LAN entry point: it asks [`Board::lan_to_pgn`]
//! for progressively more disambiguated SAN candidates and plays the first
//! one that validates, exactly as a human would try the least-qualified
//! form first (SPEC_FULL.md §4.7).

use crate::board::Board;
use crate::color::Color;
use crate::piece::PieceKind;
use crate::rules::CastlingSide;

impl Board {
    /// Plays a LAN move (`e2e4`, `e7e8q`) for `color`.
    pub fn play_lan(&mut self, color: Color, lan: &str) -> bool {
        if color != self.turn {
            return false;
        }
        let candidates = self.lan_to_pgn(color, lan);
        for pgn in candidates {
            if self.play(color, &pgn) {
                self.after_play_lan();
                return true;
            }
        }
        false
    }

    fn after_play_lan(&mut self) {
        let mate = self.is_mate();
        let check = self.is_check();
        if let Some(last) = self.history.last_mut() {
            if mate {
                last.pgn.push('#');
            } else if check {
                last.pgn.push('+');
            }
        }
    }

    /// Candidate SAN strings for the move a LAN string describes, tried in
    /// order by [`Board::play_lan`] until one validates.
    pub fn lan_to_pgn(&self, color: Color, lan: &str) -> Vec<String> {
        let Some((from, to, promo)) = self.notation.explode_sqs(lan) else {
            return Vec::new();
        };
        let Some(piece) = self.piece_by_sq(from) else {
            return Vec::new();
        };
        if piece.color != color {
            return Vec::new();
        }

        let is_capture = self.piece_by_sq(to).is_some()
            || (piece.kind == PieceKind::Pawn && self.en_passant() == Some(to));

        match piece.kind {
            PieceKind::King => {
                for side in [CastlingSide::Short, CastlingSide::Long] {
                    let squares = self.castling_rule.squares(color, side);
                    if to == squares.king_to && self.can_castle(color, side) {
                        return vec![match side {
                            CastlingSide::Short => "O-O".to_string(),
                            CastlingSide::Long => "O-O-O".to_string(),
                        }];
                    }
                }
                vec![format!(
                    "K{}{}",
                    if is_capture { "x" } else { "" },
                    to.to_algebraic()
                )]
            }
            PieceKind::Pawn => {
                let promo_suffix = promo.map(|k| format!("={}", k.san_letter())).unwrap_or_default();
                let candidate = if is_capture {
                    let file = (b'a' + from.file) as char;
                    format!("{file}x{}{promo_suffix}", to.to_algebraic())
                } else {
                    format!("{}{promo_suffix}", to.to_algebraic())
                };
                vec![candidate]
            }
            kind => {
                let letter = kind.san_letter();
                let capture = if is_capture { "x" } else { "" };
                let dest = to.to_algebraic();
                let file = (b'a' + from.file) as char;
                let rank = from.rank + 1;
                vec![
                    format!("{letter}{capture}{dest}"),
                    format!("{letter}{file}{capture}{dest}"),
                    format!("{letter}{rank}{capture}{dest}"),
                    format!("{letter}{file}{rank}{capture}{dest}"),
                ]
            }
        }
    }

    /// Standard SAN movetext built from `history`, numbered from 1 and
    /// prefixed with `1...` when the game starts with Black to move.
    pub fn movetext(&self) -> String {
        let mut out = String::new();
        let mut number = 1u32;
        let mut i = 0;

        if self.start_turn == Color::Black {
            if let Some(first) = self.history.first() {
                out.push_str(&format!("{number}{} {}", self.notation.ellipsis(), first.pgn));
                i = 1;
                number += 1;
            }
        }

        while i < self.history.len() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&format!("{number}. {}", self.history[i].pgn));
            i += 1;
            if i < self.history.len() {
                out.push(' ');
                out.push_str(&self.history[i].pgn);
                i += 1;
            }
            number += 1;
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn play_lan_applies_pawn_push() {
        let mut board = Board::new();
        assert!(board.play_lan(Color::White, "e2e4"));
        assert_eq!(board.history()[0].pgn, "e4");
    }

    #[test]
    fn play_lan_resolves_castling() {
        let mut board = Board::new();
        for (color, mv) in [
            (Color::White, "e2e4"),
            (Color::Black, "e7e5"),
            (Color::White, "g1f3"),
            (Color::Black, "b8c6"),
            (Color::White, "f1c4"),
            (Color::Black, "f8c5"),
            (Color::White, "e1g1"),
        ] {
            assert!(board.play_lan(color, mv), "lan move {mv} should succeed");
        }
        assert_eq!(board.history().last().unwrap().pgn, "O-O");
    }

    #[test]
    fn play_lan_suffixes_mate_marker() {
        let mut board = Board::new();
        for (color, mv) in [
            (Color::White, "f2f3"),
            (Color::Black, "e7e5"),
            (Color::White, "g2g4"),
            (Color::Black, "d8h4"),
        ] {
            assert!(board.play_lan(color, mv));
        }
        assert!(board.history().last().unwrap().pgn.ends_with('#'));
    }

    #[test]
    fn movetext_numbers_moves_from_one() {
        let mut board = Board::new();
        board.play(Color::White, "e4");
        board.play(Color::Black, "e5");
        assert_eq!(board.movetext(), "1. e4 e5");
    }
}
