//! Terminal-condition and draw predicates (SPEC_FULL.md §4.6).

use std::collections::HashMap;

use crate::board::Board;
use crate::piece::PieceKind;

impl Board {
    /// Whether the side to move's king is currently attacked.
    pub fn is_check(&self) -> bool {
        self.is_king_attacked(self.turn)
    }

    fn has_any_legal_move(&self) -> bool {
        self.pieces.values().any(|p| p.color == self.turn && !self.legal(p.sq).is_empty())
    }

    /// In check with no legal response, enumerated exhaustively via
    /// [`Board::legal`] rather than special-casing single/double-attacker
    /// lines of attack — see SPEC_FULL.md §9.
    pub fn is_mate(&self) -> bool {
        self.is_check() && !self.has_any_legal_move()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && !self.has_any_legal_move()
    }

    /// Any board+turn+castling+ep prefix (the canonical `to_fen()` text
    /// stamped per history entry) recurring five or more times.
    pub fn is_fivefold_repetition(&self) -> bool {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for entry in &self.history {
            *counts.entry(entry.fen.as_str()).or_insert(0) += 1;
        }
        counts.values().any(|&c| c >= 5)
    }

    /// `history.len() >= 100` half-moves, used verbatim. This intentionally
    /// does not reset on captures or pawn moves — see SPEC_FULL.md §9.
    pub fn is_fifty_move_draw(&self) -> bool {
        self.history.len() >= 100
    }

    /// K v K; K+minor v K; or opposite-colored bishops on same-shade squares.
    pub fn is_dead_position_draw(&self) -> bool {
        let pieces: Vec<_> = self.pieces.values().collect();
        match pieces.len() {
            2 => true,
            3 => pieces.iter().any(|p| matches!(p.kind, PieceKind::Knight | PieceKind::Bishop)),
            4 => {
                let bishops: Vec<_> = pieces.iter().filter(|p| p.kind == PieceKind::Bishop).collect();
                if bishops.len() != 2 {
                    return false;
                }
                let opposite_colors = bishops[0].color != bishops[1].color;
                let same_square_shade =
                    self.geometry.square_color(bishops[0].sq) == self.geometry.square_color(bishops[1].sq);
                opposite_colors && same_square_shade
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use pretty_assertions::assert_eq;

    #[test]
    fn fools_mate_ends_in_checkmate() {
        let mut board = Board::new();
        for (color, mv) in [
            (Color::White, "f3"),
            (Color::Black, "e5"),
            (Color::White, "g4"),
            (Color::Black, "Qh4"),
        ] {
            assert!(board.play(color, mv), "move {mv} should succeed");
        }
        assert!(board.is_mate());
        assert!(board.movetext().ends_with("Qh4#"));
        assert_eq!(board.castling_ability(), "KQkq");
    }

    #[test]
    fn scholars_mate_ends_in_checkmate() {
        let mut board = Board::new();
        for (color, mv) in [
            (Color::White, "e4"),
            (Color::Black, "e5"),
            (Color::White, "Bc4"),
            (Color::Black, "Nc6"),
            (Color::White, "Qh5"),
            (Color::Black, "Nf6"),
            (Color::White, "Qxf7#"),
        ] {
            assert!(board.play(color, mv), "move {mv} should succeed");
        }
        assert!(board.is_mate());
    }

    #[test]
    fn en_passant_capture_removes_jumped_pawn() {
        let mut board = Board::new();
        for (color, mv) in [(Color::White, "e4"), (Color::Black, "Nf6"), (Color::White, "e5"), (Color::Black, "d5")] {
            assert!(board.play(color, mv));
        }
        assert!(board.play_lan(Color::White, "e5d6"));
        assert!(board.piece_by_sq(crate::geometry::Square::from_algebraic("d5").unwrap()).is_none());
        assert_eq!(board.en_passant(), None);
    }

    #[test]
    fn promotion_to_knight_attaches_new_piece() {
        let mut board = Board::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();
        assert!(board.play(Color::White, "a8=N"));
        let sq = crate::geometry::Square::from_algebraic("a8").unwrap();
        assert_eq!(board.piece_by_sq(sq).unwrap().kind, PieceKind::Knight);
    }

    #[test]
    fn stalemate_is_detected_without_check() {
        let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(board.is_stalemate());
        assert!(!board.is_check());
        assert!(!board.is_mate());
    }

    #[test]
    fn bare_kings_are_a_dead_position() {
        let board = Board::from_fen("8/8/8/4k3/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(board.is_dead_position_draw());
    }

    #[test]
    fn legal_moves_are_a_subset_of_pseudo_legal_moves() {
        use crate::rules::{CastlingRule, CastlingSide};

        let board = Board::new();
        let pos = board.position_view();
        for piece in board.pieces(Some(Color::White)) {
            let pseudo = board.piece_rules().move_squares(&piece, &pos);
            let castling_targets: Vec<_> = if piece.kind == PieceKind::King {
                [CastlingSide::Short, CastlingSide::Long]
                    .into_iter()
                    .map(|side| board.castling_rule().squares(piece.color, side).king_to)
                    .collect()
            } else {
                Vec::new()
            };
            for sq in board.legal(piece.sq) {
                assert!(pseudo.contains(&sq) || castling_targets.contains(&sq));
            }
        }
    }
}
