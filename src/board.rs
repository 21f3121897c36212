//! The board aggregate and the move-application pipeline.
//!
//! `Board` owns the position (`pieces`, `turn`, `castling_ability`,
//! history, captures) plus the four capability handles that make the
//! engine variant-parameterised (see [`crate::rules`]). All mutation goes
//! through [`Board::play`]/[`Board::play_lan`] (in [`crate::pgn`]); every
//! other public method is a read-only query.

use std::collections::HashMap;
use std::sync::Arc;

use crate::captures::{CaptureRecord, CapturedPieceInfo};
use crate::color::Color;
use crate::error::FenError;
use crate::geometry::Square;
use crate::history::HistoryEntry;
use crate::notation::MoveKind;
use crate::piece::{Piece, PieceKind, RookType};
use crate::rules::{
    standard_geometry, CastlingRule, CastlingSide, MoveNotation, PieceRules, Position,
    SquareGeometry, StandardCastlingRule, StandardNotation, StandardPieceRules,
};

pub const STANDARD_START_FEN: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A chess position plus the pluggable ruleset it was built with.
///
/// Cloning a `Board` is a plain structural deep copy: the `pieces` map and
/// history/capture vectors are copied, and the capability handles (`Arc`)
/// are cheaply shared. This is behaviorally equivalent to the
/// serialize-to-FEN-and-reconstruct clone described for the original
/// object model, without the detour through text — see `DESIGN.md`.
#[derive(Debug, Clone)]
pub struct Board {
    pub(crate) pieces: HashMap<Square, Piece>,
    pub(crate) turn: Color,
    pub(crate) castling_ability: String,
    pub(crate) start_fen: String,
    pub(crate) start_turn: Color,
    pub(crate) initial_en_passant: Option<Square>,
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) captures: HashMap<Color, Vec<CaptureRecord>>,
    pub(crate) sq_count: HashMap<Color, usize>,
    pub(crate) space_eval: HashMap<Color, usize>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) geometry: Arc<dyn SquareGeometry>,
    pub(crate) piece_rules: Arc<dyn PieceRules>,
    pub(crate) castling_rule: Arc<dyn CastlingRule>,
    pub(crate) notation: Arc<dyn MoveNotation>,
}

impl Board {
    /// The standard 8x8 starting position.
    pub fn new() -> Self {
        Self::from_fen(STANDARD_START_FEN).expect("standard starting FEN must parse")
    }

    /// Builds a board from a FEN string using the standard 8x8 ruleset.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Self::with_rules(
            fen,
            Arc::new(standard_geometry()),
            Arc::new(StandardPieceRules),
            Arc::new(StandardCastlingRule),
            Arc::new(StandardNotation),
        )
    }

    /// Builds a board from a FEN string with a caller-supplied ruleset.
    ///
    /// This is the engine's configuration surface (see SPEC_FULL.md §4.13):
    /// a variant is configured by swapping in different capability handles,
    /// not by subclassing.
    pub fn with_rules(
        fen: &str,
        geometry: Arc<dyn SquareGeometry>,
        piece_rules: Arc<dyn PieceRules>,
        castling_rule: Arc<dyn CastlingRule>,
        notation: Arc<dyn MoveNotation>,
    ) -> Result<Self, FenError> {
        let parsed = crate::fen::parse_fen(fen, geometry.as_ref())?;
        let mut board = Board {
            pieces: parsed.pieces,
            turn: parsed.turn,
            castling_ability: parsed.castling_ability,
            start_fen: fen.trim().to_string(),
            start_turn: parsed.turn,
            initial_en_passant: parsed.en_passant,
            history: Vec::new(),
            captures: HashMap::new(),
            sq_count: HashMap::new(),
            space_eval: HashMap::new(),
            halfmove_clock: parsed.halfmove_clock,
            fullmove_number: parsed.fullmove_number,
            geometry,
            piece_rules,
            castling_rule,
            notation,
        };
        board.recompute_sq_count();
        board.recompute_space_eval();
        Ok(board)
    }

    // -- accessors --------------------------------------------------------

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn castling_ability(&self) -> &str {
        &self.castling_ability
    }

    pub fn start_fen(&self) -> &str {
        &self.start_fen
    }

    pub fn piece_by_sq(&self, sq: Square) -> Option<Piece> {
        self.pieces.get(&sq).copied()
    }

    pub fn piece(&self, color: Color, kind: PieceKind) -> Option<Piece> {
        self.pieces.values().find(|p| p.color == color && p.kind == kind).copied()
    }

    pub fn pieces(&self, color: Option<Color>) -> Vec<Piece> {
        self.pieces
            .values()
            .filter(|p| color.map_or(true, |c| p.color == c))
            .copied()
            .collect()
    }

    pub fn captures(&self, color: Color) -> &[CaptureRecord] {
        self.captures.get(&color).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn sq_count(&self, color: Color) -> usize {
        self.sq_count.get(&color).copied().unwrap_or(0)
    }

    pub fn space_eval(&self, color: Color) -> usize {
        self.space_eval.get(&color).copied().unwrap_or(0)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn geometry(&self) -> &dyn SquareGeometry {
        self.geometry.as_ref()
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// The en passant target square, if the last half-move was a two-square
    /// pawn advance; `None` otherwise (SPEC_FULL.md §4.10).
    pub fn en_passant(&self) -> Option<Square> {
        match self.history.last() {
            Some(entry) => entry.ep_after,
            None => self.initial_en_passant,
        }
    }

    pub(crate) fn position_view(&self) -> Position<'_> {
        Position {
            pieces: &self.pieces,
            geometry: self.geometry.as_ref(),
            en_passant: self.en_passant(),
        }
    }

    pub(crate) fn notation(&self) -> &dyn MoveNotation {
        self.notation.as_ref()
    }

    pub(crate) fn castling_rule(&self) -> &dyn CastlingRule {
        self.castling_rule.as_ref()
    }

    pub(crate) fn piece_rules(&self) -> &dyn PieceRules {
        self.piece_rules.as_ref()
    }

    // -- move pipeline ------------------------------------------------------

    /// Plays a PGN half-move for `color`. Returns `false` and leaves the
    /// board unchanged if the move is unparseable, ambiguous, or illegal.
    pub fn play(&mut self, color: Color, pgn: &str) -> bool {
        if color != self.turn {
            return false;
        }
        let Some(parsed) = self.notation.parse(color, pgn) else {
            return false;
        };
        match parsed.move_kind {
            MoveKind::CastleShort => self.try_castle(color, CastlingSide::Short, &parsed.pgn),
            MoveKind::CastleLong => self.try_castle(color, CastlingSide::Long, &parsed.pgn),
            _ => {
                let pgn = parsed.pgn.clone();
                let kind = parsed.kind;
                let sq_current = parsed.sq_current.clone();
                let sq_next = parsed.sq_next;
                let is_capture = parsed.is_capture;
                let new_kind = parsed.new_kind;
                self.try_normal_move(color, kind, &sq_current, sq_next, is_capture, new_kind, pgn)
            }
        }
    }

    fn try_normal_move(
        &mut self,
        color: Color,
        kind: PieceKind,
        sq_current: &str,
        sq_next: Square,
        is_capture: bool,
        new_kind: Option<PieceKind>,
        pgn: String,
    ) -> bool {
        let pos = self.position_view();
        let ep_target = pos.en_passant;

        if is_capture
            && self.piece_by_sq(sq_next).is_none()
            && !(kind == PieceKind::Pawn && ep_target == Some(sq_next))
        {
            return false;
        }

        let candidates: Vec<Square> = self
            .pieces
            .values()
            .filter(|p| p.color == color && p.kind == kind)
            .filter(|p| p.sq.to_algebraic().contains(sq_current))
            .filter(|p| self.piece_rules.move_squares(p, &pos).contains(&sq_next))
            .map(|p| p.sq)
            .filter(|&from| {
                let is_en_passant = kind == PieceKind::Pawn
                    && ep_target == Some(sq_next)
                    && self.piece_by_sq(sq_next).is_none();
                !self.would_leave_king_in_check(color, from, sq_next, is_en_passant)
            })
            .collect();

        if candidates.len() != 1 {
            return false;
        }
        let from = candidates[0];
        let is_en_passant =
            kind == PieceKind::Pawn && ep_target == Some(sq_next) && self.piece_by_sq(sq_next).is_none();

        if is_capture {
            self.capture(color, from, sq_next, is_en_passant);
        }

        let piece = self.pieces.remove(&from).expect("candidate square must hold a piece");
        let mut moved = piece.moved_to(sq_next);
        if self.piece_rules.is_promoted(&moved, self.geometry.as_ref()) {
            let target = new_kind.unwrap_or(PieceKind::Queen);
            moved = Piece {
                kind: target,
                rook_type: if target == PieceKind::Rook { Some(RookType::Plain) } else { None },
                ..moved
            };
        }
        self.pieces.insert(sq_next, moved);

        self.update_castling_rights(color, &piece, sq_next, is_capture);
        self.push_history(from, sq_next, pgn);
        self.refresh();
        true
    }

    fn try_castle(&mut self, color: Color, side: CastlingSide, pgn: &str) -> bool {
        if !self.can_castle(color, side) {
            return false;
        }
        let squares = self.castling_rule.squares(color, side);

        let king = self.pieces.remove(&squares.king_from).expect("king must be on its home square");
        let rook = self.pieces.remove(&squares.rook_from).expect("rook must be on its home square");
        self.pieces.insert(squares.king_to, king.moved_to(squares.king_to));
        self.pieces.insert(squares.rook_to, rook.moved_to(squares.rook_to));

        self.castling_ability = self.castling_rule.castle(&self.castling_ability, color);
        self.push_history(squares.king_from, squares.king_to, pgn.to_string());
        self.refresh();
        true
    }

    pub(crate) fn can_castle(&self, color: Color, side: CastlingSide) -> bool {
        if !self.castling_rule.can(&self.castling_ability, color, side) {
            return false;
        }
        let squares = self.castling_rule.squares(color, side);
        if self.king_square(color) != Some(squares.king_from) {
            return false;
        }
        if self.piece_by_sq(squares.rook_from).map(|p| p.kind) != Some(PieceKind::Rook) {
            return false;
        }
        if self
            .castling_rule
            .empty_required(color, side)
            .into_iter()
            .any(|sq| self.piece_by_sq(sq).is_some())
        {
            return false;
        }
        if self.is_king_attacked(color) {
            return false;
        }
        squares_between_inclusive(squares.king_from, squares.king_to)
            .into_iter()
            .all(|sq| !self.would_square_be_attacked_after_king_moves_there(color, sq))
    }

    fn capture(&mut self, color: Color, from: Square, to: Square, is_en_passant: bool) {
        let capturing = self.pieces[&from];
        let victim_sq = if is_en_passant { Square::new(to.file, from.rank) } else { to };
        if let Some(victim) = self.pieces.remove(&victim_sq) {
            let record = CaptureRecord {
                capturing: CapturedPieceInfo {
                    kind: capturing.kind,
                    sq: from,
                    rook_type: capturing.rook_type,
                },
                captured: CapturedPieceInfo {
                    kind: victim.kind,
                    sq: victim_sq,
                    rook_type: victim.rook_type,
                },
            };
            self.captures.entry(color).or_default().push(record);
        }
    }

    fn update_castling_rights(&mut self, color: Color, moved: &Piece, to: Square, is_capture: bool) {
        match moved.kind {
            PieceKind::King => {
                self.castling_ability = self.castling_rule.remove(
                    &self.castling_ability,
                    &[
                        self.castling_rule.ability_char(color, CastlingSide::Short),
                        self.castling_rule.ability_char(color, CastlingSide::Long),
                    ],
                );
            }
            PieceKind::Rook => match moved.rook_type {
                Some(RookType::CastleShort) => {
                    self.castling_ability = self.castling_rule.remove(
                        &self.castling_ability,
                        &[self.castling_rule.ability_char(color, CastlingSide::Short)],
                    );
                }
                Some(RookType::CastleLong) => {
                    self.castling_ability = self.castling_rule.remove(
                        &self.castling_ability,
                        &[self.castling_rule.ability_char(color, CastlingSide::Long)],
                    );
                }
                _ => {}
            },
            _ => {}
        }

        if is_capture {
            let opp = color.opp();
            if to == self.castling_rule.rook_home(opp, CastlingSide::Short) {
                self.castling_ability = self.castling_rule.remove(
                    &self.castling_ability,
                    &[self.castling_rule.ability_char(opp, CastlingSide::Short)],
                );
            } else if to == self.castling_rule.rook_home(opp, CastlingSide::Long) {
                self.castling_ability = self.castling_rule.remove(
                    &self.castling_ability,
                    &[self.castling_rule.ability_char(opp, CastlingSide::Long)],
                );
            }
        }
    }

    fn push_history(&mut self, from: Square, to: Square, pgn: String) {
        let ep_after = self.piece_by_sq(to).filter(|p| p.kind == PieceKind::Pawn).and_then(|_| {
            if from.rank.abs_diff(to.rank) == 2 {
                Some(Square::new(from.file, (from.rank + to.rank) / 2))
            } else {
                None
            }
        });
        self.history.push(HistoryEntry {
            castling_ability: self.castling_ability.clone(),
            from_sq: from,
            to_sq: to,
            pgn,
            fen: String::new(),
            ep_after,
        });
    }

    fn refresh(&mut self) {
        self.turn = self.turn.opp();
        self.recompute_sq_count();
        self.recompute_space_eval();
        let fen = self.to_fen();
        if let Some(last) = self.history.last_mut() {
            last.fen = fen;
        }
    }

    fn recompute_sq_count(&mut self) {
        self.sq_count.clear();
        for piece in self.pieces.values() {
            *self.sq_count.entry(piece.color).or_insert(0) += 1;
        }
    }

    fn recompute_space_eval(&mut self) {
        let ep = self.en_passant();
        let pos = Position { pieces: &self.pieces, geometry: self.geometry.as_ref(), en_passant: ep };
        let mut totals: HashMap<Color, usize> = HashMap::new();
        for piece in self.pieces.values() {
            let mobility = self.piece_rules.move_squares(piece, &pos).len();
            *totals.entry(piece.color).or_insert(0) += mobility;
        }
        self.space_eval = totals;
    }

    // -- king safety --------------------------------------------------------

    pub(crate) fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces
            .values()
            .find(|p| p.color == color && p.kind == PieceKind::King)
            .map(|p| p.sq)
    }

    pub(crate) fn attacked_squares(&self, by: Color) -> std::collections::HashSet<Square> {
        let pos = self.position_view();
        self.pieces
            .values()
            .filter(|p| p.color == by)
            .flat_map(|p| self.piece_rules.attacks(p, &pos))
            .collect()
    }

    pub(crate) fn is_king_attacked(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(sq) => self.attacked_squares(color.opp()).contains(&sq),
            None => false,
        }
    }

    fn apply_raw(&mut self, from: Square, to: Square, is_en_passant: bool) {
        let Some(piece) = self.pieces.remove(&from) else { return };
        let victim_sq = if is_en_passant { Square::new(to.file, from.rank) } else { to };
        self.pieces.remove(&victim_sq);
        self.pieces.insert(to, piece.moved_to(to));
    }

    fn would_leave_king_in_check(&self, color: Color, from: Square, to: Square, is_en_passant: bool) -> bool {
        let mut probe = self.clone();
        probe.apply_raw(from, to, is_en_passant);
        probe.is_king_attacked(color)
    }

    fn would_square_be_attacked_after_king_moves_there(&self, color: Color, sq: Square) -> bool {
        let mut probe = self.clone();
        if let Some(king_sq) = probe.king_square(color) {
            if let Some(king) = probe.pieces.remove(&king_sq) {
                probe.pieces.insert(sq, king.moved_to(sq));
            }
        }
        probe.is_king_attacked(color)
    }

    /// Legal target squares for the piece on `sq` (empty if there is none).
    /// Includes castling destinations for a king that may still castle.
    pub fn legal(&self, sq: Square) -> Vec<Square> {
        let Some(piece) = self.piece_by_sq(sq) else { return Vec::new() };
        let pos = self.position_view();
        let ep = pos.en_passant;
        let mut out: Vec<Square> = self
            .piece_rules
            .move_squares(&piece, &pos)
            .into_iter()
            .filter(|&to| {
                let is_en_passant =
                    piece.kind == PieceKind::Pawn && ep == Some(to) && self.piece_by_sq(to).is_none();
                !self.would_leave_king_in_check(piece.color, sq, to, is_en_passant)
            })
            .collect();

        if piece.kind == PieceKind::King {
            for side in [CastlingSide::Short, CastlingSide::Long] {
                if self.can_castle(piece.color, side) {
                    out.push(self.castling_rule.squares(piece.color, side).king_to);
                }
            }
        }
        out
    }

    /// A new board one half-move earlier, built by replaying history from
    /// `start_fen`. Returns a board equal to `self` if history is empty.
    pub fn undo(&self) -> Board {
        let mut replay = Board::with_rules(
            &self.start_fen,
            Arc::clone(&self.geometry),
            Arc::clone(&self.piece_rules),
            Arc::clone(&self.castling_rule),
            Arc::clone(&self.notation),
        )
        .expect("start_fen was valid at construction time");

        let remaining = &self.history[..self.history.len().saturating_sub(1)];
        for entry in remaining {
            let mover = replay.turn;
            let ok = replay.play(mover, &entry.pgn);
            debug_assert!(ok, "historical move must replay cleanly");
        }
        replay
    }

    pub fn to_array(&self) -> Vec<Vec<Option<Piece>>> {
        let ranks = self.geometry.ranks();
        let files = self.geometry.files();
        (0..ranks)
            .rev()
            .map(|rank| (0..files).map(|file| self.pieces.get(&Square::new(file, rank)).copied()).collect())
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

fn squares_between_inclusive(a: Square, b: Square) -> Vec<Square> {
    let step: i16 = if b.file > a.file { 1 } else { -1 };
    let mut squares = Vec::new();
    let mut file = a.file as i16;
    loop {
        squares.push(Square::new(file as u8, a.rank));
        if file == b.file as i16 {
            break;
        }
        file += step;
    }
    squares
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_board_has_standard_setup() {
        let board = Board::new();
        assert_eq!(board.turn(), Color::White);
        assert_eq!(board.pieces(None).len(), 32);
        assert_eq!(board.castling_ability(), "KQkq");
    }

    #[test]
    fn pawn_push_flips_turn_and_records_history() {
        let mut board = Board::new();
        assert!(board.play(Color::White, "e4"));
        assert_eq!(board.turn(), Color::Black);
        assert_eq!(board.history().len(), 1);
        assert_eq!(board.history()[0].to_sq, Square::from_algebraic("e4").unwrap());
        assert_eq!(board.en_passant(), Some(Square::from_algebraic("e3").unwrap()));
    }

    #[test]
    fn rejects_move_for_wrong_side() {
        let mut board = Board::new();
        assert!(!board.play(Color::Black, "e5"));
        assert_eq!(board.turn(), Color::White);
    }

    #[test]
    fn kingside_castling_relocates_king_and_rook() {
        let mut board = Board::new();
        for (color, mv) in [
            (Color::White, "e4"),
            (Color::Black, "e5"),
            (Color::White, "Nf3"),
            (Color::Black, "Nc6"),
            (Color::White, "Bc4"),
            (Color::Black, "Bc5"),
            (Color::White, "O-O"),
        ] {
            assert!(board.play(color, mv), "move {mv} should succeed");
        }
        assert_eq!(board.piece_by_sq(Square::from_algebraic("g1").unwrap()).unwrap().kind, PieceKind::King);
        assert_eq!(board.piece_by_sq(Square::from_algebraic("f1").unwrap()).unwrap().kind, PieceKind::Rook);
        assert_eq!(board.castling_ability(), "kq");
    }

    #[test]
    fn undo_restores_previous_position() {
        let mut board = Board::new();
        let before = board.to_fen();
        board.play(Color::White, "e4");
        let restored = board.undo();
        assert_eq!(restored.to_fen(), before);
    }

    #[test]
    fn clone_is_independent() {
        let mut board = Board::new();
        let snapshot = board.clone();
        board.play(Color::White, "e4");
        assert_ne!(board.to_fen(), snapshot.to_fen());
    }
}
