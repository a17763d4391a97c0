//! Seirawan chess: Hawk and Elephant enter play through gates.

use super::standard::board_material_is_insufficient;
use super::{Variant, VariantKind};
use crate::movegen::castling::{king_destination, rook_destination};
use crate::{MoveList, Position};
use gatehouse_core::{Color, Move, MoveFlag, Piece, Square};

/// The gating variant.
///
/// Each side starts with a Hawk (bishop + knight) and an Elephant (rook +
/// knight) in reserve. When a piece first leaves a back-rank square, its
/// owner may place one reserve piece on the vacated square as part of the
/// same move. When castling, either the king's or the rook's origin may
/// receive the piece.
#[derive(Debug, Clone, Copy, Default)]
pub struct Seirawan;

const PROMOTE_BASE: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];
const PROMOTE_E: [Piece; 5] = [
    Piece::Queen,
    Piece::Rook,
    Piece::Bishop,
    Piece::Knight,
    Piece::Elephant,
];
const PROMOTE_H: [Piece; 5] = [
    Piece::Queen,
    Piece::Rook,
    Piece::Bishop,
    Piece::Knight,
    Piece::Hawk,
];
const PROMOTE_EH: [Piece; 6] = [
    Piece::Queen,
    Piece::Rook,
    Piece::Bishop,
    Piece::Knight,
    Piece::Elephant,
    Piece::Hawk,
];

impl Variant for Seirawan {
    fn kind(&self) -> VariantKind {
        VariantKind::Seirawan
    }

    fn pieces(&self) -> &'static [Piece] {
        &Piece::ALL
    }

    /// An auxiliary piece is a promotion choice only while still in reserve.
    fn promotion_pieces(&self, position: &Position, color: Color) -> &'static [Piece] {
        let gates = &position.gates;
        match (
            gates.in_reserve(color, Piece::Elephant),
            gates.in_reserve(color, Piece::Hawk),
        ) {
            (true, true) => &PROMOTE_EH,
            (true, false) => &PROMOTE_E,
            (false, true) => &PROMOTE_H,
            (false, false) => &PROMOTE_BASE,
        }
    }

    fn expand_move(&self, position: &Position, m: Move, moves: &mut MoveList) {
        moves.push(m);
        let Some(from) = m.from else { return };
        let us = m.color;
        let gates = &position.gates;
        if !gates.has_reserve() {
            return;
        }

        let mut gate_onto = |sq: Square| {
            if sq.rank() == us.back_rank() && gates.is_eligible(sq) {
                for piece in gates.available(us) {
                    moves.push(m.with_gate(piece, sq));
                }
            }
        };

        match m.flag {
            MoveFlag::Castle { side, rook } => {
                let occupied_after = [king_destination(us, side), rook_destination(us, side)];
                for sq in [from, rook] {
                    if !occupied_after.contains(&sq) {
                        gate_onto(sq);
                    }
                }
            }
            MoveFlag::Drop => {}
            _ => gate_onto(from),
        }
    }

    /// Material still in reserve can always come into play.
    fn is_insufficient_material(&self, position: &Position) -> bool {
        !position.gates.has_reserve() && board_material_is_insufficient(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(fen: &str) -> Position {
        Position::from_fen(fen, VariantKind::Seirawan, false).unwrap()
    }

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn knight_move_gains_gated_variants() {
        let position = Position::startpos(VariantKind::Seirawan);
        let mut moves = MoveList::new();
        let m = Move::new(Piece::Knight, Color::White, sq("g1"), sq("f3"));
        Seirawan.expand_move(&position, m, &mut moves);
        assert_eq!(moves.len(), 3);
        assert_eq!(moves[1].gate.map(|g| g.piece), Some(Piece::Elephant));
        assert_eq!(moves[2].gate.map(|g| (g.piece, g.square)), Some((Piece::Hawk, sq("g1"))));
    }

    #[test]
    fn no_gating_from_ineligible_square() {
        let position = position(
            "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R S-SSSS--ssssssss EHeh w KQkq - 1 1",
        );
        let mut moves = MoveList::new();
        let m = Move::new(Piece::Knight, Color::White, sq("b1"), sq("c3"));
        Seirawan.expand_move(&position, m, &mut moves);
        assert_eq!(moves.len(), 1);
    }

    #[test]
    fn promotion_choices_follow_reserve() {
        let full = position("4k3/P7/8/8/8/8/8/4K3 ---------------- EHeh w - - 0 1");
        assert_eq!(Seirawan.promotion_pieces(&full, Color::White).len(), 6);
        let hawk_only = position("4k3/P7/8/8/8/8/8/4K3 ---------------- He w - - 0 1");
        assert_eq!(
            Seirawan.promotion_pieces(&hawk_only, Color::White),
            &[Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight, Piece::Hawk]
        );
        let none = position("4k3/P7/8/8/8/8/8/4K3 ---------------- - w - - 0 1");
        assert_eq!(Seirawan.promotion_pieces(&none, Color::White).len(), 4);
    }

    #[test]
    fn reserve_counts_as_material() {
        assert!(!Seirawan.is_insufficient_material(&position(
            "4k3/8/8/8/8/8/8/4K3 ---------------- h w - - 0 1"
        )));
        assert!(Seirawan.is_insufficient_material(&position(
            "4k3/8/8/8/8/8/8/4K3 ---------------- - w - - 0 1"
        )));
        assert!(!Seirawan.is_insufficient_material(&position(
            "4k3/8/8/8/8/8/8/3HK3 ---------------- - w - - 0 1"
        )));
    }
}
