//! Crazyhouse: captured pieces change sides and may be dropped back.

use super::{Variant, VariantKind};
use crate::{Bitboard, MoveList, Position};
use gatehouse_core::{Move, Piece};

/// The drop variant.
///
/// A capture banks the taken piece in the capturer's hand (a promoted piece
/// banks as a pawn). On a turn a player may instead drop any piece from hand
/// onto an empty square; pawns never land on the first or last rank.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crazyhouse;

impl Variant for Crazyhouse {
    fn kind(&self) -> VariantKind {
        VariantKind::Crazyhouse
    }

    fn banks_captures(&self) -> bool {
        true
    }

    fn generate_drops(&self, position: &Position, moves: &mut MoveList) {
        let us = position.side_to_move;
        let empty = !position.board.occupied();
        for piece in position.hand.kinds(us) {
            let targets = if piece == Piece::Pawn {
                empty & !(Bitboard::RANK_1 | Bitboard::RANK_8)
            } else {
                empty
            };
            for to in targets {
                moves.push(Move::drop(piece, us, to));
            }
        }
    }

    /// Any banked piece can still deliver mate, so only bare kings with
    /// empty hands are drawn.
    fn is_insufficient_material(&self, position: &Position) -> bool {
        position.hand.is_empty() && position.board.occupied().count() == 2
    }
}
