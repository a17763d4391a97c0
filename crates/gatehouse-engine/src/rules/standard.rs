//! Standard chess rules.

use super::{Variant, VariantKind};
use crate::{Bitboard, Position};
use gatehouse_core::Piece;

/// Orthodox chess (FIDE).
///
/// All behavior comes from the trait defaults; this type only supplies the
/// material rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChess;

impl Variant for StandardChess {
    fn kind(&self) -> VariantKind {
        VariantKind::Standard
    }

    fn is_insufficient_material(&self, position: &Position) -> bool {
        board_material_is_insufficient(position)
    }
}

/// Board-only material rule: bare kings, a single minor piece, or any
/// number of bishops all standing on one square color.
pub(crate) fn board_material_is_insufficient(position: &Position) -> bool {
    let mut total = 0;
    let mut minors = 0;
    let mut bishops = Bitboard::EMPTY;
    for (sq, piece, _) in position.board.pieces() {
        total += 1;
        match piece {
            Piece::Knight => minors += 1,
            Piece::Bishop => {
                minors += 1;
                bishops.set(sq);
            }
            _ => {}
        }
    }

    if total == 2 {
        return true;
    }
    if total == 3 && minors == 1 {
        return true;
    }
    let bishop_count = bishops.count() as usize;
    if bishop_count > 0 && total == bishop_count + 2 {
        let light = (bishops & Bitboard::LIGHT_SQUARES).count() as usize;
        return light == 0 || light == bishop_count;
    }
    false
}
