//! Castling in both orthodox and shuffled setups.
//!
//! The king always ends on the g- or c-file and the rook on the f- or
//! d-file, wherever they started. Every square either piece crosses or
//! lands on must be empty apart from the two castling pieces themselves,
//! and the king may not start on, cross or land on an attacked square.

use super::{is_square_attacked, MoveList};
use crate::{Bitboard, Position};
use gatehouse_core::{CastleSide, Color, File, Move, MoveFlag, Piece, Square};

/// Where the king lands.
pub const fn king_destination(color: Color, side: CastleSide) -> Square {
    let file = match side {
        CastleSide::Kingside => File::G,
        CastleSide::Queenside => File::C,
    };
    Square::new(file, color.back_rank())
}

/// Where the rook lands.
pub const fn rook_destination(color: Color, side: CastleSide) -> Square {
    let file = match side {
        CastleSide::Kingside => File::F,
        CastleSide::Queenside => File::D,
    };
    Square::new(file, color.back_rank())
}

/// Returns the castling move for `color` on `side` if the right is held
/// and the path is clear and safe. Does not depend on the side to move.
///
/// The king's final square is checked here as well; the generator's
/// legality filter repeats that check on the resulting position.
pub fn castling_move(position: &Position, color: Color, side: CastleSide) -> Option<Move> {
    let king = position.castling_king(color)?;
    let rook = position.castling.rook(color, side)?;
    if position.board.get(rook) != Some((Piece::Rook, color)) {
        return None;
    }

    let king_to = king_destination(color, side);
    let rook_to = rook_destination(color, side);

    let movers = Bitboard::from_square(king) | Bitboard::from_square(rook);
    let must_be_empty =
        (Bitboard::span(king, king_to) | Bitboard::span(rook, rook_to)) & !movers;
    if !(position.board.occupied() & must_be_empty).is_empty() {
        return None;
    }

    let them = color.opposite();
    if Bitboard::span(king, king_to)
        .into_iter()
        .any(|sq| is_square_attacked(position, sq, them))
    {
        return None;
    }

    Some(Move::new(Piece::King, color, king, king_to).with_flag(MoveFlag::Castle { side, rook }))
}

/// Adds the available castling moves for the side to move.
pub fn generate_castling_moves(position: &Position, moves: &mut MoveList) {
    let us = position.side_to_move;
    for side in CastleSide::ALL {
        if let Some(m) = castling_move(position, us, side) {
            moves.push(m);
        }
    }
}
