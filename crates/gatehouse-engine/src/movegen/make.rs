//! Applying and reverting moves in place.
//!
//! [`make_move`] returns an [`Undo`] record holding exactly the state the
//! move destroys; [`unmake_move`] restores the position bit for bit from it.

use super::castling::rook_destination;
use crate::reserve::GateState;
use crate::position::CastlingRights;
use crate::Position;
use gatehouse_core::{Color, Move, MoveFlag, Piece, Square};

/// A piece removed by a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Captured {
    pub piece: Piece,
    pub color: Color,
    pub square: Square,
    pub promoted: bool,
}

/// State needed to take a move back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undo {
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    gates: GateState,
    captured: Option<Captured>,
    mover_promoted: bool,
    hand_index: Option<usize>,
    banked: bool,
}

impl Undo {
    /// The piece the move captured, if any.
    pub fn captured(&self) -> Option<Captured> {
        self.captured
    }
}

/// Plays `m` on `position`. The move must come from the generator for this
/// position.
pub fn make_move(position: &mut Position, m: &Move) -> Undo {
    let us = m.color;
    let rules = position.rules();

    let mut undo = Undo {
        castling: position.castling,
        en_passant: position.en_passant,
        halfmove_clock: position.halfmove_clock,
        fullmove_number: position.fullmove_number,
        gates: position.gates,
        captured: None,
        mover_promoted: false,
        hand_index: None,
        banked: false,
    };

    match (m.flag, m.from) {
        (MoveFlag::Drop, _) | (_, None) => {
            undo.hand_index = position.hand.take(us, m.piece);
            position.board.place(m.piece, us, m.to);
        }
        (MoveFlag::Castle { side, rook }, Some(king)) => {
            position.board.remove(king);
            position.board.remove(rook);
            position.board.place(Piece::King, us, m.to);
            position
                .board
                .place(Piece::Rook, us, rook_destination(us, side));
            position.gates.set_eligible(rook, false);
        }
        (flag, Some(from)) => {
            let capture_square = if flag == MoveFlag::EnPassant {
                m.to.offset(0, -us.pawn_direction()).unwrap_or(m.to)
            } else {
                m.to
            };
            if let Some((piece, color)) = position.board.get(capture_square) {
                let promoted = position.board.is_promoted(capture_square);
                position.board.remove(capture_square);
                undo.captured = Some(Captured {
                    piece,
                    color,
                    square: capture_square,
                    promoted,
                });
                if rules.banks_captures() {
                    let banked = if promoted { Piece::Pawn } else { piece };
                    position.hand.push_front(us, banked);
                    undo.banked = true;
                }
                position.gates.set_eligible(capture_square, false);
            }

            undo.mover_promoted = position.board.is_promoted(from);
            position.board.relocate(from, m.to);

            if let Some(promotion) = m.promotion {
                position.board.place(promotion, us, m.to);
                position
                    .board
                    .set_promoted(m.to, rules.banks_captures());
                position.gates.set_reserve(us, promotion, false);
            }
        }
    }

    if let Some(from) = m.from {
        position.gates.set_eligible(from, false);
    }
    position.gates.set_eligible(m.to, false);

    if let Some(gate) = m.gate {
        position.board.place(gate.piece, us, gate.square);
        position.gates.set_reserve(us, gate.piece, false);
    }

    // Castling rights.
    if m.piece == Piece::King && !m.is_drop() {
        position.castling.remove_color(us);
    }
    if let Some(from) = m.from {
        position.castling.remove_rook_square(from);
    }
    position.castling.remove_rook_square(m.to);

    // En passant square, only when an enemy pawn could take.
    position.en_passant = None;
    if m.flag == MoveFlag::DoublePush {
        if let Some(from) = m.from {
            let them = us.opposite();
            let can_capture = [-1, 1].into_iter().any(|df| {
                m.to.offset(df, 0)
                    .and_then(|sq| position.board.get(sq))
                    == Some((Piece::Pawn, them))
            });
            if can_capture {
                position.en_passant = from.offset(0, us.pawn_direction());
            }
        }
    }

    // Drops never reset the clock, pawn drops included.
    if (m.piece == Piece::Pawn && !m.is_drop()) || undo.captured.is_some() {
        position.halfmove_clock = 0;
    } else {
        position.halfmove_clock += 1;
    }
    if us == Color::Black {
        position.fullmove_number += 1;
    }
    position.side_to_move = us.opposite();

    undo
}

/// Reverts `m`, which must be the last move made on `position`.
pub fn unmake_move(position: &mut Position, m: &Move, undo: Undo) {
    let us = m.color;

    position.side_to_move = us;
    position.castling = undo.castling;
    position.en_passant = undo.en_passant;
    position.halfmove_clock = undo.halfmove_clock;
    position.fullmove_number = undo.fullmove_number;
    position.gates = undo.gates;

    if let Some(gate) = m.gate {
        position.board.remove(gate.square);
    }

    match (m.flag, m.from) {
        (MoveFlag::Drop, _) | (_, None) => {
            position.board.remove(m.to);
            if let Some(index) = undo.hand_index {
                position.hand.restore(us, index, m.piece);
            }
        }
        (MoveFlag::Castle { side, rook }, Some(king)) => {
            position.board.remove(m.to);
            position.board.remove(rook_destination(us, side));
            position.board.place(Piece::King, us, king);
            position.board.place(Piece::Rook, us, rook);
        }
        (_, Some(from)) => {
            if m.promotion.is_some() {
                position.board.remove(m.to);
                position.board.place(Piece::Pawn, us, from);
            } else {
                position.board.relocate(m.to, from);
            }
            position.board.set_promoted(from, undo.mover_promoted);

            if let Some(captured) = undo.captured {
                position
                    .board
                    .place(captured.piece, captured.color, captured.square);
                position
                    .board
                    .set_promoted(captured.square, captured.promoted);
            }
            if undo.banked {
                position.hand.pop_front(us);
            }
        }
    }
}
