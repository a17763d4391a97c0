//! Move representation.

use crate::{Color, Piece, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Castling wing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastleSide {
    Kingside = 0,
    Queenside = 1,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// SAN token for this castle.
    pub const fn san(self) -> &'static str {
        match self {
            CastleSide::Kingside => "O-O",
            CastleSide::Queenside => "O-O-O",
        }
    }
}

/// Flags for special move types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveFlag {
    /// Normal move or capture.
    Normal,
    /// Pawn double push from starting rank.
    DoublePush,
    /// En passant capture.
    EnPassant,
    /// Castling with the rook standing on `rook`.
    Castle { side: CastleSide, rook: Square },
    /// A piece taken from the hand and placed on an empty square.
    Drop,
}

/// An auxiliary piece entering the board behind a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gate {
    pub piece: Piece,
    pub square: Square,
}

/// A move, carrying everything needed to apply it and to print it.
///
/// `from` is `None` only for drops.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Option<Square>,
    pub to: Square,
    pub piece: Piece,
    pub color: Color,
    pub captured: Option<Piece>,
    pub promotion: Option<Piece>,
    pub flag: MoveFlag,
    pub gate: Option<Gate>,
}

impl Move {
    /// Creates a plain move of `piece` from `from` to `to`.
    #[inline]
    pub const fn new(piece: Piece, color: Color, from: Square, to: Square) -> Self {
        Move {
            from: Some(from),
            to,
            piece,
            color,
            captured: None,
            promotion: None,
            flag: MoveFlag::Normal,
            gate: None,
        }
    }

    /// Creates a drop of `piece` onto `to`.
    #[inline]
    pub const fn drop(piece: Piece, color: Color, to: Square) -> Self {
        Move {
            from: None,
            to,
            piece,
            color,
            captured: None,
            promotion: None,
            flag: MoveFlag::Drop,
            gate: None,
        }
    }

    #[inline]
    pub const fn with_capture(mut self, captured: Piece) -> Self {
        self.captured = Some(captured);
        self
    }

    #[inline]
    pub const fn with_promotion(mut self, promotion: Piece) -> Self {
        self.promotion = Some(promotion);
        self
    }

    #[inline]
    pub const fn with_flag(mut self, flag: MoveFlag) -> Self {
        self.flag = flag;
        self
    }

    #[inline]
    pub const fn with_gate(mut self, piece: Piece, square: Square) -> Self {
        self.gate = Some(Gate { piece, square });
        self
    }

    #[inline]
    pub const fn is_drop(&self) -> bool {
        matches!(self.flag, MoveFlag::Drop)
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Returns the castling wing if this is a castling move.
    #[inline]
    pub const fn castle_side(&self) -> Option<CastleSide> {
        match self.flag {
            MoveFlag::Castle { side, .. } => Some(side),
            _ => None,
        }
    }

    /// Long algebraic form used for debugging and perft output
    /// (`e2e4`, `e7e8q`, `N@f3`, `g1f3/h`).
    pub fn to_long_algebraic(&self) -> String {
        let mut s = match self.from {
            Some(from) => format!("{}{}", from, self.to),
            None => format!("{}@{}", self.piece.san_char(), self.to),
        };
        if let Some(p) = self.promotion {
            s.push(p.to_char());
        }
        if let Some(gate) = self.gate {
            s.push('/');
            s.push(gate.piece.to_char());
            s.push_str(&gate.square.to_algebraic());
        }
        s
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_long_algebraic())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_long_algebraic())
    }
}
