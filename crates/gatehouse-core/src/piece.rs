//! Piece types, including the two auxiliary pieces of Seirawan chess.

use crate::Color;
use serde::{Deserialize, Serialize};

/// The piece types known to the engine.
///
/// `Hawk` moves as bishop plus knight and `Elephant` as rook plus knight.
/// They only appear in the gating variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Piece {
    #[serde(rename = "p")]
    Pawn = 0,
    #[serde(rename = "n")]
    Knight = 1,
    #[serde(rename = "b")]
    Bishop = 2,
    #[serde(rename = "r")]
    Rook = 3,
    #[serde(rename = "q")]
    Queen = 4,
    #[serde(rename = "k")]
    King = 5,
    #[serde(rename = "h")]
    Hawk = 6,
    #[serde(rename = "e")]
    Elephant = 7,
}

impl Piece {
    /// All piece types in order.
    pub const ALL: [Piece; 8] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
        Piece::Hawk,
        Piece::Elephant,
    ];

    /// The orthodox piece types.
    pub const STANDARD: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Auxiliary types in reserve order (`E` before `H` in FEN).
    pub const AUXILIARY: [Piece; 2] = [Piece::Elephant, Piece::Hawk];

    /// Returns the index of this piece type (0-7).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Index into [`Piece::AUXILIARY`], if this is an auxiliary piece.
    #[inline]
    pub const fn auxiliary_index(self) -> Option<usize> {
        match self {
            Piece::Elephant => Some(0),
            Piece::Hawk => Some(1),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_auxiliary(self) -> bool {
        self.auxiliary_index().is_some()
    }

    /// Returns the lowercase letter of this piece.
    pub const fn to_char(self) -> char {
        match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
            Piece::Hawk => 'h',
            Piece::Elephant => 'e',
        }
    }

    /// Returns the FEN character for this piece with the given color.
    pub const fn to_fen_char(self, color: Color) -> char {
        let c = self.to_char();
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN character into a piece and color.
    pub const fn from_fen_char(c: char) -> Option<(Piece, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        match Self::from_char(c) {
            Some(piece) => Some((piece, color)),
            None => None,
        }
    }

    /// Parses a piece letter, ignoring case.
    pub const fn from_char(c: char) -> Option<Piece> {
        let piece = match c.to_ascii_lowercase() {
            'p' => Piece::Pawn,
            'n' => Piece::Knight,
            'b' => Piece::Bishop,
            'r' => Piece::Rook,
            'q' => Piece::Queen,
            'k' => Piece::King,
            'h' => Piece::Hawk,
            'e' => Piece::Elephant,
            _ => return None,
        };
        Some(piece)
    }

    /// Uppercase letter used in SAN.
    #[inline]
    pub const fn san_char(self) -> char {
        self.to_char().to_ascii_uppercase()
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Piece::Pawn => "Pawn",
            Piece::Knight => "Knight",
            Piece::Bishop => "Bishop",
            Piece::Rook => "Rook",
            Piece::Queen => "Queen",
            Piece::King => "King",
            Piece::Hawk => "Hawk",
            Piece::Elephant => "Elephant",
        };
        write!(f, "{}", name)
    }
}
