//! Piece placement.

use crate::Bitboard;
use gatehouse_core::{Color, Piece, Square};

/// The 64-square piece grid.
///
/// Keeps per-color occupancy and the king squares in step with the grid, so
/// that move generation can walk only the mover's pieces and check tests
/// never scan for the king. Pieces that reached the board through promotion
/// are tracked separately: in the drop variant they return to the capturer's
/// hand as pawns.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<(Piece, Color)>; 64],
    occupied: [Bitboard; 2],
    kings: [Option<Square>; 2],
    promoted: Bitboard,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub const fn empty() -> Self {
        Board {
            squares: [None; 64],
            occupied: [Bitboard::EMPTY; 2],
            kings: [None; 2],
            promoted: Bitboard::EMPTY,
        }
    }

    /// Returns the piece on a square.
    #[inline]
    pub fn get(&self, sq: Square) -> Option<(Piece, Color)> {
        self.squares[sq.index() as usize]
    }

    /// Puts a piece on a square, replacing whatever stood there.
    ///
    /// A king placed away from its side's current king square moves that
    /// king rather than adding a second one.
    pub fn place(&mut self, piece: Piece, color: Color, sq: Square) {
        if piece == Piece::King {
            if let Some(old) = self.kings[color.index()] {
                if old != sq {
                    self.remove(old);
                }
            }
        }
        self.remove(sq);
        self.squares[sq.index() as usize] = Some((piece, color));
        self.occupied[color.index()].set(sq);
        if piece == Piece::King {
            self.kings[color.index()] = Some(sq);
        }
    }

    /// Removes and returns the piece on a square.
    pub fn remove(&mut self, sq: Square) -> Option<(Piece, Color)> {
        let taken = self.squares[sq.index() as usize].take();
        if let Some((piece, color)) = taken {
            self.occupied[color.index()].clear(sq);
            if piece == Piece::King && self.kings[color.index()] == Some(sq) {
                self.kings[color.index()] = None;
            }
        }
        self.promoted.clear(sq);
        taken
    }

    /// Moves a piece, keeping its promoted marker. The destination must be
    /// empty.
    pub(crate) fn relocate(&mut self, from: Square, to: Square) {
        debug_assert!(self.get(to).is_none());
        let promoted = self.is_promoted(from);
        if let Some((piece, color)) = self.remove(from) {
            self.place(piece, color, to);
            self.promoted.assign(to, promoted);
        }
    }

    /// Empties the board.
    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.kings[color.index()]
    }

    /// Squares holding a piece of `color`.
    #[inline]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied[0] | self.occupied[1]
    }

    #[inline]
    pub fn is_promoted(&self, sq: Square) -> bool {
        self.promoted.contains(sq)
    }

    /// Marks or unmarks the piece on `sq` as promoted.
    pub fn set_promoted(&mut self, sq: Square, promoted: bool) {
        self.promoted.assign(sq, promoted && self.get(sq).is_some());
    }

    pub fn promoted(&self) -> Bitboard {
        self.promoted
    }

    /// Iterates over occupied squares from a1 to h8.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece, Color)> + '_ {
        self.occupied()
            .into_iter()
            .filter_map(move |sq| self.get(sq).map(|(p, c)| (sq, p, c)))
    }

    /// Number of pieces of one type and color.
    pub fn count(&self, piece: Piece, color: Color) -> usize {
        self.occupied_by(color)
            .into_iter()
            .filter(|&sq| self.get(sq) == Some((piece, color)))
            .count()
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in (0..8u8).rev() {
            for file in 0..8u8 {
                let c = Square::from_index(rank * 8 + file)
                    .and_then(|sq| self.get(sq))
                    .map(|(p, c)| p.to_fen_char(c))
                    .unwrap_or('.');
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
