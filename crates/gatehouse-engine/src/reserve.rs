//! Off-board pieces: the crazyhouse hand and the Seirawan gate reserve.

use crate::Bitboard;
use gatehouse_core::{Color, Piece, Square};
use serde::Serialize;

/// Pieces held in hand, per color.
///
/// Order matters for FEN: newly banked pieces go to the front and a drop
/// takes the first matching entry, so undo can put everything back where it
/// was.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Hand {
    pieces: [Vec<Piece>; 2],
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Banks a captured piece.
    pub fn push_front(&mut self, color: Color, piece: Piece) {
        self.pieces[color.index()].insert(0, piece);
    }

    /// Appends a piece (FEN loading order).
    pub fn push_back(&mut self, color: Color, piece: Piece) {
        self.pieces[color.index()].push(piece);
    }

    /// Takes the first matching piece out of hand, returning its index.
    pub fn take(&mut self, color: Color, piece: Piece) -> Option<usize> {
        let hand = &mut self.pieces[color.index()];
        let index = hand.iter().position(|&p| p == piece)?;
        hand.remove(index);
        Some(index)
    }

    /// Puts a piece back at the index [`take`](Hand::take) returned.
    pub fn restore(&mut self, color: Color, index: usize, piece: Piece) {
        let hand = &mut self.pieces[color.index()];
        let index = index.min(hand.len());
        hand.insert(index, piece);
    }

    /// Removes the most recently banked piece.
    pub fn pop_front(&mut self, color: Color) -> Option<Piece> {
        let hand = &mut self.pieces[color.index()];
        if hand.is_empty() {
            None
        } else {
            Some(hand.remove(0))
        }
    }

    pub fn count(&self, color: Color, piece: Piece) -> usize {
        self.pieces[color.index()].iter().filter(|&&p| p == piece).count()
    }

    /// Pieces of one color in hand order.
    pub fn pieces(&self, color: Color) -> &[Piece] {
        &self.pieces[color.index()]
    }

    /// Distinct piece types of one color, pawn first.
    pub fn kinds(&self, color: Color) -> impl Iterator<Item = Piece> + '_ {
        Piece::STANDARD
            .into_iter()
            .filter(move |&p| self.pieces[color.index()].contains(&p))
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.iter().all(Vec::is_empty)
    }

    /// Hand segment of a crazyhouse FEN: white pieces then black pieces.
    pub fn to_fen(&self) -> String {
        Color::ALL
            .into_iter()
            .flat_map(|c| self.pieces[c.index()].iter().map(move |p| p.to_fen_char(c)))
            .collect()
    }
}

/// Sorted view of the hand for callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HandSnapshot {
    #[serde(rename = "w")]
    pub white: Vec<Piece>,
    #[serde(rename = "b")]
    pub black: Vec<Piece>,
}

impl From<&Hand> for HandSnapshot {
    fn from(hand: &Hand) -> Self {
        let sorted = |color| {
            let mut pieces = hand.pieces(color).to_vec();
            pieces.sort();
            pieces
        };
        HandSnapshot {
            white: sorted(Color::White),
            black: sorted(Color::Black),
        }
    }
}

/// Seirawan gating state.
///
/// `reserve[color][i]` is set while [`Piece::AUXILIARY`]`[i]` has not yet
/// entered play. `eligible` marks back-rank squares whose occupant has never
/// moved, the only squares a piece may be gated onto.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GateState {
    reserve: [[bool; 2]; 2],
    eligible: Bitboard,
}

impl GateState {
    /// Both auxiliary pieces in reserve and the full back ranks eligible.
    pub fn initial() -> Self {
        GateState {
            reserve: [[true; 2]; 2],
            eligible: Bitboard::RANK_1 | Bitboard::RANK_8,
        }
    }

    #[inline]
    pub fn in_reserve(&self, color: Color, piece: Piece) -> bool {
        piece
            .auxiliary_index()
            .map_or(false, |i| self.reserve[color.index()][i])
    }

    pub fn set_reserve(&mut self, color: Color, piece: Piece, available: bool) {
        if let Some(i) = piece.auxiliary_index() {
            self.reserve[color.index()][i] = available;
        }
    }

    /// Auxiliary pieces still available to `color`, in FEN order.
    pub fn available(&self, color: Color) -> impl Iterator<Item = Piece> + '_ {
        Piece::AUXILIARY
            .into_iter()
            .filter(move |&p| self.in_reserve(color, p))
    }

    pub fn has_reserve(&self) -> bool {
        self.reserve.iter().flatten().any(|&r| r)
    }

    #[inline]
    pub fn is_eligible(&self, sq: Square) -> bool {
        self.eligible.contains(sq)
    }

    pub fn set_eligible(&mut self, sq: Square, eligible: bool) {
        self.eligible.assign(sq, eligible);
    }

    pub fn eligible(&self) -> Bitboard {
        self.eligible
    }

    /// The sixteen-character gate marker field.
    pub fn markers_fen(&self) -> String {
        let rank = |bits: Bitboard, marker: char| -> String {
            (0..8)
                .map(|file| if (bits.0 >> file) & 1 == 1 { marker } else { '-' })
                .collect()
        };
        let white = Bitboard(self.eligible.0 & Bitboard::RANK_1.0);
        let black = Bitboard((self.eligible.0 & Bitboard::RANK_8.0) >> 56);
        format!("{}{}", rank(white, 'S'), rank(black, 's'))
    }

    /// The reserve field, `-` when nothing is left.
    pub fn reserve_fen(&self) -> String {
        let text: String = Color::ALL
            .into_iter()
            .flat_map(|c| self.available(c).map(move |p| p.to_fen_char(c)))
            .collect();
        if text.is_empty() {
            "-".to_string()
        } else {
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_removes_first_match_and_restore_reinserts() {
        let mut hand = Hand::new();
        for (c, p) in [
            (Color::White, Piece::Queen),
            (Color::White, Piece::Pawn),
            (Color::Black, Piece::Queen),
            (Color::Black, Piece::Pawn),
        ] {
            hand.push_back(c, p);
        }
        assert_eq!(hand.to_fen(), "QPqp");

        let index = hand.take(Color::Black, Piece::Queen);
        assert_eq!(index, Some(0));
        assert_eq!(hand.to_fen(), "QPp");
        hand.restore(Color::Black, 0, Piece::Queen);
        assert_eq!(hand.to_fen(), "QPqp");
        assert_eq!(hand.take(Color::White, Piece::Rook), None);
    }

    #[test]
    fn banked_pieces_go_to_the_front() {
        let mut hand = Hand::new();
        hand.push_front(Color::White, Piece::Bishop);
        hand.push_front(Color::White, Piece::Queen);
        assert_eq!(hand.to_fen(), "QB");
        assert_eq!(hand.pop_front(Color::White), Some(Piece::Queen));
        assert_eq!(hand.to_fen(), "B");
    }

    #[test]
    fn kinds_are_distinct_and_ordered() {
        let mut hand = Hand::new();
        hand.push_back(Color::Black, Piece::Queen);
        hand.push_back(Color::Black, Piece::Pawn);
        hand.push_back(Color::Black, Piece::Pawn);
        let kinds: Vec<Piece> = hand.kinds(Color::Black).collect();
        assert_eq!(kinds, vec![Piece::Pawn, Piece::Queen]);
        assert_eq!(hand.count(Color::Black, Piece::Pawn), 2);
        assert_eq!(hand.kinds(Color::White).count(), 0);
    }

    #[test]
    fn snapshot_is_sorted() {
        let mut hand = Hand::new();
        hand.push_back(Color::White, Piece::Queen);
        hand.push_back(Color::White, Piece::Pawn);
        let snapshot = HandSnapshot::from(&hand);
        assert_eq!(snapshot.white, vec![Piece::Pawn, Piece::Queen]);
        assert!(snapshot.black.is_empty());
    }

    #[test]
    fn gate_fields() {
        let mut gates = GateState::initial();
        assert_eq!(gates.markers_fen(), "SSSSSSSSssssssss");
        assert_eq!(gates.reserve_fen(), "EHeh");

        gates.set_eligible(Square::from_algebraic("g1").unwrap(), false);
        gates.set_eligible(Square::A8, false);
        gates.set_reserve(Color::White, Piece::Hawk, false);
        assert_eq!(gates.markers_fen(), "SSSSSS-S-sssssss");
        assert_eq!(gates.reserve_fen(), "Eeh");
        assert!(!gates.in_reserve(Color::White, Piece::Hawk));
        assert!(!gates.in_reserve(Color::White, Piece::Queen));

        let empty = GateState::default();
        assert_eq!(empty.reserve_fen(), "-");
        assert_eq!(empty.markers_fen(), "----------------");
        assert!(!empty.has_reserve());
    }
}
