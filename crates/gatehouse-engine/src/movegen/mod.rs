//! Move generation.
//!
//! Pseudo-legal moves come from the capability table (leaper patterns and
//! ray directions per piece type) plus the pawn, castling and variant
//! hooks. Legality is decided by playing each candidate on a scratch copy of
//! the position with [`make_move`] and testing the mover's king before
//! [`unmake_move`] restores it.

pub mod attacks;
pub mod capability;
pub mod castling;
mod make;
pub mod perft;

use crate::{Bitboard, Position};
use gatehouse_core::{Color, Move, MoveFlag, Piece, Square};

pub use attacks::{king_attacks, knight_attacks, pawn_attacks, piece_attacks, ray_attacks};
pub use make::{make_move, unmake_move, Captured, Undo};

use capability::{capability, Leap, ALL_DIRECTIONS};

/// A growable list of moves.
///
/// Drops and gated moves can push a position well past the orthodox
/// maximum of 218 moves, so the list is heap-backed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MoveList {
    moves: Vec<Move>,
}

impl MoveList {
    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList { moves: Vec::new() }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        self.moves.push(m);
    }

    /// Returns the number of moves.
    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Returns true if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    /// Clears the move list.
    #[inline]
    pub fn clear(&mut self) {
        self.moves.clear();
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        self.moves.retain(f);
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates all legal moves for the given position.
///
/// Board moves come first (in square order of the moving piece), then
/// drops.
pub fn generate_moves(position: &Position) -> MoveList {
    let mut scratch = position.clone();
    legal_moves_in_place(&mut scratch, None)
}

/// Generates the legal moves of the piece standing on `from`.
pub fn generate_moves_from(position: &Position, from: Square) -> MoveList {
    let mut scratch = position.clone();
    legal_moves_in_place(&mut scratch, Some(from))
}

/// Legal moves computed by make/unmake on `position` itself, which is left
/// unchanged.
pub(crate) fn legal_moves_in_place(position: &mut Position, from: Option<Square>) -> MoveList {
    let mut moves = MoveList::new();
    generate_pseudo_legal(position, from, &mut moves);
    let us = position.side_to_move;
    moves.retain(|m| is_legal_in_place(position, m, us));
    moves
}

fn is_legal_in_place(position: &mut Position, m: &Move, us: Color) -> bool {
    let undo = make_move(position, m);
    let legal = !is_king_attacked(position, us);
    unmake_move(position, m, undo);
    legal
}

/// Returns true if the side to move has at least one legal move.
pub fn has_legal_move(position: &Position) -> bool {
    let mut moves = MoveList::new();
    generate_pseudo_legal(position, None, &mut moves);
    let us = position.side_to_move;
    let mut scratch = position.clone();
    moves
        .as_slice()
        .iter()
        .any(|m| is_legal_in_place(&mut scratch, m, us))
}

/// Generates moves that obey piece movement but may leave the mover's king
/// attacked. With `from` set, only that square's piece is considered and
/// drops are skipped.
pub fn generate_pseudo_legal(position: &Position, from: Option<Square>, moves: &mut MoveList) {
    let us = position.side_to_move;
    let rules = position.rules();

    let mut movers = position.board.occupied_by(us);
    if let Some(sq) = from {
        movers &= Bitboard::from_square(sq);
    }

    let mut base = MoveList::new();
    for sq in movers {
        match position.board.get(sq) {
            Some((Piece::Pawn, _)) => generate_pawn_moves(position, sq, &mut base),
            Some((Piece::King, _)) => {
                generate_piece_moves(position, sq, Piece::King, &mut base);
                castling::generate_castling_moves(position, &mut base);
            }
            Some((piece, _)) => generate_piece_moves(position, sq, piece, &mut base),
            None => {}
        }
    }

    for m in base {
        rules.expand_move(position, m, moves);
    }
    if from.is_none() {
        rules.generate_drops(position, moves);
    }
}

/// Generates pseudo-legal pawn moves for the pawn on `from`.
fn generate_pawn_moves(position: &Position, from: Square, moves: &mut MoveList) {
    let us = position.side_to_move;
    let them = us.opposite();
    let dir = us.pawn_direction();
    let promotions = position.rules().promotion_pieces(position, us);

    let mut push = |m: Move| {
        if m.to.rank() == us.promotion_rank() {
            for &piece in promotions {
                moves.push(m.with_promotion(piece));
            }
        } else {
            moves.push(m);
        }
    };

    // Pushes
    if let Some(one) = from.offset(0, dir) {
        if position.board.get(one).is_none() {
            push(Move::new(Piece::Pawn, us, from, one));
            if from.rank() == us.pawn_rank() {
                if let Some(two) = one.offset(0, dir) {
                    if position.board.get(two).is_none() {
                        push(Move::new(Piece::Pawn, us, from, two).with_flag(MoveFlag::DoublePush));
                    }
                }
            }
        }
    }

    // Captures
    for to in pawn_attacks(from, us) {
        match position.board.get(to) {
            Some((piece, color)) if color == them => {
                push(Move::new(Piece::Pawn, us, from, to).with_capture(piece));
            }
            None if position.en_passant == Some(to) => {
                let victim = to.offset(0, -dir).and_then(|sq| position.board.get(sq));
                if victim == Some((Piece::Pawn, them)) {
                    push(
                        Move::new(Piece::Pawn, us, from, to)
                            .with_capture(Piece::Pawn)
                            .with_flag(MoveFlag::EnPassant),
                    );
                }
            }
            _ => {}
        }
    }
}

/// Generates pseudo-legal moves for a non-pawn piece.
fn generate_piece_moves(position: &Position, from: Square, piece: Piece, moves: &mut MoveList) {
    let us = position.side_to_move;
    let targets = piece_attacks(piece, us, from, position.board.occupied())
        & !position.board.occupied_by(us);
    for to in targets {
        let mut m = Move::new(piece, us, from, to);
        if let Some((captured, _)) = position.board.get(to) {
            m = m.with_capture(captured);
        }
        moves.push(m);
    }
}

/// Returns true if the given square is attacked by the given color.
pub fn is_square_attacked(position: &Position, sq: Square, by_color: Color) -> bool {
    let board = &position.board;
    let theirs = board.occupied_by(by_color);

    // Pawn attacks
    if (pawn_attacks(sq, by_color.opposite()) & theirs)
        .into_iter()
        .any(|s| board.get(s) == Some((Piece::Pawn, by_color)))
    {
        return true;
    }

    // Leapers
    for leap in [Leap::Knight, Leap::King] {
        if (attacks::leap_attacks(leap, sq) & theirs)
            .into_iter()
            .filter_map(|s| board.get(s))
            .any(|(piece, _)| piece != Piece::Pawn && capability(piece).leap == leap)
        {
            return true;
        }
    }

    // Sliders: the first piece on each ray attacks if it slides that way.
    let occupied = board.occupied();
    for &(df, dr) in &ALL_DIRECTIONS {
        let mut current = sq;
        while let Some(next) = current.offset(df, dr) {
            if occupied.contains(next) {
                if let Some((piece, color)) = board.get(next) {
                    if color == by_color && capability(piece).rays.contains(&(-df, -dr)) {
                        return true;
                    }
                }
                break;
            }
            current = next;
        }
    }

    false
}

/// Returns true if the king of the given color is in check.
pub fn is_king_attacked(position: &Position, king_color: Color) -> bool {
    match position.board.king_square(king_color) {
        Some(king_sq) => is_square_attacked(position, king_sq, king_color.opposite()),
        None => false,
    }
}

/// Returns true if the side to move is in check.
pub fn in_check(position: &Position) -> bool {
    is_king_attacked(position, position.side_to_move)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::VariantKind;
    use gatehouse_core::{File, Rank};

    fn position(fen: &str) -> Position {
        Position::from_fen(fen, VariantKind::Standard, false).unwrap()
    }

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn movelist_push_and_iterate() {
        let mut list = MoveList::new();
        assert!(list.is_empty());

        let e2 = Square::new(File::E, Rank::R2);
        let e4 = Square::new(File::E, Rank::R4);
        let d2 = Square::new(File::D, Rank::R2);
        let d4 = Square::new(File::D, Rank::R4);

        let m1 = Move::new(Piece::Pawn, Color::White, e2, e4);
        let m2 = Move::new(Piece::Pawn, Color::White, d2, d4);

        list.push(m1);
        list.push(m2);

        assert_eq!(list.len(), 2);
        assert_eq!(list[0], m1);
        assert_eq!(list[1], m2);
    }

    #[test]
    fn movelist_clear_and_retain() {
        let mut list = MoveList::default();
        let e2 = sq("e2");
        list.push(Move::new(Piece::Pawn, Color::White, e2, sq("e3")));
        list.push(Move::new(Piece::Pawn, Color::White, e2, sq("e4")));
        list.push(Move::new(Piece::Pawn, Color::White, sq("e3"), sq("e4")));

        list.retain(|m| m.from == Some(e2));
        assert_eq!(list.len(), 2);

        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn generate_moves_startpos() {
        let position = Position::startpos(VariantKind::Standard);
        let moves = generate_moves(&position);
        assert_eq!(moves.len(), 20); // 16 pawn moves + 4 knight moves
    }

    #[test]
    fn moves_from_one_square() {
        let position = Position::startpos(VariantKind::Standard);
        assert_eq!(generate_moves_from(&position, sq("g1")).len(), 2);
        assert_eq!(generate_moves_from(&position, sq("e4")).len(), 0);
        assert_eq!(generate_moves_from(&position, sq("e7")).len(), 0);
    }

    #[test]
    fn is_square_attacked_startpos() {
        let position = Position::startpos(VariantKind::Standard);
        assert!(is_square_attacked(&position, sq("e3"), Color::White));
        assert!(!is_square_attacked(&position, sq("e4"), Color::White));
        assert!(is_square_attacked(&position, sq("f6"), Color::Black));
    }

    #[test]
    fn is_king_attacked_startpos() {
        let position = Position::startpos(VariantKind::Standard);
        assert!(!is_king_attacked(&position, Color::White));
        assert!(!is_king_attacked(&position, Color::Black));
        assert!(!in_check(&position));
    }

    #[test]
    fn compound_pieces_give_check() {
        let hawk = Position::from_fen(
            "4k3/8/3H4/8/8/8/8/4K3 ---------------- - b - - 0 1",
            VariantKind::Seirawan,
            false,
        )
        .unwrap();
        // d6 hits e8 with the knight jump.
        assert!(in_check(&hawk));

        let elephant = Position::from_fen(
            "4k3/8/8/8/8/8/8/E3K3 ---------------- - b - - 0 1",
            VariantKind::Seirawan,
            false,
        )
        .unwrap();
        assert!(!in_check(&elephant));
        assert!(is_square_attacked(&elephant, sq("a8"), Color::White));
        assert!(is_square_attacked(&elephant, sq("b3"), Color::White));
        assert!(!is_square_attacked(&elephant, sq("b2"), Color::White));
    }

    #[test]
    fn en_passant() {
        let position = position("rnbqkbnr/pppp1ppp/8/4pP2/8/8/PPPPP1PP/RNBQKBNR w KQkq e6 0 1");
        let moves = generate_moves(&position);
        assert!(moves.as_slice().iter().any(|m| m.flag == MoveFlag::EnPassant));
    }

    #[test]
    fn promotion() {
        let position = position("8/P7/8/8/8/8/8/4K2k w - - 0 1");
        let moves = generate_moves(&position);
        let promo_count = moves
            .as_slice()
            .iter()
            .filter(|m| m.promotion.is_some())
            .count();
        assert_eq!(promo_count, 4);
    }

    #[test]
    fn pinned_piece_cannot_move() {
        let position = position("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(generate_moves_from(&position, sq("e2")).is_empty());
    }

    #[test]
    fn checkmate_has_no_legal_move() {
        let mate = position("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert!(in_check(&mate));
        assert!(!has_legal_move(&mate));
        assert!(has_legal_move(&Position::startpos(VariantKind::Standard)));
    }

    #[test]
    fn check_evasions_include_drops() {
        let position = Position::from_fen(
            "rnb1kb1r/ppp1pppp/5n2/8/7q/2N2P2/PPPPN1PP/R1BQKB1R/Pp w KQkq - 10 6",
            VariantKind::Crazyhouse,
            false,
        )
        .unwrap();
        let moves: Vec<String> = generate_moves(&position)
            .as_slice()
            .iter()
            .map(|m| m.to_long_algebraic())
            .collect();
        assert_eq!(moves, vec!["e2g3", "g2g3", "P@f2", "P@g3"]);
    }
}
