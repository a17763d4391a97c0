//! Zobrist hashing for position identification.
//!
//! A position's signature XORs random numbers associated with:
//! - each piece on each square (8 piece types x 2 colors x 64 squares)
//! - the side to move
//! - each castling right, keyed by its rook square
//! - the en passant file
//! - the count of each piece type in each hand
//! - gate eligibility per square and each auxiliary piece still in reserve
//! - the promoted marker per square
//!
//! Two positions that differ only in clocks or hand order share a signature,
//! which is what repetition counting wants.

use crate::Position;
use gatehouse_core::{Color, Piece, Square};

/// Hand counts beyond this share a key.
const MAX_HAND_COUNT: usize = 63;

/// Zobrist hash keys.
///
/// Generated using a fixed seed for reproducibility.
pub struct ZobristKeys {
    /// Keys for pieces: [piece][color][square]
    pub pieces: [[[u64; 64]; 2]; 8],
    /// Key for black to move (XOR when black to move).
    pub black_to_move: u64,
    /// Keys for castling rights: [color][rook square]
    pub castling: [[u64; 64]; 2],
    /// Keys for en passant file.
    pub en_passant: [u64; 8],
    /// Keys for hand contents: [color][piece][count]
    pub hand: [[[u64; MAX_HAND_COUNT + 1]; 5]; 2],
    /// Keys for gate-eligible squares.
    pub eligible: [u64; 64],
    /// Keys for reserve pieces: [color][auxiliary index]
    pub reserve: [[u64; 2]; 2],
    /// Keys for promoted markers.
    pub promoted: [u64; 64],
}

impl ZobristKeys {
    /// Initializes Zobrist keys using a simple PRNG.
    ///
    /// Uses a fixed seed for reproducibility across runs.
    pub const fn new() -> Self {
        // Simple xorshift64 PRNG for const initialization
        const fn next_random(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        let mut state = 0x9E3779B97F4A7C15u64; // Golden ratio seed
        let mut pieces = [[[0u64; 64]; 2]; 8];
        let mut castling = [[0u64; 64]; 2];
        let mut en_passant = [0u64; 8];
        let mut hand = [[[0u64; MAX_HAND_COUNT + 1]; 5]; 2];
        let mut eligible = [0u64; 64];
        let mut reserve = [[0u64; 2]; 2];
        let mut promoted = [0u64; 64];

        let mut piece = 0;
        while piece < 8 {
            let mut color = 0;
            while color < 2 {
                let mut square = 0;
                while square < 64 {
                    state = next_random(state);
                    pieces[piece][color][square] = state;
                    square += 1;
                }
                color += 1;
            }
            piece += 1;
        }

        state = next_random(state);
        let black_to_move = state;

        let mut color = 0;
        while color < 2 {
            let mut square = 0;
            while square < 64 {
                state = next_random(state);
                castling[color][square] = state;
                square += 1;
            }
            color += 1;
        }

        let mut i = 0;
        while i < 8 {
            state = next_random(state);
            en_passant[i] = state;
            i += 1;
        }

        let mut color = 0;
        while color < 2 {
            let mut piece = 0;
            while piece < 5 {
                // A count of zero contributes nothing.
                let mut count = 1;
                while count <= MAX_HAND_COUNT {
                    state = next_random(state);
                    hand[color][piece][count] = state;
                    count += 1;
                }
                piece += 1;
            }
            color += 1;
        }

        let mut square = 0;
        while square < 64 {
            state = next_random(state);
            eligible[square] = state;
            state = next_random(state);
            promoted[square] = state;
            square += 1;
        }

        let mut color = 0;
        while color < 2 {
            let mut i = 0;
            while i < 2 {
                state = next_random(state);
                reserve[color][i] = state;
                i += 1;
            }
            color += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
            hand,
            eligible,
            reserve,
            promoted,
        }
    }

    /// Returns the key for a piece on a square.
    #[inline]
    pub const fn piece_key(&self, piece: Piece, color: Color, square: Square) -> u64 {
        self.pieces[piece.index()][color.index()][square.index() as usize]
    }

    /// Returns the key for a castling right bound to `rook`.
    #[inline]
    pub const fn castling_key(&self, color: Color, rook: Square) -> u64 {
        self.castling[color.index()][rook.index() as usize]
    }

    /// Returns the key for an en passant file (0-7).
    #[inline]
    pub const fn en_passant_key(&self, file: usize) -> u64 {
        self.en_passant[file]
    }

    /// Returns the key for holding `count` pieces of one type.
    #[inline]
    pub fn hand_key(&self, color: Color, piece: Piece, count: usize) -> u64 {
        match self.hand[color.index()].get(piece.index()) {
            Some(counts) => counts[count.min(MAX_HAND_COUNT)],
            None => 0,
        }
    }
}

/// Global Zobrist keys (initialized at compile time).
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

/// Signature of a position for repetition counting.
pub fn signature(position: &Position) -> u64 {
    let keys = &ZOBRIST;
    let mut hash = 0u64;

    for (sq, piece, color) in position.board.pieces() {
        hash ^= keys.piece_key(piece, color, sq);
    }
    for sq in position.board.promoted() {
        hash ^= keys.promoted[sq.index() as usize];
    }
    if position.side_to_move == Color::Black {
        hash ^= keys.black_to_move;
    }
    for (color, _, rook) in position.castling.iter() {
        hash ^= keys.castling_key(color, rook);
    }
    if let Some(ep) = position.en_passant {
        hash ^= keys.en_passant_key(ep.file().index() as usize);
    }
    for color in Color::ALL {
        for piece in position.hand.kinds(color) {
            hash ^= keys.hand_key(color, piece, position.hand.count(color, piece));
        }
        for piece in position.gates.available(color) {
            if let Some(i) = piece.auxiliary_index() {
                hash ^= keys.reserve[color.index()][i];
            }
        }
    }
    for sq in position.gates.eligible() {
        hash ^= keys.eligible[sq.index() as usize];
    }

    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::VariantKind;

    fn signature_of(fen: &str, variant: VariantKind) -> u64 {
        signature(&Position::from_fen(fen, variant, false).unwrap())
    }

    #[test]
    fn zobrist_keys_are_nonzero() {
        // Most keys should be nonzero (statistically almost certain)
        assert_ne!(ZOBRIST.black_to_move, 0);
        assert_ne!(ZOBRIST.pieces[0][0][0], 0);
        assert_ne!(ZOBRIST.castling[0][0], 0);
        assert_ne!(ZOBRIST.reserve[1][1], 0);
    }

    #[test]
    fn zobrist_keys_are_unique() {
        // Check that piece keys are unique (sample check)
        let key1 = ZOBRIST.piece_key(Piece::Pawn, Color::White, Square::A1);
        let key2 = ZOBRIST.piece_key(Piece::Pawn, Color::White, Square::H1);
        let key3 = ZOBRIST.piece_key(Piece::Pawn, Color::Black, Square::A1);
        let key4 = ZOBRIST.piece_key(Piece::Hawk, Color::White, Square::A1);

        assert_ne!(key1, key2);
        assert_ne!(key1, key3);
        assert_ne!(key1, key4);
    }

    #[test]
    fn clocks_do_not_change_signature() {
        let a = signature_of("4k3/8/8/8/8/8/8/4K2R w K - 0 1", VariantKind::Standard);
        let b = signature_of("4k3/8/8/8/8/8/8/4K2R w K - 17 40", VariantKind::Standard);
        assert_eq!(a, b);
    }

    #[test]
    fn state_fields_change_signature() {
        let base = signature_of("4k3/8/8/8/8/8/8/4K2R w K - 0 1", VariantKind::Standard);
        let side = signature_of("4k3/8/8/8/8/8/8/4K2R b K - 0 1", VariantKind::Standard);
        let rights = signature_of("4k3/8/8/8/8/8/8/4K2R w - - 0 1", VariantKind::Standard);
        assert_ne!(base, side);
        assert_ne!(base, rights);
    }

    #[test]
    fn hand_counts_but_not_order() {
        let qp = signature_of("4k3/8/8/8/8/8/8/4K3/QP w - - 0 1", VariantKind::Crazyhouse);
        let pq = signature_of("4k3/8/8/8/8/8/8/4K3/PQ w - - 0 1", VariantKind::Crazyhouse);
        let ppq = signature_of("4k3/8/8/8/8/8/8/4K3/PPQ w - - 0 1", VariantKind::Crazyhouse);
        assert_eq!(qp, pq);
        assert_ne!(qp, ppq);
    }

    #[test]
    fn promoted_marker_changes_signature() {
        let plain = signature_of("4k3/8/8/8/8/8/8/Q3K3/ w - - 0 1", VariantKind::Crazyhouse);
        let promoted = signature_of("4k3/8/8/8/8/8/8/Q~3K3/ w - - 0 1", VariantKind::Crazyhouse);
        assert_ne!(plain, promoted);
    }

    #[test]
    fn gate_state_changes_signature() {
        let full = signature_of(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR SSSSSSSSssssssss EHeh w KQkq - 0 1",
            VariantKind::Seirawan,
        );
        let no_hawk = signature_of(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR SSSSSSSSssssssss Eeh w KQkq - 0 1",
            VariantKind::Seirawan,
        );
        let marker = signature_of(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR -SSSSSSSssssssss EHeh w KQkq - 0 1",
            VariantKind::Seirawan,
        );
        assert_ne!(full, no_hawk);
        assert_ne!(full, marker);
    }
}
