//! Attack tables and lookups for all piece types.

use super::capability::{capability, Leap, ALL_DIRECTIONS, KNIGHT_OFFSETS};
use crate::Bitboard;
use gatehouse_core::{Color, Piece, Square};

/// Precomputed knight attack tables.
const KNIGHT_ATTACKS: [Bitboard; 64] = compute_leaper_attacks(&KNIGHT_OFFSETS);

/// Precomputed king attack tables.
const KING_ATTACKS: [Bitboard; 64] = compute_leaper_attacks(&ALL_DIRECTIONS);

/// Precomputed pawn attack tables [color][square].
const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    compute_leaper_attacks(&[(-1, 1), (1, 1)]),
    compute_leaper_attacks(&[(-1, -1), (1, -1)]),
];

/// Returns knight attacks from the given square.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

/// Returns king attacks from the given square.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Returns pawn attacks from the given square for the given color.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

/// Squares a leaper pattern reaches from `sq`.
#[inline]
pub fn leap_attacks(leap: Leap, sq: Square) -> Bitboard {
    match leap {
        Leap::None => Bitboard::EMPTY,
        Leap::Knight => knight_attacks(sq),
        Leap::King => king_attacks(sq),
    }
}

/// Squares reached by sliding along `directions`, stopping on (and
/// including) the first occupied square of each ray.
pub fn ray_attacks(sq: Square, directions: &[(i8, i8)], occupied: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &(df, dr) in directions {
        let mut current = sq;
        while let Some(next) = current.offset(df, dr) {
            attacks.set(next);
            if occupied.contains(next) {
                break;
            }
            current = next;
        }
    }
    attacks
}

/// All squares a piece on `sq` attacks.
pub fn piece_attacks(piece: Piece, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
    if piece == Piece::Pawn {
        return pawn_attacks(sq, color);
    }
    let cap = capability(piece);
    leap_attacks(cap.leap, sq) | ray_attacks(sq, cap.rays, occupied)
}

/// Computes leaper attacks for all squares at compile time.
const fn compute_leaper_attacks(offsets: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut attacks = [Bitboard::EMPTY; 64];
    let mut sq = 0i8;

    while sq < 64 {
        let rank = sq / 8;
        let file = sq % 8;
        let mut bb = 0u64;

        let mut i = 0;
        while i < offsets.len() {
            let (df, dr) = offsets[i];
            let f = file + df;
            let r = rank + dr;
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                bb |= 1u64 << (r * 8 + f);
            }
            i += 1;
        }

        attacks[sq as usize] = Bitboard(bb);
        sq += 1;
    }

    attacks
}
