//! Shuffled starting arrangements, numbered 0 to 959.
//!
//! The number is decoded digit by digit: the light-squared bishop, the
//! dark-squared bishop, the queen among the six remaining squares, the
//! knight pair among the last five, and finally rook, king, rook on the
//! three squares left over. Arrangement 518 is the orthodox one.

use gatehouse_core::Piece;

/// Number of distinct arrangements.
pub const POSITION_COUNT: u16 = 960;

/// The orthodox arrangement, number 518.
pub const STANDARD_BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

/// Knight pairs among five empty squares, in numbering order.
const KNIGHT_PAIRS: [(usize, usize); 10] = [
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 4),
    (1, 2),
    (1, 3),
    (1, 4),
    (2, 3),
    (2, 4),
    (3, 4),
];

/// Back rank for arrangement `n`, a-file first. `None` if `n` is out of range.
pub fn back_rank(n: u16) -> Option<[Piece; 8]> {
    if n >= POSITION_COUNT {
        return None;
    }
    let mut rank: [Option<Piece>; 8] = [None; 8];
    let n = n as usize;

    rank[(n % 4) * 2 + 1] = Some(Piece::Bishop);
    rank[((n / 4) % 4) * 2] = Some(Piece::Bishop);

    let queen = (n / 16) % 6;
    let (first, second) = KNIGHT_PAIRS[n / 96];
    place_nth_empty(&mut rank, queen, Piece::Queen);
    // The second knight's index counts the first knight's square as empty.
    place_nth_empty(&mut rank, second, Piece::Knight);
    place_nth_empty(&mut rank, first, Piece::Knight);

    for piece in [Piece::Rook, Piece::King, Piece::Rook] {
        place_nth_empty(&mut rank, 0, piece);
    }

    let mut out = [Piece::Pawn; 8];
    for (slot, piece) in out.iter_mut().zip(rank) {
        *slot = piece?;
    }
    Some(out)
}

fn place_nth_empty(rank: &mut [Option<Piece>; 8], n: usize, piece: Piece) {
    if let Some(slot) = rank.iter_mut().filter(|s| s.is_none()).nth(n) {
        *slot = Some(piece);
    }
}

/// Number of the arrangement matching `rank`, if it is one of the 960.
pub fn position_number(rank: &[Piece; 8]) -> Option<u16> {
    (0..POSITION_COUNT).find(|&n| back_rank(n).as_ref() == Some(rank))
}
