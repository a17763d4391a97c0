//! How each piece type moves.
//!
//! Every non-pawn piece is a combination of one leaper pattern and a set of
//! ray directions. Compound pieces fall out of the table: a Hawk is the
//! knight pattern plus diagonal rays, an Elephant the knight pattern plus
//! orthogonal rays. Pawns are asymmetric and handled by the generator
//! directly.

use gatehouse_core::Piece;

/// Single-step jump pattern of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leap {
    None,
    Knight,
    King,
}

impl Leap {
    /// (file, rank) offsets of the pattern.
    pub const fn offsets(self) -> &'static [(i8, i8)] {
        match self {
            Leap::None => &[],
            Leap::Knight => &KNIGHT_OFFSETS,
            Leap::King => &ALL_DIRECTIONS,
        }
    }
}

/// Movement of one piece type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    pub leap: Leap,
    /// Directions the piece slides along until blocked.
    pub rays: &'static [(i8, i8)],
}

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

pub const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

pub const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Indexed by [`Piece::index`].
const CAPABILITIES: [Capability; 8] = [
    // Pawn
    Capability {
        leap: Leap::None,
        rays: &[],
    },
    // Knight
    Capability {
        leap: Leap::Knight,
        rays: &[],
    },
    // Bishop
    Capability {
        leap: Leap::None,
        rays: &DIAGONAL,
    },
    // Rook
    Capability {
        leap: Leap::None,
        rays: &ORTHOGONAL,
    },
    // Queen
    Capability {
        leap: Leap::None,
        rays: &ALL_DIRECTIONS,
    },
    // King
    Capability {
        leap: Leap::King,
        rays: &[],
    },
    // Hawk
    Capability {
        leap: Leap::Knight,
        rays: &DIAGONAL,
    },
    // Elephant
    Capability {
        leap: Leap::Knight,
        rays: &ORTHOGONAL,
    },
];

#[inline]
pub const fn capability(piece: Piece) -> &'static Capability {
    &CAPABILITIES[piece.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compounds_combine_knight_and_slider() {
        let hawk = capability(Piece::Hawk);
        assert_eq!(hawk.leap, capability(Piece::Knight).leap);
        assert_eq!(hawk.rays, capability(Piece::Bishop).rays);

        let elephant = capability(Piece::Elephant);
        assert_eq!(elephant.leap, Leap::Knight);
        assert_eq!(elephant.rays, capability(Piece::Rook).rays);
    }

    #[test]
    fn direction_sets_are_symmetric() {
        for piece in Piece::ALL {
            let cap = capability(piece);
            for &(df, dr) in cap.rays.iter().chain(cap.leap.offsets()) {
                assert!(
                    cap.rays.contains(&(-df, -dr)) || cap.leap.offsets().contains(&(-df, -dr)),
                    "{:?} {:?}",
                    piece,
                    (df, dr)
                );
            }
        }
    }
}
