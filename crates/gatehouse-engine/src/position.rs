//! Position representation.

use gatehouse_core::{CastleSide, Color, FenError, FenRecord, File, Piece, Square};

use crate::reserve::{GateState, Hand};
use crate::rules::{Variant, VariantKind};
use crate::Board;

/// Castling rights, each bound to the square of the rook it castles with.
///
/// Binding to a square rather than a flag is what lets the same code castle
/// in shuffled starting arrangements, where rooks need not start in the
/// corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CastlingRights {
    rooks: [[Option<Square>; 2]; 2],
}

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights {
        rooks: [[None; 2]; 2],
    };

    /// Rook square for a right, if the right is held.
    #[inline]
    pub const fn rook(self, color: Color, side: CastleSide) -> Option<Square> {
        self.rooks[color.index()][side.index()]
    }

    #[inline]
    pub fn set(&mut self, color: Color, side: CastleSide, rook: Square) {
        self.rooks[color.index()][side.index()] = Some(rook);
    }

    #[inline]
    pub fn remove(&mut self, color: Color, side: CastleSide) {
        self.rooks[color.index()][side.index()] = None;
    }

    /// Removes castling rights for a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.rooks[color.index()] = [None; 2];
    }

    /// Drops any right bound to `sq`: the rook moved away or was captured.
    pub fn remove_rook_square(&mut self, sq: Square) {
        for rook in self.rooks.iter_mut().flatten() {
            if *rook == Some(sq) {
                *rook = None;
            }
        }
    }

    pub fn is_empty(self) -> bool {
        self.rooks.iter().flatten().all(Option::is_none)
    }

    /// Held rights as (color, wing, rook square).
    pub fn iter(self) -> impl Iterator<Item = (Color, CastleSide, Square)> {
        Color::ALL.into_iter().flat_map(move |color| {
            CastleSide::ALL
                .into_iter()
                .filter_map(move |side| self.rook(color, side).map(|sq| (color, side, sq)))
        })
    }
}

/// Complete game state for one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub board: Board,

    /// The side to move.
    pub side_to_move: Color,

    pub castling: CastlingRights,

    /// En passant target square (if any).
    pub en_passant: Option<Square>,

    /// Halfmove clock for the 50-move rule.
    pub halfmove_clock: u32,

    /// Fullmove number (starts at 1, increments after Black's move).
    pub fullmove_number: u32,

    /// Pieces in hand (crazyhouse only).
    pub hand: Hand,

    /// Gate reserve and eligible squares (Seirawan only).
    pub gates: GateState,

    pub variant: VariantKind,

    /// Accept and write file letters for castling rights.
    pub chess960: bool,
}

impl Position {
    /// Creates an empty position: no pieces, White to move, no rights.
    pub fn empty(variant: VariantKind, chess960: bool) -> Self {
        Position {
            board: Board::empty(),
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hand: Hand::new(),
            gates: GateState::default(),
            variant,
            chess960,
        }
    }

    /// Creates the variant's standard starting position.
    pub fn startpos(variant: VariantKind) -> Self {
        let mut position = Self::empty(variant, false);
        position.setup_back_rank(&crate::chess960::STANDARD_BACK_RANK);
        position
    }

    /// Sets up a starting arrangement with the given back rank (a-file first)
    /// for both sides, clearing everything else.
    pub(crate) fn setup_back_rank(&mut self, back_rank: &[Piece; 8]) {
        let (variant, chess960) = (self.variant, self.chess960);
        *self = Self::empty(variant, chess960);
        for color in Color::ALL {
            for (file, &piece) in File::ALL.iter().zip(back_rank) {
                self.board
                    .place(piece, color, Square::new(*file, color.back_rank()));
                self.board
                    .place(Piece::Pawn, color, Square::new(*file, color.pawn_rank()));
            }
            for side in CastleSide::ALL {
                if let Some(rook) = self.outermost_rook(color, side) {
                    self.castling.set(color, side, rook);
                }
            }
        }
        if self.variant == VariantKind::Seirawan {
            self.gates = GateState::initial();
        }
    }

    /// Creates a position from a FEN string in the variant's dialect.
    pub fn from_fen(fen: &str, variant: VariantKind, chess960: bool) -> Result<Self, FenError> {
        let record = FenRecord::parse(fen, variant.dialect(), chess960)?;
        let mut position = Position::empty(variant, chess960);

        for sq in Square::all() {
            if let Some(p) = record.squares[sq.index() as usize] {
                position.board.place(p.piece, p.color, sq);
                position.board.set_promoted(sq, p.promoted);
            }
        }
        for &(piece, color) in &record.hand {
            position.hand.push_back(color, piece);
        }
        for &sq in &record.gate_markers {
            position.gates.set_eligible(sq, true);
        }
        for &(piece, color) in &record.gate_reserve {
            position.gates.set_reserve(color, piece, true);
        }

        position.side_to_move = record.side_to_move;
        position.en_passant = record.en_passant;
        position.halfmove_clock = record.halfmove_clock;
        position.fullmove_number = record.fullmove_number;

        if record.castling != "-" {
            for c in record.castling.chars() {
                position.bind_castling_letter(c);
            }
        }

        Ok(position)
    }

    /// Binds one castling letter to a rook. Letters without a matching
    /// king and rook on the back rank are ignored.
    fn bind_castling_letter(&mut self, c: char) {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let Some(king) = self.castling_king(color) else {
            tracing::debug!("ignoring castling right {}: no king on the back rank", c);
            return;
        };

        let bound = match c.to_ascii_lowercase() {
            'k' => self
                .outermost_rook(color, CastleSide::Kingside)
                .map(|sq| (CastleSide::Kingside, sq)),
            'q' => self
                .outermost_rook(color, CastleSide::Queenside)
                .map(|sq| (CastleSide::Queenside, sq)),
            letter => File::from_char(letter).and_then(|file| {
                let sq = Square::new(file, color.back_rank());
                let side = match file.cmp(&king.file()) {
                    std::cmp::Ordering::Greater => CastleSide::Kingside,
                    std::cmp::Ordering::Less => CastleSide::Queenside,
                    std::cmp::Ordering::Equal => return None,
                };
                (self.board.get(sq) == Some((Piece::Rook, color))).then_some((side, sq))
            }),
        };

        match bound {
            Some((side, sq)) => self.castling.set(color, side, sq),
            None => tracing::debug!("ignoring castling right {}: no rook to bind", c),
        }
    }

    /// King square of `color` if it stands on its back rank.
    pub(crate) fn castling_king(&self, color: Color) -> Option<Square> {
        self.board
            .king_square(color)
            .filter(|k| k.rank() == color.back_rank())
    }

    /// The rook nearest the board edge on one wing of the king.
    pub(crate) fn outermost_rook(&self, color: Color, side: CastleSide) -> Option<Square> {
        let king = self.castling_king(color)?;
        let rank = color.back_rank();
        let files: Box<dyn Iterator<Item = &File>> = match side {
            CastleSide::Kingside => Box::new(File::ALL.iter().rev().take_while(move |f| **f > king.file())),
            CastleSide::Queenside => Box::new(File::ALL.iter().take_while(move |f| **f < king.file())),
        };
        files
            .map(|&f| Square::new(f, rank))
            .find(|&sq| self.board.get(sq) == Some((Piece::Rook, color)))
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = self.placement(true);
        match self.variant {
            VariantKind::Crazyhouse => {
                fen.push('/');
                fen.push_str(&self.hand.to_fen());
            }
            VariantKind::Seirawan => {
                fen.push(' ');
                fen.push_str(&self.gates.markers_fen());
                fen.push(' ');
                fen.push_str(&self.gates.reserve_fen());
            }
            VariantKind::Standard => {}
        }

        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic());
        format!(
            "{} {} {} {} {} {}",
            fen,
            self.side_to_move.to_fen_char(),
            self.castling_fen(),
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// The placement field, rank 8 first. `~` markers are written only when
    /// `promotion_markers` is set.
    pub fn placement(&self, promotion_markers: bool) -> String {
        let mut fen = String::with_capacity(72);
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                let sq = Square::new(File::ALL[file as usize], gatehouse_core::Rank::ALL[rank as usize]);
                match self.board.get(sq) {
                    Some((piece, color)) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.to_fen_char(color));
                        if promotion_markers && self.board.is_promoted(sq) {
                            fen.push('~');
                        }
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }
        fen
    }

    /// Castling field. Rights bound to the outermost rook use `K`/`Q`,
    /// others name the rook's file.
    pub fn castling_fen(&self) -> String {
        let mut s = String::new();
        for (color, side, rook) in self.castling.iter() {
            let c = if self.outermost_rook(color, side) == Some(rook) {
                match side {
                    CastleSide::Kingside => 'k',
                    CastleSide::Queenside => 'q',
                }
            } else {
                rook.file().to_char()
            };
            s.push(match color {
                Color::White => c.to_ascii_uppercase(),
                Color::Black => c,
            });
        }
        if s.is_empty() {
            s.push('-');
        }
        s
    }

    /// The rules of this position's variant.
    #[inline]
    pub fn rules(&self) -> &'static dyn Variant {
        self.variant.rules()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos(VariantKind::Standard)
    }
}
