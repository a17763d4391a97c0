//! FEN (Forsyth-Edwards Notation) tokenizing and validation.
//!
//! Three dialects are understood:
//! - standard: the usual six fields;
//! - drop: six fields, where the placement may carry a ninth `/` segment
//!   listing the pieces in hand and pieces may be suffixed with `~` to mark
//!   that they were promoted;
//! - gating: eight fields, with gate markers for the sixteen back-rank
//!   squares and the auxiliary pieces still in reserve inserted after the
//!   placement.
//!
//! Every rejection maps onto a numbered [`FenError`] so callers can report
//! a stable error code next to the message.

use crate::{Color, Piece, Rank, Square};
use serde::Serialize;
use thiserror::Error;

/// Field layout of a FEN string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FenDialect {
    #[default]
    Standard,
    Drop,
    Gating,
}

impl FenDialect {
    /// Number of space-separated fields.
    pub const fn field_count(self) -> usize {
        match self {
            FenDialect::Gating => 8,
            _ => 6,
        }
    }

    /// Starting position in this dialect.
    pub const fn start_fen(self) -> &'static str {
        match self {
            FenDialect::Standard => "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            FenDialect::Drop => "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR/ w KQkq - 0 1",
            FenDialect::Gating => {
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR SSSSSSSSssssssss EHeh w KQkq - 0 1"
            }
        }
    }
}

/// Errors that can occur when validating FEN strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN string must contain {expected} space-delimited fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("move number must be a positive integer: {0}")]
    FullmoveNumber(String),

    #[error("half move counter must be a non-negative integer: {0}")]
    HalfmoveClock(String),

    #[error("en-passant square is invalid: {0}")]
    EnPassantSquare(String),

    #[error("castling availability is invalid: {0}")]
    CastlingRights(String),

    #[error("side to move is invalid: {0}")]
    SideToMove(String),

    #[error("piece positions do not contain 8 '/'-delimited rows")]
    RowCount,

    #[error("piece positions are invalid [consecutive numbers]")]
    ConsecutiveDigits,

    #[error("piece positions are invalid [invalid piece '{0}']")]
    InvalidPiece(char),

    #[error("piece positions are invalid [row {0} does not span 8 squares]")]
    RowWidth(u8),

    #[error("illegal en-passant square for the side to move")]
    IllegalEnPassant,

    #[error("{0} has pieces on the board but no king")]
    MissingKing(Color),

    #[error("{0} has more than one king")]
    TooManyKings(Color),

    #[error("pieces in hand are invalid: {0}")]
    InvalidHand(String),

    #[error("gate markers are invalid: {0}")]
    GateMarkers(String),

    #[error("gate reserve is invalid: {0}")]
    GateReserve(String),
}

impl FenError {
    /// Stable error number reported by [`validate_fen`].
    pub const fn number(&self) -> u8 {
        match self {
            FenError::FieldCount { .. } => 1,
            FenError::FullmoveNumber(_) => 2,
            FenError::HalfmoveClock(_) => 3,
            FenError::EnPassantSquare(_) => 4,
            FenError::CastlingRights(_) => 5,
            FenError::SideToMove(_) => 6,
            FenError::RowCount => 7,
            FenError::ConsecutiveDigits => 8,
            FenError::InvalidPiece(_) => 9,
            FenError::RowWidth(_) => 10,
            FenError::IllegalEnPassant => 11,
            FenError::MissingKing(_) => 12,
            FenError::TooManyKings(_) => 13,
            FenError::InvalidHand(_) => 14,
            FenError::GateMarkers(_) => 15,
            FenError::GateReserve(_) => 16,
        }
    }
}

/// Outcome of [`validate_fen`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FenValidation {
    pub valid: bool,
    pub error_number: u8,
    pub error: String,
}

impl From<Result<(), FenError>> for FenValidation {
    fn from(result: Result<(), FenError>) -> Self {
        match result {
            Ok(()) => FenValidation {
                valid: true,
                error_number: 0,
                error: "No errors.".to_string(),
            },
            Err(e) => FenValidation {
                valid: false,
                error_number: e.number(),
                error: e.to_string(),
            },
        }
    }
}

/// Validates a FEN string without building a position.
///
/// `shuffle_castling` allows file letters in the castling field.
pub fn validate_fen(fen: &str, dialect: FenDialect, shuffle_castling: bool) -> FenValidation {
    FenRecord::parse(fen, dialect, shuffle_castling)
        .map(|_| ())
        .into()
}

/// A piece as read from the placement field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenPiece {
    pub piece: Piece,
    pub color: Color,
    pub promoted: bool,
}

/// Tokenized FEN data.
///
/// Castling letters are kept as text: binding them to rook squares needs
/// the board, which the engine owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenRecord {
    /// Board contents indexed by [`Square::index`].
    pub squares: [Option<FenPiece>; 64],
    /// Pieces in hand in FEN order (drop dialect).
    pub hand: Vec<(Piece, Color)>,
    /// Back-rank squares still eligible for gating (gating dialect).
    pub gate_markers: Vec<Square>,
    /// Auxiliary pieces still in reserve (gating dialect).
    pub gate_reserve: Vec<(Piece, Color)>,
    pub side_to_move: Color,
    pub castling: String,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl FenRecord {
    /// Tokenizes and validates a FEN string.
    pub fn parse(fen: &str, dialect: FenDialect, shuffle_castling: bool) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let expected = dialect.field_count();
        if fields.len() != expected {
            return Err(FenError::FieldCount {
                expected,
                found: fields.len(),
            });
        }

        // The trailing five fields sit at the same offset from the end in
        // every dialect.
        let tail = expected - 5;
        let side_field = fields[tail];
        let castling = fields[tail + 1];
        let ep_field = fields[tail + 2];
        let halfmove_field = fields[tail + 3];
        let fullmove_field = fields[tail + 4];

        let fullmove_number = parse_counter(fullmove_field)
            .filter(|&n| n > 0)
            .ok_or_else(|| FenError::FullmoveNumber(fullmove_field.to_string()))?;
        let halfmove_clock = parse_counter(halfmove_field)
            .ok_or_else(|| FenError::HalfmoveClock(halfmove_field.to_string()))?;

        let en_passant = match ep_field {
            "-" => None,
            text => match Square::from_algebraic(text) {
                Some(sq) if sq.rank() == Rank::R3 || sq.rank() == Rank::R6 => Some(sq),
                _ => return Err(FenError::EnPassantSquare(text.to_string())),
            },
        };

        validate_castling(castling, shuffle_castling)?;

        let mut side_chars = side_field.chars();
        let side_to_move = match (side_chars.next().and_then(Color::from_fen_char), side_chars.next()) {
            (Some(color), None) => color,
            _ => return Err(FenError::SideToMove(side_field.to_string())),
        };

        let (squares, hand) = parse_placement(fields[0], dialect)?;

        if let Some(ep) = en_passant {
            let expected_rank = match side_to_move {
                Color::White => Rank::R6,
                Color::Black => Rank::R3,
            };
            if ep.rank() != expected_rank {
                return Err(FenError::IllegalEnPassant);
            }
        }

        validate_kings(&squares)?;

        let (gate_markers, gate_reserve) = if dialect == FenDialect::Gating {
            (parse_gate_markers(fields[1])?, parse_gate_reserve(fields[2])?)
        } else {
            (Vec::new(), Vec::new())
        };

        Ok(FenRecord {
            squares,
            hand,
            gate_markers,
            gate_reserve,
            side_to_move,
            castling: castling.to_string(),
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }
}

fn parse_counter(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn validate_castling(castling: &str, shuffle_castling: bool) -> Result<(), FenError> {
    if castling == "-" {
        return Ok(());
    }
    let invalid = || FenError::CastlingRights(castling.to_string());

    if !shuffle_castling {
        // Subsequence of "KQkq".
        let mut rest = "KQkq".chars();
        for c in castling.chars() {
            if !rest.any(|r| r == c) {
                return Err(invalid());
            }
        }
        return Ok(());
    }

    let mut seen = Vec::with_capacity(4);
    let mut per_color = [0usize; 2];
    for c in castling.chars() {
        let letter_ok = matches!(c, 'K' | 'Q' | 'k' | 'q' | 'A'..='H' | 'a'..='h');
        if !letter_ok || seen.contains(&c) {
            return Err(invalid());
        }
        seen.push(c);
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        per_color[color.index()] += 1;
        if per_color[color.index()] > 2 {
            return Err(invalid());
        }
    }
    Ok(())
}

type Placement = ([Option<FenPiece>; 64], Vec<(Piece, Color)>);

fn parse_placement(placement: &str, dialect: FenDialect) -> Result<Placement, FenError> {
    let rows: Vec<&str> = placement.split('/').collect();
    let row_count_ok = match dialect {
        FenDialect::Drop => rows.len() == 8 || rows.len() == 9,
        _ => rows.len() == 8,
    };
    if !row_count_ok {
        return Err(FenError::RowCount);
    }

    let mut squares: [Option<FenPiece>; 64] = [None; 64];
    for (i, row) in rows.iter().take(8).enumerate() {
        let rank = 7 - i as u8;
        let mut file = 0u8;
        let mut previous_was_digit = false;
        let mut last_piece: Option<usize> = None;

        for c in row.chars() {
            if let Some(run) = c.to_digit(10) {
                if previous_was_digit {
                    return Err(FenError::ConsecutiveDigits);
                }
                if !(1..=8).contains(&run) {
                    return Err(FenError::InvalidPiece(c));
                }
                previous_was_digit = true;
                last_piece = None;
                file += run as u8;
                if file > 8 {
                    return Err(FenError::RowWidth(rank + 1));
                }
                continue;
            }
            previous_was_digit = false;

            if c == '~' {
                // Only directly after a piece, and only where promotions
                // are remembered.
                let index = match last_piece.take() {
                    Some(index) if dialect == FenDialect::Drop => index,
                    _ => return Err(FenError::InvalidPiece(c)),
                };
                if let Some(p) = squares[index].as_mut() {
                    p.promoted = true;
                }
                continue;
            }

            let (piece, color) = Piece::from_fen_char(c).ok_or(FenError::InvalidPiece(c))?;
            if piece.is_auxiliary() && dialect != FenDialect::Gating {
                return Err(FenError::InvalidPiece(c));
            }
            if file >= 8 {
                return Err(FenError::RowWidth(rank + 1));
            }
            let index = (rank * 8 + file) as usize;
            squares[index] = Some(FenPiece {
                piece,
                color,
                promoted: false,
            });
            last_piece = Some(index);
            file += 1;
        }

        if file != 8 {
            return Err(FenError::RowWidth(rank + 1));
        }
    }

    let mut hand = Vec::new();
    if let Some(segment) = rows.get(8) {
        for c in segment.chars() {
            match Piece::from_fen_char(c) {
                Some((piece, color)) if piece != Piece::King && !piece.is_auxiliary() => {
                    hand.push((piece, color))
                }
                _ => return Err(FenError::InvalidHand(segment.to_string())),
            }
        }
    }

    Ok((squares, hand))
}

fn validate_kings(squares: &[Option<FenPiece>; 64]) -> Result<(), FenError> {
    for color in Color::ALL {
        let mut kings = 0;
        let mut pieces = 0;
        for p in squares.iter().flatten().filter(|p| p.color == color) {
            pieces += 1;
            if p.piece == Piece::King {
                kings += 1;
            }
        }
        if kings > 1 {
            return Err(FenError::TooManyKings(color));
        }
        if kings == 0 && pieces > 0 {
            return Err(FenError::MissingKing(color));
        }
    }
    Ok(())
}

fn parse_gate_markers(field: &str) -> Result<Vec<Square>, FenError> {
    let invalid = || FenError::GateMarkers(field.to_string());
    let chars: Vec<char> = field.chars().collect();
    if chars.len() != 16 {
        return Err(invalid());
    }
    let mut eligible = Vec::new();
    for (i, c) in chars.into_iter().enumerate() {
        let (marker, rank) = if i < 8 { ('S', 0) } else { ('s', 7) };
        let square = Square::from_index(rank * 8 + (i % 8) as u8).ok_or_else(invalid)?;
        match c {
            '-' => {}
            c if c == marker => eligible.push(square),
            _ => return Err(invalid()),
        }
    }
    Ok(eligible)
}

fn parse_gate_reserve(field: &str) -> Result<Vec<(Piece, Color)>, FenError> {
    if field == "-" {
        return Ok(Vec::new());
    }
    let mut rest = "EHeh".chars();
    let mut reserve = Vec::new();
    for c in field.chars() {
        if !rest.any(|r| r == c) {
            return Err(FenError::GateReserve(field.to_string()));
        }
        if let Some(entry) = Piece::from_fen_char(c) {
            reserve.push(entry);
        }
    }
    if reserve.is_empty() {
        return Err(FenError::GateReserve(field.to_string()));
    }
    Ok(reserve)
}
