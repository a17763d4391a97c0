//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1". The
//! variants add drops ("N@f3", "@e4" for a pawn) and gates ("Nf3/H",
//! "O-O/E", "O-O/Eh1").

use crate::movegen::{generate_moves, has_legal_move, in_check, make_move, unmake_move};
use crate::{MoveList, Position};
use gatehouse_core::{CastleSide, File, Move, MoveFlag, Piece, Rank, Square};
use thiserror::Error;

/// Error type for SAN parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanError {
    /// The SAN string is empty.
    #[error("empty SAN string")]
    Empty,
    /// The SAN string has invalid format.
    #[error("invalid SAN format: {0}")]
    InvalidFormat(String),
    /// No legal move matches the SAN.
    #[error("no legal move matches: {0}")]
    NoMatchingMove(String),
    /// Multiple legal moves match the SAN (ambiguous).
    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
}

/// Converts a move to SAN notation given the current position.
///
/// The position must be the state BEFORE the move is made.
/// The move must be legal in the given position.
pub fn move_to_san(position: &Position, m: &Move) -> String {
    let legal = generate_moves(position);
    let mut scratch = position.clone();
    let mut san = san_without_suffix(m, legal.as_slice());
    san.push_str(check_suffix(&mut scratch, m));
    san
}

/// SAN for every move of `legal`, which must be the full legal move list of
/// `position`.
pub fn san_list(position: &Position, legal: &MoveList) -> Vec<String> {
    let mut scratch = position.clone();
    legal
        .as_slice()
        .iter()
        .map(|m| {
            let mut san = san_without_suffix(m, legal.as_slice());
            san.push_str(check_suffix(&mut scratch, m));
            san
        })
        .collect()
}

/// SAN without the check or mate suffix.
pub(crate) fn san_without_suffix(m: &Move, legal: &[Move]) -> String {
    let mut san = String::new();

    if let MoveFlag::Castle { side, .. } = m.flag {
        san.push_str(side.san());
        if let Some(gate) = m.gate {
            san.push('/');
            san.push(gate.piece.san_char());
            // The king's origin is implied; the rook's origin is spelled out.
            if Some(gate.square) != m.from {
                san.push_str(&gate.square.to_algebraic());
            }
        }
        return san;
    }

    let Some(from) = m.from else {
        if m.piece != Piece::Pawn {
            san.push(m.piece.san_char());
        }
        san.push('@');
        san.push_str(&m.to.to_algebraic());
        return san;
    };

    if m.piece != Piece::Pawn {
        san.push(m.piece.san_char());
        san.push_str(&disambiguation(m, from, legal));
    }

    if m.is_capture() {
        if m.piece == Piece::Pawn {
            san.push(from.file().to_char());
        }
        san.push('x');
    }

    san.push_str(&m.to.to_algebraic());

    if let Some(promotion) = m.promotion {
        san.push('=');
        san.push(promotion.san_char());
    }

    if let Some(gate) = m.gate {
        san.push('/');
        san.push(gate.piece.san_char());
    }

    san
}

/// Shortest origin hint that tells `m` apart from same-type pieces reaching
/// the same square.
fn disambiguation(m: &Move, from: Square, legal: &[Move]) -> String {
    let mut rivals: Vec<Square> = legal
        .iter()
        .filter(|o| o.piece == m.piece && o.to == m.to && o.castle_side().is_none())
        .filter_map(|o| o.from)
        .filter(|&sq| sq != from)
        .collect();
    rivals.sort();
    rivals.dedup();

    if rivals.is_empty() {
        return String::new();
    }
    if !rivals.iter().any(|sq| sq.file() == from.file()) {
        return from.file().to_char().to_string();
    }
    if !rivals.iter().any(|sq| sq.rank() == from.rank()) {
        return from.rank().to_char().to_string();
    }
    from.to_algebraic()
}

fn check_suffix(position: &mut Position, m: &Move) -> &'static str {
    let undo = make_move(position, m);
    let suffix = if !in_check(position) {
        ""
    } else if has_legal_move(position) {
        "+"
    } else {
        "#"
    };
    unmake_move(position, m, undo);
    suffix
}

/// Parses a SAN string and returns the corresponding legal move.
///
/// Only canonical SAN is accepted, apart from check and annotation marks,
/// a `P@` pawn drop prefix and zeros in castling.
pub fn san_to_move(position: &Position, san: &str) -> Result<Move, SanError> {
    let legal = generate_moves(position);
    strict_match(&legal, san)
}

/// Parses SAN leniently: over-disambiguation, a missing `x` or `=`, and long
/// algebraic input such as `e2e4` or `e7e8q` are accepted.
pub fn san_to_move_sloppy(position: &Position, san: &str) -> Result<Move, SanError> {
    let legal = generate_moves(position);
    if let Ok(m) = strict_match(&legal, san) {
        return Ok(m);
    }
    let parsed = parse_san_components(san)?;
    let matching: Vec<Move> = legal
        .as_slice()
        .iter()
        .filter(|m| parsed.matches(m))
        .copied()
        .collect();
    single_match(matching, san)
}

fn strict_match(legal: &MoveList, san: &str) -> Result<Move, SanError> {
    let wanted = canonicalize(san);
    if wanted.is_empty() {
        return Err(SanError::Empty);
    }
    let matching: Vec<Move> = legal
        .as_slice()
        .iter()
        .filter(|m| san_without_suffix(m, legal.as_slice()) == wanted)
        .copied()
        .collect();
    single_match(matching, san)
}

fn single_match(matching: Vec<Move>, san: &str) -> Result<Move, SanError> {
    match matching.as_slice() {
        [] => Err(SanError::NoMatchingMove(san.to_string())),
        [m] => Ok(*m),
        _ => Err(SanError::AmbiguousMove(san.to_string())),
    }
}

fn strip_annotations(san: &str) -> &str {
    san.trim().trim_end_matches(['+', '#', '!', '?'])
}

fn canonicalize(san: &str) -> String {
    let san = strip_annotations(san);
    let san = san.strip_prefix("P@").map_or_else(|| san.to_string(), |rest| format!("@{}", rest));
    san.replace("0-0-0", "O-O-O").replace("0-0", "O-O")
}

/// Parsed components of a SAN string.
#[derive(Debug, Default)]
struct ParsedSan {
    piece: Option<Piece>,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to: Option<Square>,
    promotion: Option<Piece>,
    drop: bool,
    castle: Option<CastleSide>,
    gate: Option<(Piece, Option<Square>)>,
}

impl ParsedSan {
    fn matches(&self, m: &Move) -> bool {
        let gate_matches = match (self.gate, m.gate) {
            (None, None) => true,
            (Some((piece, square)), Some(gate)) => {
                piece == gate.piece && square.map_or(m.from == Some(gate.square), |sq| sq == gate.square)
            }
            _ => false,
        };
        if !gate_matches {
            return false;
        }

        if let Some(side) = self.castle {
            return m.castle_side() == Some(side);
        }
        if self.drop {
            return m.is_drop() && Some(m.piece) == self.piece && Some(m.to) == self.to;
        }

        let Some(from) = m.from else { return false };
        if Some(m.to) != self.to {
            return false;
        }
        if self.from_file.is_some_and(|f| from.file() != f)
            || self.from_rank.is_some_and(|r| from.rank() != r)
        {
            return false;
        }

        let piece_matches = match self.piece {
            Some(piece) => m.piece == piece && m.castle_side().is_none(),
            // A full origin square names the piece by itself.
            None if self.from_file.is_some() && self.from_rank.is_some() => true,
            None => m.piece == Piece::Pawn,
        };

        piece_matches && m.promotion == self.promotion
    }
}

fn parse_san_components(san: &str) -> Result<ParsedSan, SanError> {
    let text = strip_annotations(san);
    if text.is_empty() {
        return Err(SanError::Empty);
    }
    let invalid = || SanError::InvalidFormat(san.to_string());

    let mut parsed = ParsedSan::default();

    let (body, gate) = match text.split_once('/') {
        Some((body, gate)) => (body, Some(gate)),
        None => (text, None),
    };
    if let Some(gate) = gate {
        let mut chars = gate.chars();
        let piece = chars
            .next()
            .and_then(Piece::from_char)
            .filter(|p| p.is_auxiliary())
            .ok_or_else(invalid)?;
        let rest = chars.as_str();
        let square = if rest.is_empty() {
            None
        } else {
            Some(Square::from_algebraic(rest).ok_or_else(invalid)?)
        };
        parsed.gate = Some((piece, square));
    }

    match body {
        "O-O" | "0-0" => {
            parsed.castle = Some(CastleSide::Kingside);
            return Ok(parsed);
        }
        "O-O-O" | "0-0-0" => {
            parsed.castle = Some(CastleSide::Queenside);
            return Ok(parsed);
        }
        _ => {}
    }

    if let Some((piece, square)) = body.split_once('@') {
        parsed.drop = true;
        parsed.piece = match piece {
            "" => Some(Piece::Pawn),
            letter => {
                let mut chars = letter.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(san_letter(c).ok_or_else(invalid)?),
                    _ => return Err(invalid()),
                }
            }
        };
        parsed.to = Some(Square::from_algebraic(square).ok_or_else(invalid)?);
        return Ok(parsed);
    }

    let mut chars: Vec<char> = body
        .chars()
        .filter(|c| !matches!(c, 'x' | ':' | '-' | '='))
        .collect();

    if let Some(&c) = chars.first() {
        if c.is_ascii_uppercase() {
            parsed.piece = Some(san_letter(c).ok_or_else(invalid)?);
            chars.remove(0);
        }
    }

    // A destination always ends in a digit, so a trailing letter promotes.
    if let Some(&c) = chars.last() {
        if c.is_ascii_alphabetic() {
            let promotion = Piece::from_char(c)
                .filter(|p| !matches!(p, Piece::Pawn | Piece::King))
                .ok_or_else(invalid)?;
            parsed.promotion = Some(promotion);
            chars.pop();
        }
    }

    if chars.len() < 2 {
        return Err(invalid());
    }
    let n = chars.len();
    let to_file = File::from_char(chars[n - 2]).ok_or_else(invalid)?;
    let to_rank = Rank::from_char(chars[n - 1]).ok_or_else(invalid)?;
    parsed.to = Some(Square::new(to_file, to_rank));

    match &chars[..n - 2] {
        [] => {}
        [c] => {
            if let Some(file) = File::from_char(*c) {
                parsed.from_file = Some(file);
            } else {
                parsed.from_rank = Some(Rank::from_char(*c).ok_or_else(invalid)?);
            }
        }
        [f, r] => {
            parsed.from_file = Some(File::from_char(*f).ok_or_else(invalid)?);
            parsed.from_rank = Some(Rank::from_char(*r).ok_or_else(invalid)?);
        }
        _ => return Err(invalid()),
    }

    Ok(parsed)
}

/// Uppercase SAN piece letter.
fn san_letter(c: char) -> Option<Piece> {
    if c.is_ascii_uppercase() {
        Piece::from_char(c)
    } else {
        None
    }
}
