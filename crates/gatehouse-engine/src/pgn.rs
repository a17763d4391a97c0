//! PGN (Portable Game Notation) reading and writing.
//!
//! Writing produces the tag pairs in insertion order, a blank line, then
//! numbered move text wrapped greedily at whole move-number units. Reading
//! pulls out the tag pairs, strips comments, variations, NAGs, move numbers
//! and result tokens, and hands back the remaining SAN tokens for replay.
//!
//! Both directions take a newline token so PGN can be embedded in markup
//! (`<br />`) or other line conventions.

use gatehouse_core::{Color, FenError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::san::SanError;

/// Options for writing PGN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PgnOptions {
    /// Wrap move text so no line is longer than this; 0 disables wrapping.
    pub max_width: usize,
    /// Line separator.
    pub newline: String,
}

impl Default for PgnOptions {
    fn default() -> Self {
        PgnOptions {
            max_width: 0,
            newline: "\n".to_string(),
        }
    }
}

/// Options for reading PGN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PgnLoadOptions {
    /// Accept loosely written moves.
    pub sloppy: bool,
    /// Line separator used by the input.
    pub newline: String,
}

impl Default for PgnLoadOptions {
    fn default() -> Self {
        PgnLoadOptions {
            sloppy: false,
            newline: "\n".to_string(),
        }
    }
}

/// Error type for PGN loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PgnError {
    /// The `FEN` tag does not hold a valid position.
    #[error("invalid FEN tag: {0}")]
    InvalidFen(#[from] FenError),
    /// A move token could not be played.
    #[error("cannot play {token}: {source}")]
    IllegalMove {
        token: String,
        #[source]
        source: SanError,
    },
    /// A comment, variation or tag pair is never closed.
    #[error("unterminated {0}")]
    Unterminated(&'static str),
}

/// Tag pairs in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a tag. An existing tag keeps its position.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.0.push((key.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Removes a tag, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(index).1)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Writes a game as PGN.
///
/// `sans` is the move list from the starting position, whose side to move
/// and fullmove number are `first_color` and `first_number`.
pub fn write_pgn(
    headers: &Headers,
    sans: &[String],
    first_color: Color,
    first_number: u32,
    options: &PgnOptions,
) -> String {
    let newline = options.newline.as_str();
    let mut out = String::new();

    for (key, value) in headers.iter() {
        out.push_str(&format!("[{} \"{}\"]", key, escape(value)));
        out.push_str(newline);
    }
    if !headers.is_empty() && !sans.is_empty() {
        out.push_str(newline);
    }

    let mut units = move_units(sans, first_color, first_number);
    if let Some(result) = headers.get("Result") {
        units.push(result.to_string());
    }

    if options.max_width == 0 {
        out.push_str(&units.join(" "));
        return out;
    }

    let mut width = 0;
    for (i, unit) in units.iter().enumerate() {
        if i != 0 && width + unit.len() > options.max_width {
            if out.ends_with(' ') {
                out.pop();
            }
            out.push_str(newline);
            width = 0;
        } else if i != 0 {
            out.push(' ');
            width += 1;
        }
        out.push_str(unit);
        width += unit.len();
    }
    out
}

/// Groups moves into `N. white black` units.
fn move_units(sans: &[String], first_color: Color, first_number: u32) -> Vec<String> {
    let mut units = Vec::with_capacity(sans.len() / 2 + 1);
    let mut number = first_number;
    let mut rest = sans;

    if first_color == Color::Black {
        if let Some((first, tail)) = rest.split_first() {
            units.push(format!("{}. ... {}", number, first));
            number += 1;
            rest = tail;
        }
    }
    for pair in rest.chunks(2) {
        units.push(format!("{}. {}", number, pair.join(" ")));
        number += 1;
    }
    units
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Tag pairs and move tokens read from PGN text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPgn {
    pub headers: Headers,
    pub moves: Vec<String>,
}

/// Splits PGN text into tag pairs and SAN tokens.
///
/// Move legality is not checked here; replaying the tokens is up to the
/// caller.
pub fn parse_pgn(text: &str, newline: &str) -> Result<ParsedPgn, PgnError> {
    let normalized;
    let text = if newline.is_empty() || newline == "\n" {
        text
    } else {
        normalized = text.replace(newline, "\n");
        normalized.as_str()
    };

    let mut headers = Headers::new();
    let mut movetext = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if !chars.by_ref().any(|c| c == '}') {
                    return Err(PgnError::Unterminated("comment"));
                }
                movetext.push(' ');
            }
            ';' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
                movetext.push(' ');
            }
            '(' => {
                let mut depth = 1;
                while depth > 0 {
                    match chars.next() {
                        Some('(') => depth += 1,
                        Some(')') => depth -= 1,
                        Some('{') => {
                            if !chars.by_ref().any(|c| c == '}') {
                                return Err(PgnError::Unterminated("comment"));
                            }
                        }
                        Some(_) => {}
                        None => return Err(PgnError::Unterminated("variation")),
                    }
                }
                movetext.push(' ');
            }
            '[' => {
                let (key, value) = read_tag(&mut chars)?;
                if !key.is_empty() {
                    headers.set(&key, &value);
                }
                movetext.push(' ');
            }
            c => movetext.push(c),
        }
    }

    let moves = movetext
        .split_whitespace()
        .filter_map(move_token)
        .map(str::to_string)
        .collect();

    Ok(ParsedPgn { headers, moves })
}

/// Reads `Key "Value"]` after the opening bracket.
fn read_tag(chars: &mut std::str::Chars<'_>) -> Result<(String, String), PgnError> {
    let mut key = String::new();
    let mut value = String::new();
    let mut in_value = false;
    let mut seen_value = false;

    loop {
        let Some(c) = chars.next() else {
            return Err(PgnError::Unterminated("tag pair"));
        };
        if in_value {
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        value.push(escaped);
                    }
                }
                '"' => {
                    in_value = false;
                    seen_value = true;
                }
                c => value.push(c),
            }
            continue;
        }
        match c {
            ']' => break,
            '"' if !seen_value => in_value = true,
            c if c.is_whitespace() => {}
            c if !seen_value => key.push(c),
            _ => {}
        }
    }
    Ok((key, value))
}

/// The SAN part of a move text token, or `None` for tokens that carry no
/// move.
fn move_token(token: &str) -> Option<&str> {
    if matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*") || token.starts_with('$') {
        return None;
    }
    // Move numbers, possibly glued to the move: `12.`, `12...`, `12.e4`.
    let digits = token.len() - token.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    // A bare `...` marks a move list that starts with Black.
    let rest = if digits > 0 && token[digits..].starts_with('.') {
        token[digits..].trim_start_matches('.')
    } else {
        token.trim_start_matches('.')
    };
    (!rest.is_empty()).then_some(rest)
}
