//! Full game management with history tracking.
//!
//! The [`Game`] struct provides complete game state management including:
//! - Move history with SAN records and exact undo
//! - Position signatures for repetition detection
//! - Draw, mate and stalemate predicates
//! - FEN and PGN loading and export, PGN tag pairs
//! - Board editing and shuffled starting arrangements

use std::collections::HashMap;

use gatehouse_core::{
    validate_fen, CastleSide, Color, FenError, FenValidation, File, Gate, Move, Piece, Rank,
    Square,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chess960;
use crate::movegen::castling::castling_move;
use crate::movegen::perft::{perft, perft_divide};
use crate::movegen::{
    has_legal_move, in_check, is_king_attacked, make_move, unmake_move, Undo,
};
use crate::options::GameOptions;
use crate::pgn::{parse_pgn, write_pgn, Headers, PgnError, PgnLoadOptions, PgnOptions};
use crate::reserve::HandSnapshot;
use crate::rules::{DrawReason, GameResult, VariantKind};
use crate::san::{move_to_san, san_list, san_to_move, san_to_move_sloppy, SanError};
use crate::zobrist::signature;
use crate::Position;

/// Error type for game operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The move is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),
    /// The SAN string could not be resolved to a legal move.
    #[error("invalid SAN: {0}")]
    InvalidSan(#[from] SanError),
    /// A square name could not be parsed.
    #[error("invalid square: {0}")]
    InvalidSquare(String),
    /// The FEN string was rejected.
    #[error("invalid FEN: {0}")]
    InvalidFen(#[from] FenError),
    /// Shuffled arrangements are numbered 0 to 959.
    #[error("no starting arrangement numbered {0}")]
    InvalidPositionNumber(u16),
    /// The piece does not exist in this variant.
    #[error("{0} is not used in this variant")]
    UnsupportedPiece(Piece),
    /// A PGN text could not be loaded.
    #[error(transparent)]
    Pgn(#[from] PgnError),
}

/// A played or playable move, as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub color: Color,
    /// Origin square, `None` for drops.
    pub from: Option<Square>,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub promotion: Option<Piece>,
    /// Auxiliary piece placed behind the move.
    pub gate: Option<Gate>,
    pub castle: Option<CastleSide>,
    pub drop: bool,
    pub en_passant: bool,
    pub san: String,
}

impl MoveRecord {
    fn new(m: &Move, san: String) -> Self {
        MoveRecord {
            color: m.color,
            from: m.from,
            to: m.to,
            piece: m.piece,
            captured: m.captured,
            promotion: m.promotion,
            gate: m.gate,
            castle: m.castle_side(),
            drop: m.is_drop(),
            en_passant: m.flag == gatehouse_core::MoveFlag::EnPassant,
            san,
        }
    }
}

/// A move given by its squares rather than in SAN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDescription {
    /// Origin square, `None` for a drop.
    pub from: Option<Square>,
    /// Destination. For castling this may be the king's destination or the
    /// square of the rook it castles with.
    pub to: Square,
    /// Moving or dropped piece. Drops default to a pawn.
    pub piece: Option<Piece>,
    /// Required when the move promotes; ignored otherwise.
    pub promotion: Option<Piece>,
    /// Auxiliary piece to gate behind the move.
    pub gate: Option<Piece>,
    /// Where the gated piece goes; defaults to the mover's origin.
    pub gate_square: Option<Square>,
}

impl MoveDescription {
    pub fn new(from: Square, to: Square) -> Self {
        MoveDescription {
            from: Some(from),
            to,
            piece: None,
            promotion: None,
            gate: None,
            gate_square: None,
        }
    }

    pub fn drop(piece: Piece, to: Square) -> Self {
        MoveDescription {
            from: None,
            piece: Some(piece),
            ..Self::new(to, to)
        }
    }

    pub fn with_promotion(mut self, piece: Piece) -> Self {
        self.promotion = Some(piece);
        self
    }

    pub fn with_gate(mut self, piece: Piece, square: Option<Square>) -> Self {
        self.gate = Some(piece);
        self.gate_square = square;
        self
    }

    /// Parses an origin and destination such as `("e2", "e4")`. An origin of
    /// `"@"` describes a pawn drop.
    pub fn from_squares(from: &str, to: &str) -> Result<Self, GameError> {
        let to = parse_square(to)?;
        if from == "@" {
            return Ok(Self::drop(Piece::Pawn, to));
        }
        Ok(Self::new(parse_square(from)?, to))
    }

    fn matches(&self, m: &Move, allow_rook_square: bool) -> bool {
        if self.from != m.from {
            return false;
        }
        if m.is_drop() {
            return m.to == self.to && m.piece == self.piece.unwrap_or(Piece::Pawn);
        }
        if self.piece.is_some_and(|p| p != m.piece) {
            return false;
        }
        let to_matches = match m.flag {
            gatehouse_core::MoveFlag::Castle { rook, .. } if allow_rook_square => rook == self.to,
            _ => m.to == self.to,
        };
        if !to_matches || (m.promotion.is_some() && m.promotion != self.promotion) {
            return false;
        }
        match (self.gate, m.gate) {
            (None, None) => true,
            (Some(piece), Some(gate)) => {
                piece == gate.piece && gate.square == self.gate_square.or(m.from).unwrap_or(m.to)
            }
            _ => false,
        }
    }
}

/// What [`Game::make_move`] accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveInput {
    San(String),
    Structured(MoveDescription),
}

impl From<&str> for MoveInput {
    fn from(san: &str) -> Self {
        MoveInput::San(san.to_string())
    }
}

impl From<String> for MoveInput {
    fn from(san: String) -> Self {
        MoveInput::San(san)
    }
}

impl From<MoveDescription> for MoveInput {
    fn from(description: MoveDescription) -> Self {
        MoveInput::Structured(description)
    }
}

/// Options for [`Game::moves_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveOptions {
    /// Only moves starting on this square. Drops have no origin and are
    /// never included.
    pub square: Option<Square>,
    /// Return full records instead of SAN strings.
    pub verbose: bool,
}

/// Result of [`Game::moves_with`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MoveListing {
    San(Vec<String>),
    Verbose(Vec<MoveRecord>),
}

/// The occupant of a square in [`Game::board`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoardCell {
    #[serde(rename = "type")]
    pub piece: Piece,
    pub color: Color,
}

#[derive(Debug, Clone)]
struct HistoryEntry {
    mv: Move,
    undo: Undo,
    record: MoveRecord,
}

/// A chess game with history tracking.
///
/// Unlike [`Position`], which represents a single board state, `Game` tracks
/// the move history needed for undo and repetition detection, PGN tag pairs,
/// and the position the game started from.
#[derive(Debug, Clone)]
pub struct Game {
    /// Current position.
    position: Position,
    /// Position the history starts from.
    start: Position,
    /// Played moves, oldest first.
    history: Vec<HistoryEntry>,
    /// Occurrences of each position signature since the start.
    repetitions: HashMap<u64, u32>,
    headers: Headers,
    options: GameOptions,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::for_variant(VariantKind::Standard)
    }

    /// Creates a new game of `variant` from its starting position.
    pub fn for_variant(variant: VariantKind) -> Self {
        Self::from_position(variant.rules().initial_position(), GameOptions::new(variant))
    }

    /// Creates a game as described by `options`.
    pub fn with_options(options: GameOptions) -> Result<Self, GameError> {
        let mut position = options.variant.rules().initial_position();
        position.chess960 = options.chess960;
        let mut game = Self::from_position(position, options);
        if let (true, Some(n)) = (options.chess960, options.start_position) {
            game.new_960(n)?;
        }
        Ok(game)
    }

    fn from_position(position: Position, options: GameOptions) -> Self {
        let mut game = Game {
            start: position.clone(),
            position,
            history: Vec::new(),
            repetitions: HashMap::new(),
            headers: Headers::new(),
            options,
        };
        game.reset_history();
        game
    }

    /// Returns a reference to the current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn variant(&self) -> VariantKind {
        self.options.variant
    }

    /// Side to move.
    pub fn turn(&self) -> Color {
        self.position.side_to_move
    }

    /// Returns to the variant's starting position, dropping history and
    /// tag pairs.
    pub fn reset(&mut self) {
        let mut position = self.options.variant.rules().initial_position();
        position.chess960 = self.options.chess960;
        self.set_position(position);
    }

    /// Loads a FEN. On failure the game falls back to the starting position
    /// and `false` is returned.
    pub fn load(&mut self, fen: &str) -> bool {
        match self.try_load(fen) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("rejected FEN {:?}: {}", fen, e);
                self.reset();
                false
            }
        }
    }

    /// Loads a FEN, leaving the game untouched on failure.
    pub fn try_load(&mut self, fen: &str) -> Result<(), GameError> {
        let position = Position::from_fen(fen, self.options.variant, self.options.chess960)?;
        self.set_position(position);
        Ok(())
    }

    /// Starts from the numbered shuffled arrangement (518 is the orthodox
    /// one). Shuffled castling is switched on.
    pub fn new_960(&mut self, n: u16) -> Result<(), GameError> {
        let rank = chess960::back_rank(n).ok_or(GameError::InvalidPositionNumber(n))?;
        self.options.chess960 = true;
        let mut position = Position::empty(self.options.variant, true);
        position.setup_back_rank(&rank);
        self.set_position(position);
        Ok(())
    }

    /// Starts from a random shuffled arrangement and returns its number.
    pub fn new_960_random<R: Rng>(&mut self, rng: &mut R) -> Result<u16, GameError> {
        let n = rng.gen_range(0..chess960::POSITION_COUNT);
        self.new_960(n)?;
        Ok(n)
    }

    /// Number of the shuffled arrangement the game started from, if it
    /// started from one.
    pub fn position_number(&self) -> Option<u16> {
        let board = &self.start.board;
        let mut rank = [Piece::Pawn; 8];
        for (slot, file) in rank.iter_mut().zip(File::ALL) {
            let white = board.get(Square::new(file, Rank::R1));
            let black = board.get(Square::new(file, Rank::R8));
            match (white, black) {
                (Some((piece, Color::White)), Some((other, Color::Black))) if piece == other => {
                    *slot = piece;
                }
                _ => return None,
            }
        }
        chess960::position_number(&rank)
    }

    fn set_position(&mut self, position: Position) {
        self.start = position.clone();
        self.position = position;
        self.headers.clear();
        self.reset_history();
    }

    fn reset_history(&mut self) {
        self.history.clear();
        self.repetitions.clear();
        self.repetitions.insert(signature(&self.position), 1);
        self.update_setup();
    }

    /// Keeps the `SetUp` and `FEN` tags in line with the starting position.
    fn update_setup(&mut self) {
        if !self.history.is_empty() {
            return;
        }
        let fen = self.position.to_fen();
        if fen == self.options.variant.dialect().start_fen() {
            self.headers.remove("SetUp");
            self.headers.remove("FEN");
        } else {
            self.headers.set("SetUp", "1");
            self.headers.set("FEN", &fen);
        }
    }

    /// Returns the current position as a FEN string.
    pub fn fen(&self) -> String {
        self.position.to_fen()
    }

    /// Validates a FEN in this game's dialect without loading it.
    pub fn validate_fen(&self, fen: &str) -> FenValidation {
        validate_fen(fen, self.options.variant.dialect(), self.options.chess960)
    }

    /// SAN of every legal move.
    pub fn moves(&self) -> Vec<String> {
        let rules = self.position.rules();
        san_list(&self.position, &rules.generate_moves(&self.position))
    }

    /// Legal moves, optionally restricted to one origin square and
    /// optionally as full records.
    pub fn moves_with(&self, options: &MoveOptions) -> MoveListing {
        let legal = self.position.rules().generate_moves(&self.position);
        let sans = san_list(&self.position, &legal);
        let selected = legal
            .as_slice()
            .iter()
            .zip(sans)
            .filter(|(m, _)| options.square.map_or(true, |sq| m.from == Some(sq)));

        if options.verbose {
            MoveListing::Verbose(selected.map(|(m, san)| MoveRecord::new(m, san)).collect())
        } else {
            MoveListing::San(selected.map(|(_, san)| san).collect())
        }
    }

    /// Plays a move given as SAN or by its squares. Returns `None` and
    /// changes nothing if the move is not legal.
    pub fn make_move(&mut self, input: impl Into<MoveInput>) -> Option<MoveRecord> {
        match self.try_make_move(input) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!("move rejected: {}", e);
                None
            }
        }
    }

    /// Like [`make_move`](Game::make_move) with lenient SAN parsing.
    pub fn make_move_sloppy(&mut self, san: &str) -> Option<MoveRecord> {
        match san_to_move_sloppy(&self.position, san) {
            Ok(m) => Some(self.apply(m)),
            Err(e) => {
                tracing::debug!("move rejected: {}", e);
                None
            }
        }
    }

    /// Plays a move, reporting why it was refused.
    pub fn try_make_move(&mut self, input: impl Into<MoveInput>) -> Result<MoveRecord, GameError> {
        let m = match input.into() {
            MoveInput::San(san) => san_to_move(&self.position, &san)?,
            MoveInput::Structured(description) => self.resolve(&description)?,
        };
        Ok(self.apply(m))
    }

    /// Finds the legal move a description refers to. A castling move named
    /// by its rook square is only considered when nothing matches the
    /// destination literally.
    fn resolve(&self, description: &MoveDescription) -> Result<Move, GameError> {
        let legal = self.position.rules().generate_moves(&self.position);
        let literal: Vec<&Move> = legal
            .as_slice()
            .iter()
            .filter(|m| description.matches(m, false))
            .collect();
        let found = match literal.as_slice() {
            [m] => Some(**m),
            // A king step and a castle landing on the same square.
            [_, _, ..] => literal
                .iter()
                .find(|m| m.castle_side().is_none())
                .map(|m| **m),
            [] => legal
                .as_slice()
                .iter()
                .find(|m| m.castle_side().is_some() && description.matches(m, true))
                .copied(),
        };
        found.ok_or_else(|| {
            let from = description
                .from
                .map_or_else(|| "@".to_string(), |sq| sq.to_algebraic());
            GameError::IllegalMove(format!("{}{}", from, description.to))
        })
    }

    fn apply(&mut self, m: Move) -> MoveRecord {
        let san = move_to_san(&self.position, &m);
        let record = MoveRecord::new(&m, san);
        let undo = make_move(&mut self.position, &m);
        *self.repetitions.entry(signature(&self.position)).or_insert(0) += 1;
        self.history.push(HistoryEntry {
            mv: m,
            undo,
            record: record.clone(),
        });
        record
    }

    /// Takes back the last move.
    pub fn undo(&mut self) -> Option<MoveRecord> {
        let entry = self.history.pop()?;
        let key = signature(&self.position);
        if let Some(count) = self.repetitions.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.repetitions.remove(&key);
            }
        }
        unmake_move(&mut self.position, &entry.mv, entry.undo);
        Some(entry.record)
    }

    /// Pieces in hand, sorted, per side.
    pub fn hand(&self) -> HandSnapshot {
        HandSnapshot::from(&self.position.hand)
    }

    /// Auxiliary pieces `color` may still bring in.
    pub fn gate_reserve(&self, color: Color) -> Vec<Piece> {
        self.position.gates.available(color).collect()
    }

    /// The piece on a square, `None` for an empty or unknown square.
    pub fn get(&self, square: &str) -> Option<BoardCell> {
        let sq = Square::from_algebraic(square)?;
        self.position
            .board
            .get(sq)
            .map(|(piece, color)| BoardCell { piece, color })
    }

    /// Puts a piece on a square. A king moves rather than being duplicated.
    /// Editing the board clears the move history.
    pub fn put(&mut self, piece: Piece, color: Color, square: &str) -> Result<(), GameError> {
        let sq = parse_square(square)?;
        if !self.position.rules().pieces().contains(&piece) {
            return Err(GameError::UnsupportedPiece(piece));
        }
        if let Some(old_king) = self.position.board.king_square(color) {
            if piece == Piece::King && old_king != sq {
                self.position.castling.remove_color(color);
            }
        }
        self.position.castling.remove_rook_square(sq);
        self.position.board.place(piece, color, sq);
        self.after_edit();
        Ok(())
    }

    /// Removes and returns the piece on a square.
    pub fn remove(&mut self, square: &str) -> Option<BoardCell> {
        let sq = Square::from_algebraic(square)?;
        let (piece, color) = self.position.board.remove(sq)?;
        if piece == Piece::King {
            self.position.castling.remove_color(color);
        }
        self.position.castling.remove_rook_square(sq);
        self.after_edit();
        Some(BoardCell { piece, color })
    }

    /// Empties the board and restores default state: no hand, no gate
    /// reserve, White to move, no castling rights.
    pub fn clear(&mut self) {
        let position = Position::empty(self.options.variant, self.options.chess960);
        self.set_position(position);
    }

    fn after_edit(&mut self) {
        self.start = self.position.clone();
        self.reset_history();
    }

    /// Returns true if the side to move is in check.
    pub fn in_check(&self) -> bool {
        in_check(&self.position)
    }

    pub fn in_checkmate(&self) -> bool {
        self.in_check() && !has_legal_move(&self.position)
    }

    pub fn in_stalemate(&self) -> bool {
        !self.in_check() && !has_legal_move(&self.position)
    }

    pub fn insufficient_material(&self) -> bool {
        self.position.rules().is_insufficient_material(&self.position)
    }

    /// True once the current position has occurred three times.
    pub fn in_threefold_repetition(&self) -> bool {
        self.repetition_count() >= 3
    }

    /// Counts how many times the current position has occurred.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions
            .get(&signature(&self.position))
            .copied()
            .unwrap_or(0)
    }

    /// Repetition, the fifty-move rule, or insufficient material.
    pub fn in_draw(&self) -> bool {
        self.position.halfmove_clock >= 100
            || self.in_threefold_repetition()
            || self.insufficient_material()
    }

    /// Returns true if the game has ended.
    pub fn game_over(&self) -> bool {
        self.position.rules().is_game_over(&self.position) || self.in_threefold_repetition()
    }

    /// The result if the game is over.
    pub fn outcome(&self) -> Option<GameResult> {
        if !has_legal_move(&self.position) {
            return self.position.rules().game_result(&self.position);
        }
        if self.in_threefold_repetition() {
            return Some(GameResult::Draw(DrawReason::ThreefoldRepetition));
        }
        self.position.rules().game_result(&self.position)
    }

    /// Whether `color` may castle on `side` right now, whichever side is to
    /// move.
    pub fn castling_legal(&self, color: Color, side: CastleSide) -> bool {
        let Some(m) = castling_move(&self.position, color, side) else {
            return false;
        };
        let mut scratch = self.position.clone();
        make_move(&mut scratch, &m);
        !is_king_attacked(&scratch, color)
    }

    /// Leaf count of the legal move tree to `depth`.
    pub fn perft(&self, depth: u32) -> u64 {
        let nodes = perft(&self.position, depth);
        tracing::trace!("perft({}) = {}", depth, nodes);
        nodes
    }

    /// Leaf counts below each legal move, keyed by SAN.
    pub fn perft_divide(&self, depth: u32) -> Vec<(String, u64)> {
        perft_divide(&self.position, depth)
    }

    /// SAN of the moves played, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.iter().map(|e| e.record.san.clone()).collect()
    }

    pub fn history_verbose(&self) -> Vec<MoveRecord> {
        self.history.iter().map(|e| e.record.clone()).collect()
    }

    /// The game as PGN.
    pub fn pgn(&self, options: &PgnOptions) -> String {
        write_pgn(
            &self.headers,
            &self.history(),
            self.start.side_to_move,
            self.start.fullmove_number,
            options,
        )
    }

    /// Loads a PGN game. On failure the previous state is kept and `false`
    /// is returned.
    pub fn load_pgn(&mut self, text: &str, options: &PgnLoadOptions) -> bool {
        match self.try_load_pgn(text, options) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("PGN not loaded: {}", e);
                false
            }
        }
    }

    /// Loads a PGN game, leaving the game untouched on failure.
    pub fn try_load_pgn(&mut self, text: &str, options: &PgnLoadOptions) -> Result<(), GameError> {
        let backup = self.clone();
        let result = self.replay_pgn(text, options);
        if result.is_err() {
            *self = backup;
        }
        Ok(result?)
    }

    fn replay_pgn(&mut self, text: &str, options: &PgnLoadOptions) -> Result<(), PgnError> {
        let parsed = parse_pgn(text, &options.newline)?;
        match parsed.headers.get("FEN") {
            Some(fen) => {
                let position =
                    Position::from_fen(fen, self.options.variant, self.options.chess960)?;
                self.set_position(position);
            }
            None => self.reset(),
        }
        self.headers = parsed.headers;

        for token in &parsed.moves {
            let m = if options.sloppy {
                san_to_move_sloppy(&self.position, token)
            } else {
                san_to_move(&self.position, token)
            }
            .map_err(|source| PgnError::IllegalMove {
                token: token.clone(),
                source,
            })?;
            self.apply(m);
        }
        Ok(())
    }

    /// Sets a PGN tag pair. An existing tag keeps its place.
    pub fn set_header(&mut self, key: &str, value: &str) {
        self.headers.set(key, value);
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// All tag pairs in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        self.headers.as_slice()
    }

    pub fn remove_header(&mut self, key: &str) -> Option<String> {
        self.headers.remove(key)
    }

    /// The board as rows, rank 8 first, files a to h.
    pub fn board(&self) -> [[Option<BoardCell>; 8]; 8] {
        let mut rows = [[None; 8]; 8];
        for (row, rank) in rows.iter_mut().zip(Rank::ALL.iter().rev()) {
            for (cell, file) in row.iter_mut().zip(File::ALL) {
                *cell = self
                    .position
                    .board
                    .get(Square::new(file, *rank))
                    .map(|(piece, color)| BoardCell { piece, color });
            }
        }
        rows
    }

    /// The placement field alone, without promotion markers or hand.
    pub fn position_placement(&self) -> String {
        self.position.placement(false)
    }

    /// A text diagram of the board, with the hand or reserve underneath.
    pub fn ascii(&self) -> String {
        let mut s = String::from("   +------------------------+\n");
        for (row, rank) in self.board().iter().zip(Rank::ALL.iter().rev()) {
            s.push(' ');
            s.push(rank.to_char());
            s.push_str(" |");
            for cell in row {
                let c = cell.map_or('.', |cell| cell.piece.to_fen_char(cell.color));
                s.push(' ');
                s.push(c);
                s.push(' ');
            }
            s.push_str("|\n");
        }
        s.push_str("   +------------------------+\n");
        s.push_str("     a  b  c  d  e  f  g  h\n");
        match self.options.variant {
            VariantKind::Crazyhouse => {
                let hand = self.position.hand.to_fen();
                s.push_str(&format!("   hand: {}\n", if hand.is_empty() { "-" } else { &hand }));
            }
            VariantKind::Seirawan => {
                s.push_str(&format!("   reserve: {}\n", self.position.gates.reserve_fen()));
            }
            VariantKind::Standard => {}
        }
        s
    }
}

fn parse_square(text: &str) -> Result<Square, GameError> {
    Square::from_algebraic(text).ok_or_else(|| GameError::InvalidSquare(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn new_game() {
        let game = Game::new();
        assert!(game.history().is_empty());
        assert!(!game.game_over());
        assert!(!game.in_check());
        assert_eq!(game.moves().len(), 20);
        assert!(game.headers().is_empty());
    }

    #[test]
    fn make_move_san() {
        let mut game = Game::new();
        let record = game.make_move("e4").unwrap();
        assert_eq!(record.san, "e4");
        assert_eq!(record.from, Some(sq("e2")));
        game.make_move("e5").unwrap();
        assert_eq!(game.history(), vec!["e4", "e5"]);
    }

    #[test]
    fn illegal_move_changes_nothing() {
        let mut game = Game::new();
        let before = game.fen();
        assert!(game.make_move("e5").is_none());
        assert!(matches!(
            game.try_make_move("Nf6"),
            Err(GameError::InvalidSan(SanError::NoMatchingMove(_)))
        ));
        assert_eq!(game.fen(), before);
    }

    #[test]
    fn structured_moves() {
        let mut game = Game::new();
        let record = game
            .make_move(MoveDescription::from_squares("g1", "f3").unwrap())
            .unwrap();
        assert_eq!(record.san, "Nf3");
        assert!(game
            .make_move(MoveDescription::new(sq("e7"), sq("e3")))
            .is_none());
    }

    #[test]
    fn structured_promotion_needs_piece() {
        let mut game = Game::new();
        assert!(game.load("4k3/P7/8/8/8/8/8/4K3 w - - 0 1"));
        assert!(game.make_move(MoveDescription::new(sq("a7"), sq("a8"))).is_none());
        let record = game
            .make_move(MoveDescription::new(sq("a7"), sq("a8")).with_promotion(Piece::Knight))
            .unwrap();
        assert_eq!(record.san, "a8=N");
    }

    #[test]
    fn structured_castling_by_rook_square() {
        let mut game = Game::new();
        assert!(game.load("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1"));
        let record = game.make_move(MoveDescription::new(sq("e1"), sq("h1"))).unwrap();
        assert_eq!(record.san, "O-O");
        let record = game.make_move(MoveDescription::new(sq("e8"), sq("c8"))).unwrap();
        assert_eq!(record.san, "O-O-O");
    }

    #[test]
    fn undo_restores_state() {
        let mut game = Game::new();
        let start = game.fen();
        game.make_move("e4").unwrap();
        game.make_move("d5").unwrap();
        game.make_move("exd5").unwrap();
        let undone = game.undo().unwrap();
        assert_eq!(undone.san, "exd5");
        assert_eq!(undone.captured, Some(Piece::Pawn));
        game.undo();
        game.undo();
        assert_eq!(game.fen(), start);
        assert!(game.undo().is_none());
    }

    #[test]
    fn sloppy_moves_and_verbose_history() {
        let mut game = Game::new();
        assert!(game.make_move("e2e4").is_none());
        assert_eq!(game.make_move_sloppy("e2e4").map(|r| r.san), Some("e4".to_string()));
        assert_eq!(game.make_move_sloppy("Pe7e5").map(|r| r.san), Some("e5".to_string()));
        assert_eq!(game.make_move_sloppy("Ng1f3").map(|r| r.san), Some("Nf3".to_string()));

        let verbose = game.history_verbose();
        assert_eq!(verbose.len(), 3);
        assert_eq!(verbose[2].piece, Piece::Knight);
        assert_eq!(verbose[2].from, Some(sq("g1")));
        assert_eq!(verbose[2].to, sq("f3"));
        assert_eq!(verbose[0].color, Color::White);
    }

    #[test]
    fn checkmate_fools_mate() {
        let mut game = Game::new();
        for san in ["f3", "e5", "g4", "Qh4#"] {
            game.make_move(san).unwrap();
        }
        assert!(game.in_checkmate());
        assert!(game.game_over());
        assert_eq!(game.outcome(), Some(GameResult::BlackWins));
        assert_eq!(game.history().last().map(String::as_str), Some("Qh4#"));
    }

    #[test]
    fn stalemate() {
        let mut game = Game::new();
        assert!(game.load("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1"));
        assert!(game.in_stalemate());
        assert!(game.game_over());
        assert!(!game.in_draw());
        assert_eq!(game.outcome(), Some(GameResult::Draw(DrawReason::Stalemate)));
    }

    #[test]
    fn threefold_repetition() {
        let mut game = Game::new();
        for san in ["Nf3", "Nf6", "Ng1", "Ng8"] {
            game.make_move(san).unwrap();
        }
        assert_eq!(game.repetition_count(), 2);
        assert!(!game.in_threefold_repetition());
        assert!(!game.in_draw());
        assert!(!game.game_over());

        for san in ["Nf3", "Nf6", "Ng1", "Ng8"] {
            game.make_move(san).unwrap();
        }
        assert_eq!(game.repetition_count(), 3);
        assert!(game.in_threefold_repetition());
        assert!(game.in_draw());
        assert!(game.game_over());
        assert_eq!(
            game.outcome(),
            Some(GameResult::Draw(DrawReason::ThreefoldRepetition))
        );

        game.undo();
        assert!(!game.in_threefold_repetition());
    }

    #[test]
    fn fifty_move_rule() {
        let mut game = Game::new();
        assert!(game.load("8/8/8/8/8/8/8/R3K2k w Q - 99 1"));
        assert!(!game.in_draw());
        game.make_move("Ra2").unwrap();
        assert!(game.in_draw());
        assert!(game.game_over());
        assert_eq!(game.outcome(), Some(GameResult::Draw(DrawReason::FiftyMoveRule)));
    }

    #[test]
    fn game_over_follows_the_variant_rules() {
        for variant in [VariantKind::Standard, VariantKind::Crazyhouse, VariantKind::Seirawan] {
            let game = Game::for_variant(variant);
            assert_eq!(game.position(), &variant.rules().initial_position());
            assert!(!game.game_over());
            let legal = game.position().rules().generate_moves(game.position());
            assert_eq!(game.moves().len(), legal.len());
        }

        let mut game = Game::new();
        for san in ["f3", "e5", "g4", "Qh4#"] {
            game.make_move(san).unwrap();
        }
        assert!(game.game_over());
        assert!(game.moves().is_empty());
        assert_eq!(game.outcome(), game.position().rules().game_result(game.position()));

        // Bare kings are dead in standard chess but not with pieces in hand.
        let mut game = Game::for_variant(VariantKind::Crazyhouse);
        assert!(game.load("4k3/8/8/8/8/8/8/4K3/N w - - 0 1"));
        assert!(!game.game_over());
        assert!(game.load("4k3/8/8/8/8/8/8/4K3/ w - - 0 1"));
        assert!(game.game_over());
    }

    #[test]
    fn insufficient_material() {
        let mut game = Game::new();
        assert!(game.load("8/8/8/8/8/8/8/4K2k w - - 0 1"));
        assert!(game.insufficient_material());
        assert!(game.in_draw());
        assert_eq!(
            game.outcome(),
            Some(GameResult::Draw(DrawReason::InsufficientMaterial))
        );
    }

    #[test]
    fn bad_fen_falls_back_to_start() {
        let mut game = Game::new();
        game.make_move("e4").unwrap();
        assert!(!game.load("not a fen"));
        assert_eq!(game.fen(), Position::default().to_fen());
        assert!(game.history().is_empty());
        assert!(matches!(
            game.try_load("8/8/8/8/8/8/8/8 x - - 0 1"),
            Err(GameError::InvalidFen(FenError::SideToMove(_)))
        ));
    }

    #[test]
    fn setup_headers_follow_fen() {
        let mut game = Game::new();
        let fen = "4k3/8/8/8/8/8/8/4K2R w K - 0 1";
        assert!(game.load(fen));
        assert_eq!(game.header("SetUp"), Some("1"));
        assert_eq!(game.header("FEN"), Some(fen));
        game.reset();
        assert!(game.headers().is_empty());
    }

    #[test]
    fn square_filter() {
        let game = Game::new();
        let options = MoveOptions {
            square: Some(sq("e2")),
            verbose: false,
        };
        assert_eq!(
            game.moves_with(&options),
            MoveListing::San(vec!["e3".to_string(), "e4".to_string()])
        );
        let verbose = game.moves_with(&MoveOptions {
            square: Some(sq("g1")),
            verbose: true,
        });
        match verbose {
            MoveListing::Verbose(records) => {
                assert_eq!(records.len(), 2);
                assert!(records.iter().all(|r| r.piece == Piece::Knight));
            }
            MoveListing::San(_) => panic!("expected records"),
        }
    }

    #[test]
    fn get_put_remove() {
        let mut game = Game::new();
        game.clear();
        assert_eq!(game.fen(), "8/8/8/8/8/8/8/8 w - - 0 1");
        game.put(Piece::King, Color::White, "e1").unwrap();
        game.put(Piece::King, Color::White, "d1").unwrap();
        assert_eq!(game.get("e1"), None);
        assert_eq!(
            game.get("d1"),
            Some(BoardCell {
                piece: Piece::King,
                color: Color::White
            })
        );
        assert_eq!(
            game.put(Piece::Pawn, Color::Black, "z9"),
            Err(GameError::InvalidSquare("z9".to_string()))
        );
        assert_eq!(
            game.put(Piece::Hawk, Color::Black, "a8"),
            Err(GameError::UnsupportedPiece(Piece::Hawk))
        );
        assert_eq!(
            game.remove("d1").map(|c| c.piece),
            Some(Piece::King)
        );
        assert_eq!(game.remove("d1"), None);
    }

    #[test]
    fn editing_drops_castling_rights() {
        let mut game = Game::new();
        game.remove("h1");
        assert_eq!(game.position().castling_fen(), "Qkq");
        game.put(Piece::King, Color::Black, "d8").unwrap();
        assert_eq!(game.position().castling_fen(), "Q");
    }

    #[test]
    fn board_rows_start_at_rank_eight() {
        let game = Game::new();
        let board = game.board();
        assert_eq!(
            board[0][0],
            Some(BoardCell {
                piece: Piece::Rook,
                color: Color::Black
            })
        );
        assert_eq!(board[7][4].map(|c| c.piece), Some(Piece::King));
        assert_eq!(board[4][4], None);
        let json = serde_json::to_value(board[7][4]).unwrap();
        assert_eq!(json, serde_json::json!({"type": "k", "color": "w"}));
    }

    #[test]
    fn ascii_diagram() {
        let game = Game::new();
        let text = game.ascii();
        assert!(text.starts_with("   +------------------------+\n 8 | r  n  b  q  k  b  n  r |\n"));
        assert!(text.ends_with("     a  b  c  d  e  f  g  h\n"));

        let house = Game::for_variant(VariantKind::Crazyhouse);
        assert!(house.ascii().ends_with("   hand: -\n"));
    }

    #[test]
    fn castling_legal_either_side_to_move() {
        let mut game = Game::new();
        assert!(game.load("r3k2r/8/8/8/8/8/5r2/R3K2R w KQkq - 0 1"));
        assert!(!game.castling_legal(Color::White, CastleSide::Kingside));
        assert!(game.castling_legal(Color::White, CastleSide::Queenside));
        assert!(game.castling_legal(Color::Black, CastleSide::Kingside));
    }

    #[test]
    fn options_select_variant_and_arrangement() {
        let game = Game::with_options(GameOptions {
            variant: VariantKind::Crazyhouse,
            chess960: true,
            start_position: Some(0),
        })
        .unwrap();
        assert_eq!(game.fen(), "bbqnnrkr/pppppppp/8/8/8/8/PPPPPPPP/BBQNNRKR/ w KQkq - 0 1");
        assert_eq!(game.position_number(), Some(0));

        let err = Game::with_options(GameOptions {
            variant: VariantKind::Standard,
            chess960: true,
            start_position: Some(960),
        })
        .unwrap_err();
        assert_eq!(err, GameError::InvalidPositionNumber(960));
    }

    #[test]
    fn random_arrangement_is_numbered() {
        let mut game = Game::new();
        let mut rng = rand::thread_rng();
        let n = game.new_960_random(&mut rng).unwrap();
        assert!(n < 960);
        assert_eq!(game.position_number(), Some(n));
    }

    #[test]
    fn games_can_move_between_threads() {
        fn assert_send_clone<T: Send + Clone>() {}
        assert_send_clone::<Game>();

        let mut game = Game::for_variant(VariantKind::Crazyhouse);
        game.make_move("e4").unwrap();
        let copy = game.clone();
        let fen = std::thread::spawn(move || copy.fen()).join().unwrap();
        assert_eq!(fen, game.fen());
    }

    #[test]
    fn perft_from_game() {
        let game = Game::new();
        assert_eq!(game.perft(2), 400);
        let divide = game.perft_divide(2);
        assert_eq!(divide.len(), 20);
        assert!(divide.iter().all(|(_, n)| *n == 20));
    }
}
