//! Rules engine for chess and two of its variants.
//!
//! This crate provides:
//! - [`Position`] - Full game state including pieces in hand and gates
//! - [`Game`] - Complete game management with history tracking
//! - [`Variant`] - Trait the variants plug their rule deltas into
//! - Move generation and validation, including drops and gated moves
//! - SAN notation parsing and generation
//! - PGN export and import
//!
//! Three rule sets are available through [`VariantKind`]: orthodox chess,
//! crazyhouse (captured pieces change sides and may be dropped back) and
//! Seirawan chess (a Hawk and an Elephant enter the board behind a
//! back-rank piece's first move). Each can use shuffled castling.
//!
//! # Architecture
//!
//! The board is a mailbox with per-color occupancy bitboards. Piece movement
//! is described by a capability table, so the compound Hawk and Elephant
//! reuse the knight, bishop and rook patterns. Legality is checked by
//! playing each candidate move and taking it back.
//!
//! # Example
//!
//! ```
//! use gatehouse_engine::{Game, VariantKind};
//!
//! let mut game = Game::for_variant(VariantKind::Crazyhouse);
//! game.make_move("e4").unwrap();
//! game.make_move("d5").unwrap();
//! game.make_move("exd5").unwrap();
//! assert_eq!(game.hand().white, vec![gatehouse_core::Piece::Pawn]);
//! println!("Position: {}", game.fen());
//! ```

mod bitboard;
mod board;
pub mod chess960;
mod game;
pub mod movegen;
mod options;
pub mod pgn;
mod position;
mod reserve;
pub mod rules;
pub mod san;
mod zobrist;

pub use bitboard::Bitboard;
pub use board::Board;
pub use game::{
    BoardCell, Game, GameError, MoveDescription, MoveInput, MoveListing, MoveOptions, MoveRecord,
};
pub use movegen::{generate_moves, in_check, is_king_attacked, make_move, unmake_move, MoveList};
pub use options::{ConfigError, GameOptions};
pub use pgn::{Headers, PgnError, PgnLoadOptions, PgnOptions};
pub use position::{CastlingRights, Position};
pub use reserve::{GateState, Hand, HandSnapshot};
pub use rules::{
    Crazyhouse, DrawReason, GameResult, Seirawan, StandardChess, Variant, VariantKind,
};
pub use san::{move_to_san, san_to_move, SanError};
pub use zobrist::signature;
