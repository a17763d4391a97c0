//! Core types for chess and its drop and gating variants.
//!
//! This crate provides the fundamental types used across the engine:
//! - [`Piece`] and [`Color`] for piece representation, including the Hawk
//!   and Elephant of Seirawan chess
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] for move representation, covering drops and gates
//! - FEN tokenizing and numbered validation

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{validate_fen, FenDialect, FenError, FenPiece, FenRecord, FenValidation};
pub use mov::{CastleSide, Gate, Move, MoveFlag};
pub use piece::Piece;
pub use square::{File, Rank, Square};
