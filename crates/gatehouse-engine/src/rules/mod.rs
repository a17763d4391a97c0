//! Variant abstraction.
//!
//! The shared core (board, move generation, legality, notation) knows
//! nothing about hands or gates. Each variant plugs its delta in through the
//! [`Variant`] trait: the FEN dialect it reads and writes, extra moves
//! (drops), extra move variants (gates), its promotion choices, whether
//! captures are banked, and its insufficient-material rule.

mod crazyhouse;
mod seirawan;
mod standard;

pub use crazyhouse::Crazyhouse;
pub use seirawan::Seirawan;
pub use standard::StandardChess;

use crate::movegen::{generate_moves, has_legal_move, is_king_attacked};
use crate::{MoveList, Position};
use gatehouse_core::{Color, FenDialect, Move, Piece};
use serde::{Deserialize, Serialize};

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameResult {
    /// White wins by checkmate.
    WhiteWins,
    /// Black wins by checkmate.
    BlackWins,
    /// Draw with a specific reason.
    Draw(DrawReason),
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DrawReason {
    /// No legal moves but not in check.
    Stalemate,
    /// Neither side can ever deliver mate.
    InsufficientMaterial,
    /// 100 half-moves without a pawn move or capture.
    FiftyMoveRule,
    /// The same position occurred three times.
    ThreefoldRepetition,
}

/// Selects one of the supported rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    #[default]
    Standard,
    /// Captured pieces are banked and may be dropped back.
    Crazyhouse,
    /// Hawk and Elephant enter the board through gates.
    Seirawan,
}

impl VariantKind {
    /// The rules for this variant.
    pub fn rules(self) -> &'static dyn Variant {
        match self {
            VariantKind::Standard => &StandardChess,
            VariantKind::Crazyhouse => &Crazyhouse,
            VariantKind::Seirawan => &Seirawan,
        }
    }

    /// FEN layout used by this variant.
    pub const fn dialect(self) -> FenDialect {
        match self {
            VariantKind::Standard => FenDialect::Standard,
            VariantKind::Crazyhouse => FenDialect::Drop,
            VariantKind::Seirawan => FenDialect::Gating,
        }
    }

    /// Name used in the PGN `Variant` tag.
    pub const fn name(self) -> &'static str {
        match self {
            VariantKind::Standard => "Standard",
            VariantKind::Crazyhouse => "Crazyhouse",
            VariantKind::Seirawan => "Seirawan",
        }
    }
}

/// Trait for the per-variant parts of the rules.
///
/// Hooks have defaults matching orthodox chess, so a variant only overrides
/// what it changes.
pub trait Variant: Sync {
    fn kind(&self) -> VariantKind;

    /// Piece types that may stand on the board.
    fn pieces(&self) -> &'static [Piece] {
        &Piece::STANDARD
    }

    /// Piece types a pawn of `color` may promote to.
    fn promotion_pieces(&self, _position: &Position, _color: Color) -> &'static [Piece] {
        &[Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight]
    }

    /// Whether captured pieces go to the capturer's hand.
    fn banks_captures(&self) -> bool {
        false
    }

    /// Adds moves that have no origin square.
    fn generate_drops(&self, _position: &Position, _moves: &mut MoveList) {}

    /// Adds `m` and any variants of it this rule set allows.
    fn expand_move(&self, _position: &Position, m: Move, moves: &mut MoveList) {
        moves.push(m);
    }

    /// Returns true if neither side has sufficient material to checkmate.
    fn is_insufficient_material(&self, position: &Position) -> bool;

    /// Returns the initial position for this variant.
    fn initial_position(&self) -> Position {
        Position::startpos(self.kind())
    }

    /// Generates all legal moves for the given position.
    fn generate_moves(&self, position: &Position) -> MoveList {
        generate_moves(position)
    }

    /// Returns the result if the game is over in this position alone
    /// (checkmate, stalemate, insufficient material, fifty-move rule).
    ///
    /// Repetition needs the game history; see [`Game`](crate::Game).
    fn game_result(&self, position: &Position) -> Option<GameResult> {
        let us = position.side_to_move;
        if !has_legal_move(position) {
            if is_king_attacked(position, us) {
                return Some(match us {
                    Color::White => GameResult::BlackWins,
                    Color::Black => GameResult::WhiteWins,
                });
            }
            return Some(GameResult::Draw(DrawReason::Stalemate));
        }
        if self.is_insufficient_material(position) {
            return Some(GameResult::Draw(DrawReason::InsufficientMaterial));
        }
        if position.halfmove_clock >= 100 {
            return Some(GameResult::Draw(DrawReason::FiftyMoveRule));
        }
        None
    }

    /// Returns true if the game is over.
    fn is_game_over(&self, position: &Position) -> bool {
        self.game_result(position).is_some()
    }
}
