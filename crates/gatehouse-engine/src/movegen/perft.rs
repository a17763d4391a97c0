//! Move tree leaf counts.
//!
//! Drops and gated moves are counted like any other move, so the totals for
//! the variants differ from orthodox tables once a hand or reserve is in play.

use super::{legal_moves_in_place, make_move, unmake_move};
use crate::san::move_to_san;
use crate::Position;

/// Leaf nodes of the legal move tree `depth` plies deep.
pub fn perft(position: &Position, depth: u32) -> u64 {
    let mut scratch = position.clone();
    perft_in_place(&mut scratch, depth)
}

fn perft_in_place(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves_in_place(position, None);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in &moves {
        let undo = make_move(position, m);
        nodes += perft_in_place(position, depth - 1);
        unmake_move(position, m, undo);
    }
    nodes
}

/// Leaf counts below each root move, keyed by SAN and sorted by it.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(String, u64)> {
    let mut scratch = position.clone();
    let moves = legal_moves_in_place(&mut scratch, None);
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        let san = move_to_san(&scratch, m);
        let undo = make_move(&mut scratch, m);
        let nodes = perft_in_place(&mut scratch, depth.saturating_sub(1));
        unmake_move(&mut scratch, m, undo);
        results.push((san, nodes));
    }

    results.sort();
    results
}
