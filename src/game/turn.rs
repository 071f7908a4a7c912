//! Challenger selection.
//!
//! Among players still in the game, a player holding exactly one cell is
//! preferred; every such player is equally likely. When nobody holds a
//! single cell, any remaining player may be picked. Iteration follows
//! placement order so a seeded RNG reproduces the same picks.

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashMap;

use crate::core::{Player, PlayerId};

/// Players eligible to challenge this turn, in placement order.
pub(crate) fn challenger_candidates(players: &FxHashMap<PlayerId, Player>, order: &[PlayerId]) -> Vec<PlayerId> {
    let alive: Vec<&Player> = order
        .iter()
        .filter_map(|id| players.get(id))
        .filter(|p| !p.is_eliminated())
        .collect();

    let single_cell: Vec<PlayerId> = alive
        .iter()
        .filter(|p| p.cell_count() == 1)
        .map(|p| p.id())
        .collect();

    if single_cell.is_empty() {
        alive.iter().map(|p| p.id()).collect()
    } else {
        single_cell
    }
}

/// Pick the next challenger uniformly among the candidates.
pub(crate) fn pick_challenger<R: Rng + ?Sized>(
    players: &FxHashMap<PlayerId, Player>,
    order: &[PlayerId],
    rng: &mut R,
) -> Option<PlayerId> {
    challenger_candidates(players, order).choose(rng).copied()
}
