//! Game orchestration: construction, duels, turns, and snapshots.
//!
//! `Game` owns the board and every player. Callers interact with it only
//! through the operations here; ownership changes happen exclusively in
//! [`Game::resolve_duel`].

pub mod state;
pub mod snapshot;
mod turn;

pub use snapshot::GameSnapshot;
pub use state::{Game, GameStatus};
