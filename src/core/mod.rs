//! Core types: identifiers, players, RNG, configuration, errors.
//!
//! Everything here is independent of the board layout and the duel rules,
//! which live in their own modules and build on these types.

pub mod ids;
pub mod player;
pub mod rng;
pub mod config;
pub mod error;

pub use ids::{DuelId, GameId, PlayerId};
pub use player::Player;
pub use rng::{GameRng, GameRngState};
pub use config::GameConfig;
pub use error::{ErrorKind, GameError, GameResult, WinnerRejection};
