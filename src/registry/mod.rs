//! Game registry: many concurrent games, one lock per game.
//!
//! There is no process-wide current game. Callers create games here and
//! pass the returned [`GameId`](crate::core::GameId) into every operation.

pub mod store;

pub use store::{GameHandle, GameRegistry, RegistryError};
