//! # floor-duel
//!
//! Engine for a grid-ownership elimination game. Every player starts on one
//! cell of a rectangular floor and declares a knowledge category. Players
//! challenge each other on the challenged player's category; an external
//! adjudicator decides each duel, and the loser's cells all pass to the
//! winner. The last player standing owns the whole floor.
//!
//! ## Design Principles
//!
//! 1. **Explicit Context**: There is no global current game. Every
//!    operation runs against a `Game` value, and the `registry` module
//!    hosts many of them side by side.
//!
//! 2. **Atomic Operations**: A rejected call leaves the game untouched.
//!    Ownership changes happen only when a duel is resolved.
//!
//! 3. **Reproducible Randomness**: Turn order draws from a seeded
//!    ChaCha RNG that is captured in snapshots.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: Player positions and duel history use
//!   `im-rs`, so cloning or snapshotting a game is cheap.
//!
//! - **Typed Errors**: Every precondition failure is a distinct
//!   [`GameError`] variant.
//!
//! ## Modules
//!
//! - `core`: Identifiers, players, RNG, configuration, errors
//! - `categories`: Knowledge categories and the catalog
//! - `board`: Cells and the ownership grid
//! - `duel`: Duel records
//! - `game`: The game controller, turn selection, snapshots
//! - `registry`: Concurrent multi-game hosting
//! - `sim`: Random-adjudication playouts

pub mod core;
pub mod categories;
pub mod board;
pub mod duel;
pub mod game;
pub mod registry;
pub mod sim;

// Re-export commonly used types
pub use crate::core::{
    DuelId, GameId, PlayerId,
    Player,
    GameRng, GameRngState,
    GameConfig,
    ErrorKind, GameError, GameResult, WinnerRejection,
};

pub use crate::categories::{Category, CategoryCatalog, CategoryId};

pub use crate::board::{Board, Cell};

pub use crate::duel::{Duel, DuelStatus};

pub use crate::game::{Game, GameSnapshot, GameStatus};

pub use crate::registry::{GameHandle, GameRegistry, RegistryError};

pub use crate::sim::{Playout, PlayoutConfig, PlayoutSummary};
