//! Game configuration.
//!
//! `GameConfig` fixes the board dimensions and the randomness source for a
//! game. Dimensions are validated when the board is built, not here.

use serde::{Deserialize, Serialize};

use super::rng::GameRng;

/// Configuration for a single game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board rows (must be positive).
    pub rows: u32,

    /// Board columns (must be positive).
    pub cols: u32,

    /// Seed for turn selection. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Create a config for a `rows x cols` board with an entropy-seeded RNG.
    #[must_use]
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols, seed: None }
    }

    /// Create a config for an `n x n` board.
    #[must_use]
    pub fn square(n: u32) -> Self {
        Self::new(n, n)
    }

    /// Use a fixed seed for deterministic turn selection.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of cells (and therefore players) this board needs.
    #[must_use]
    pub fn capacity(&self) -> usize {
        (self.rows as usize).saturating_mul(self.cols as usize)
    }

    /// Build the RNG this config describes.
    #[must_use]
    pub fn make_rng(&self) -> GameRng {
        match self.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(1, 2)
    }
}
