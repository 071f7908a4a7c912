//! In-process registry of concurrent games.
//!
//! Each game sits behind its own `RwLock`: queries on one game may run in
//! parallel, mutations are serialized, and games never contend with each
//! other. The id map has a separate lock that is held only long enough to
//! look up or insert a handle.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::{debug, info};

use crate::core::{GameConfig, GameError, GameId, Player};
use crate::game::Game;

/// Errors raised by registry access.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No game registered under this id.
    #[error("Unknown game: {0}")]
    UnknownGame(GameId),

    /// A previous holder of the lock panicked.
    #[error("Lock poisoned for {0}")]
    Poisoned(GameId),

    /// The game rejected the operation.
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Shared handle to one registered game.
///
/// Cloning the handle shares the same game and lock.
#[derive(Clone, Debug)]
pub struct GameHandle {
    id: GameId,
    game: Arc<RwLock<Game>>,
}

impl GameHandle {
    #[must_use]
    pub fn id(&self) -> GameId {
        self.id
    }

    /// Run a read-only query.
    pub fn read<T>(&self, f: impl FnOnce(&Game) -> T) -> Result<T, RegistryError> {
        let guard = self.game.read().map_err(|_| RegistryError::Poisoned(self.id))?;
        Ok(f(&*guard))
    }

    /// Run a mutation while holding the game's exclusive lock.
    pub fn write<T>(&self, f: impl FnOnce(&mut Game) -> T) -> Result<T, RegistryError> {
        let mut guard = self.game.write().map_err(|_| RegistryError::Poisoned(self.id))?;
        Ok(f(&mut *guard))
    }

    /// Run a fallible game operation under the exclusive lock.
    pub fn try_write<T>(
        &self,
        f: impl FnOnce(&mut Game) -> Result<T, GameError>,
    ) -> Result<T, RegistryError> {
        self.write(f)?.map_err(RegistryError::from)
    }
}

/// Registry of games keyed by [`GameId`].
///
/// ## Example
///
/// ```
/// use floor_duel::core::{GameConfig, Player, PlayerId};
/// use floor_duel::registry::GameRegistry;
///
/// let registry = GameRegistry::new();
/// let players = vec![Player::new(PlayerId::new(1), "A"), Player::new(PlayerId::new(2), "B")];
/// let id = registry.create(players, &GameConfig::new(1, 2).with_seed(1)).unwrap();
///
/// let capacity = registry.with_game(id, |g| g.capacity()).unwrap();
/// assert_eq!(capacity, 2);
/// ```
#[derive(Debug, Default)]
pub struct GameRegistry {
    games: RwLock<BTreeMap<GameId, GameHandle>>,
    next_id: AtomicU64,
}

impl GameRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a game and register it.
    pub fn create(&self, players: Vec<Player>, config: &GameConfig) -> Result<GameId, RegistryError> {
        let game = Game::with_config(players, config)?;
        self.insert(game)
    }

    /// Register an existing game (for example one restored from a snapshot).
    pub fn insert(&self, game: Game) -> Result<GameId, RegistryError> {
        let id = GameId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let handle = GameHandle {
            id,
            game: Arc::new(RwLock::new(game)),
        };

        self.games
            .write()
            .map_err(|_| RegistryError::Poisoned(id))?
            .insert(id, handle);

        info!(game = %id, "game registered");
        Ok(id)
    }

    /// Look up a game handle.
    pub fn get(&self, id: GameId) -> Result<GameHandle, RegistryError> {
        self.games
            .read()
            .map_err(|_| RegistryError::Poisoned(id))?
            .get(&id)
            .cloned()
            .ok_or(RegistryError::UnknownGame(id))
    }

    /// Remove a game. Outstanding handles keep it alive until dropped.
    pub fn remove(&self, id: GameId) -> Result<GameHandle, RegistryError> {
        let removed = self
            .games
            .write()
            .map_err(|_| RegistryError::Poisoned(id))?
            .remove(&id)
            .ok_or(RegistryError::UnknownGame(id))?;
        debug!(game = %id, "game removed");
        Ok(removed)
    }

    /// Registered ids in ascending order.
    ///
    /// A poisoned map yields no ids.
    #[must_use]
    pub fn ids(&self) -> Vec<GameId> {
        self.games
            .read()
            .map(|games| games.keys().copied().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.read().map(|games| games.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run a read-only query on a game.
    pub fn with_game<T>(&self, id: GameId, f: impl FnOnce(&Game) -> T) -> Result<T, RegistryError> {
        self.get(id)?.read(f)
    }

    /// Run a fallible mutation on a game.
    pub fn with_game_mut<T>(
        &self,
        id: GameId,
        f: impl FnOnce(&mut Game) -> Result<T, GameError>,
    ) -> Result<T, RegistryError> {
        self.get(id)?.try_write(f)
    }
}
