//! Players: identity, declared expertise, and owned cells.
//!
//! A player is created by the caller with an id and a name, then handed to
//! [`Game::new`](crate::game::Game::new), which places it on the board. From
//! then on only the game mutates positions and the elimination flag, so
//! `eliminated == true` always implies an empty position set.

use std::sync::Arc;

use im::OrdSet;
use serde::{Deserialize, Serialize};

use super::ids::PlayerId;
use crate::board::Cell;
use crate::categories::Category;

/// A participant owning zero or more board cells.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use floor_duel::core::{Player, PlayerId};
/// use floor_duel::categories::Category;
///
/// let mut alice = Player::new(PlayerId::new(1), "Alice");
/// assert!(alice.expertise().is_none());
///
/// alice.set_expertise(Arc::new(Category::new("History")));
/// assert_eq!(alice.expertise().map(|c| c.name()), Some("History"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    expertise: Option<Arc<Category>>,
    positions: OrdSet<Cell>,
    eliminated: bool,
}

impl Player {
    /// Create a player with no expertise and no cells.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            expertise: None,
            positions: OrdSet::new(),
            eliminated: false,
        }
    }

    /// Builder-style expertise declaration.
    #[must_use]
    pub fn with_expertise(mut self, category: Arc<Category>) -> Self {
        self.expertise = Some(category);
        self
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the player.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Declared expertise, if any.
    #[must_use]
    pub fn expertise(&self) -> Option<&Arc<Category>> {
        self.expertise.as_ref()
    }

    /// Replace the declared expertise.
    pub fn set_expertise(&mut self, category: Arc<Category>) {
        self.expertise = Some(category);
    }

    /// Cells currently owned, in row-major order.
    #[must_use]
    pub fn positions(&self) -> &OrdSet<Cell> {
        &self.positions
    }

    /// Number of cells currently owned.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn owns(&self, cell: Cell) -> bool {
        self.positions.contains(&cell)
    }

    #[must_use]
    pub fn is_eliminated(&self) -> bool {
        self.eliminated
    }

    /// Smallest owned cell in row-major order.
    ///
    /// Display convenience only.
    #[must_use]
    pub fn primary_position(&self) -> Option<Cell> {
        self.positions.get_min().copied()
    }

    // === Game-driven mutation ===

    pub(crate) fn set_expertise_opt(&mut self, category: Option<Arc<Category>>) {
        self.expertise = category;
    }

    pub(crate) fn place_at(&mut self, cell: Cell) {
        self.positions = OrdSet::unit(cell);
        self.eliminated = false;
    }

    pub(crate) fn gain_cell(&mut self, cell: Cell) {
        self.positions.insert(cell);
    }

    /// Clear all cells and mark the player out.
    pub(crate) fn eliminate(&mut self) -> OrdSet<Cell> {
        self.eliminated = true;
        std::mem::take(&mut self.positions)
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
