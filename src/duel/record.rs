//! Duel record: who challenged whom, on what, and who won.
//!
//! A duel's participants and category are fixed at challenge time. The
//! winner is recorded exactly once; a second resolution is rejected.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::categories::Category;
use crate::core::{DuelId, GameError, GameResult, PlayerId, WinnerRejection};

/// Resolution state of a duel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelStatus {
    /// Issued, waiting for an adjudicated winner.
    Pending,
    /// Winner recorded.
    Resolved { winner: PlayerId },
}

/// A challenge between two players on the challenged player's category.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use floor_duel::categories::Category;
/// use floor_duel::core::{DuelId, PlayerId};
/// use floor_duel::duel::Duel;
///
/// let science = Arc::new(Category::new("Science"));
/// let mut duel = Duel::new(DuelId::new(0), PlayerId::new(1), PlayerId::new(2), science);
///
/// assert!(duel.winner().is_none());
/// duel.resolve(PlayerId::new(2)).unwrap();
/// assert_eq!(duel.winner(), Some(PlayerId::new(2)));
/// assert_eq!(duel.loser(), Some(PlayerId::new(1)));
///
/// // Resolution is one-time
/// assert!(duel.resolve(PlayerId::new(1)).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duel {
    id: DuelId,
    challenger: PlayerId,
    challenged: PlayerId,
    category: Arc<Category>,
    winner: Option<PlayerId>,
}

impl Duel {
    /// Create an unresolved duel.
    #[must_use]
    pub fn new(id: DuelId, challenger: PlayerId, challenged: PlayerId, category: Arc<Category>) -> Self {
        Self {
            id,
            challenger,
            challenged,
            category,
            winner: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> DuelId {
        self.id
    }

    #[must_use]
    pub fn challenger(&self) -> PlayerId {
        self.challenger
    }

    #[must_use]
    pub fn challenged(&self) -> PlayerId {
        self.challenged
    }

    /// The challenged player's expertise at challenge time.
    #[must_use]
    pub fn category(&self) -> &Arc<Category> {
        &self.category
    }

    /// Both participants, challenger first.
    #[must_use]
    pub fn participants(&self) -> [PlayerId; 2] {
        [self.challenger, self.challenged]
    }

    #[must_use]
    pub fn involves(&self, player: PlayerId) -> bool {
        player == self.challenger || player == self.challenged
    }

    #[must_use]
    pub fn status(&self) -> DuelStatus {
        match self.winner {
            Some(winner) => DuelStatus::Resolved { winner },
            None => DuelStatus::Pending,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.winner.is_some()
    }

    /// Check that `winner` could be recorded, without recording it.
    pub fn validate_winner(&self, winner: PlayerId) -> GameResult<()> {
        let reason = if self.winner.is_some() {
            WinnerRejection::AlreadyResolved
        } else if !self.involves(winner) {
            WinnerRejection::NotParticipant
        } else {
            return Ok(());
        };

        Err(GameError::InvalidWinner {
            duel: self.id,
            winner,
            reason,
        })
    }

    /// Record the winner.
    ///
    /// Fails with `InvalidWinner` if `winner` is not a participant or a
    /// winner is already recorded.
    pub fn resolve(&mut self, winner: PlayerId) -> GameResult<()> {
        self.validate_winner(winner)?;
        self.winner = Some(winner);
        Ok(())
    }

    /// Winner id, `None` while pending.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Loser id, `None` while pending.
    #[must_use]
    pub fn loser(&self) -> Option<PlayerId> {
        self.winner.map(|w| if w == self.challenger { self.challenged } else { self.challenger })
    }
}

impl std::fmt::Display for Duel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} vs {} on {}",
            self.id, self.challenger, self.challenged, self.category
        )
    }
}
