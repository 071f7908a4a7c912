//! Error types for the game core.
//!
//! Every precondition violation maps to its own variant so callers can
//! branch on cause. Use [`GameError::kind`] when only the category matters.

use thiserror::Error;

use super::ids::{DuelId, PlayerId};

/// Convenience alias for results produced by the game core.
pub type GameResult<T> = Result<T, GameError>;

/// Why a duel resolution rejected the proposed winner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WinnerRejection {
    /// The winner is neither the challenger nor the challenged.
    NotParticipant,
    /// The duel already has a recorded winner.
    AlreadyResolved,
}

impl std::fmt::Display for WinnerRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WinnerRejection::NotParticipant => write!(f, "not a participant"),
            WinnerRejection::AlreadyResolved => write!(f, "duel already resolved"),
        }
    }
}

/// Errors raised by the board, duels, and the game controller.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// Board constructed with a zero dimension.
    #[error("Invalid board dimension: {rows}x{cols}")]
    InvalidDimension { rows: u32, cols: u32 },

    /// Player count does not equal board capacity.
    #[error("Expected {expected} players for the board, got {actual}")]
    CardinalityMismatch { expected: usize, actual: usize },

    /// Operation references a player not registered in the game.
    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    /// Two players were registered with the same id.
    #[error("Duplicate player id: {0}")]
    DuplicatePlayer(PlayerId),

    /// Challenger and challenged are the same player.
    #[error("{0} cannot challenge themselves")]
    SelfChallenge(PlayerId),

    /// The challenged player has not declared an expertise.
    #[error("{0} has no expertise set")]
    NoExpertiseSet(PlayerId),

    /// Duel id does not exist in the game's history.
    #[error("Unknown duel: {0}")]
    UnknownDuel(DuelId),

    /// Winner rejected: not a participant, or the duel is already resolved.
    #[error("Invalid winner {winner} for {duel}: {reason}")]
    InvalidWinner {
        duel: DuelId,
        winner: PlayerId,
        reason: WinnerRejection,
    },

    /// A duel participant is already out of the game.
    #[error("{0} is eliminated")]
    PlayerEliminated(PlayerId),

    /// Coordinates outside the board.
    #[error("Cell ({row}, {col}) is outside the board")]
    OutOfRange { row: u32, col: u32 },

    /// Category names must not be blank.
    #[error("Category name must not be empty")]
    EmptyCategoryName,

    /// Partition or elimination invariant does not hold.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Snapshot describes an impossible game state.
    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// Binary encoding or decoding failed.
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Fieldless discriminant of [`GameError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidDimension,
    CardinalityMismatch,
    UnknownPlayer,
    DuplicatePlayer,
    SelfChallenge,
    NoExpertiseSet,
    UnknownDuel,
    InvalidWinner,
    PlayerEliminated,
    OutOfRange,
    EmptyCategoryName,
    InvariantViolation,
    CorruptSnapshot,
    Encoding,
}

impl GameError {
    /// Get the error category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::InvalidDimension { .. } => ErrorKind::InvalidDimension,
            GameError::CardinalityMismatch { .. } => ErrorKind::CardinalityMismatch,
            GameError::UnknownPlayer(_) => ErrorKind::UnknownPlayer,
            GameError::DuplicatePlayer(_) => ErrorKind::DuplicatePlayer,
            GameError::SelfChallenge(_) => ErrorKind::SelfChallenge,
            GameError::NoExpertiseSet(_) => ErrorKind::NoExpertiseSet,
            GameError::UnknownDuel(_) => ErrorKind::UnknownDuel,
            GameError::InvalidWinner { .. } => ErrorKind::InvalidWinner,
            GameError::PlayerEliminated(_) => ErrorKind::PlayerEliminated,
            GameError::OutOfRange { .. } => ErrorKind::OutOfRange,
            GameError::EmptyCategoryName => ErrorKind::EmptyCategoryName,
            GameError::InvariantViolation(_) => ErrorKind::InvariantViolation,
            GameError::CorruptSnapshot(_) => ErrorKind::CorruptSnapshot,
            GameError::Encoding(_) => ErrorKind::Encoding,
        }
    }

    /// Creates an invariant violation error.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Creates a corrupt snapshot error.
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptSnapshot(msg.into())
    }
}

impl From<bincode::Error> for GameError {
    fn from(err: bincode::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}
