//! Duels: challenges between two players on a category.
//!
//! The game creates duels and records them in its history. An external
//! adjudicator decides who won; the duel only stores the outcome.

pub mod record;

pub use record::{Duel, DuelStatus};
