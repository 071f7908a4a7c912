//! Board: the cell ownership grid.
//!
//! The board is sized once at game creation and never resized. Its cells
//! are partitioned across the players; the partition changes only when
//! the game resolves a duel.

pub mod cell;
pub mod grid;

pub use cell::Cell;
pub use grid::Board;
