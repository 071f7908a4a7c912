//! Ownership grid.
//!
//! The `Board` maps each cell to the player that owns it. After placement
//! every cell has exactly one owner. Ownership then changes only through
//! [`Board::transfer_cell`], which the game calls while resolving a duel;
//! it is not part of the public API.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::cell::Cell;
use crate::core::{GameError, GameResult, Player, PlayerId};

/// Fixed-size rectangular grid of cell owners.
///
/// ## Usage
///
/// ```
/// use floor_duel::board::{Board, Cell};
/// use floor_duel::core::{Player, PlayerId};
///
/// let mut board = Board::new(1, 2).unwrap();
/// let mut players = vec![
///     Player::new(PlayerId::new(1), "Alice"),
///     Player::new(PlayerId::new(2), "Bob"),
/// ];
///
/// board.place_players(&mut players).unwrap();
///
/// assert_eq!(board.owner_at(0, 1).unwrap(), Some(PlayerId::new(2)));
/// assert_eq!(players[0].primary_position(), Some(Cell::new(0, 0)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: u32,
    cols: u32,
    /// Row-major owners: index = row * cols + col.
    grid: Vec<Option<PlayerId>>,
}

impl Board {
    /// Create an empty board. Every cell starts unowned.
    pub fn new(rows: u32, cols: u32) -> GameResult<Self> {
        let capacity = Self::capacity_for(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            grid: vec![None; capacity],
        })
    }

    /// Cell count of a `rows x cols` board, without allocating it.
    ///
    /// Fails with `InvalidDimension` for a zero side or a product that
    /// does not fit in `usize`.
    pub fn capacity_for(rows: u32, cols: u32) -> GameResult<usize> {
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidDimension { rows, cols });
        }
        usize::try_from(rows)
            .ok()
            .zip(usize::try_from(cols).ok())
            .and_then(|(r, c)| r.checked_mul(c))
            .ok_or(GameError::InvalidDimension { rows, cols })
    }

    /// Rebuild a board from a row-major owner list.
    ///
    /// The length is checked before anything is allocated.
    pub(crate) fn from_grid(rows: u32, cols: u32, grid: Vec<Option<PlayerId>>) -> GameResult<Self> {
        let capacity = Self::capacity_for(rows, cols).map_err(|err| GameError::corrupt(err.to_string()))?;
        if grid.len() != capacity {
            return Err(GameError::corrupt(format!(
                "grid has {} cells, board {}x{} needs {}",
                grid.len(),
                rows,
                cols,
                capacity
            )));
        }
        Ok(Self { rows, cols, grid })
    }

    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of cells.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.grid.len()
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    fn index(&self, cell: Cell) -> GameResult<usize> {
        if !self.contains(cell) {
            return Err(GameError::OutOfRange {
                row: cell.row,
                col: cell.col,
            });
        }
        Ok(cell.row as usize * self.cols as usize + cell.col as usize)
    }

    /// Assign players to cells in row-major order.
    ///
    /// The first player gets `(0, 0)`, the next `(0, 1)`, and so on. Each
    /// player's positions are reset to the single assigned cell.
    pub fn place_players(&mut self, players: &mut [Player]) -> GameResult<()> {
        if players.len() != self.capacity() {
            return Err(GameError::CardinalityMismatch {
                expected: self.capacity(),
                actual: players.len(),
            });
        }

        let cells: Vec<Cell> = self.cells().collect();
        for ((slot, player), cell) in self.grid.iter_mut().zip(players.iter_mut()).zip(cells) {
            *slot = Some(player.id());
            player.place_at(cell);
        }

        Ok(())
    }

    /// Owner of the cell at `(row, col)`.
    pub fn owner_at(&self, row: u32, col: u32) -> GameResult<Option<PlayerId>> {
        self.owner_of(Cell::new(row, col))
    }

    /// Owner of `cell`.
    pub fn owner_of(&self, cell: Cell) -> GameResult<Option<PlayerId>> {
        let idx = self.index(cell)?;
        Ok(self.grid[idx])
    }

    /// Reassign a cell from one owner to another.
    ///
    /// Fails without modifying the grid if `from` does not currently own the cell.
    pub(crate) fn transfer_cell(&mut self, cell: Cell, from: PlayerId, to: PlayerId) -> GameResult<()> {
        let idx = self.index(cell)?;
        match self.grid[idx] {
            Some(owner) if owner == from => {
                self.grid[idx] = Some(to);
                Ok(())
            }
            other => Err(GameError::invariant(format!(
                "cell {} owned by {:?}, expected {}",
                cell, other, from
            ))),
        }
    }

    /// Iterate over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Cell::new(row, col)))
    }

    /// Iterate over `(cell, owner)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Option<PlayerId>)> + '_ {
        self.cells().zip(self.grid.iter().copied())
    }

    /// Row-major owner list.
    #[must_use]
    pub fn grid(&self) -> &[Option<PlayerId>] {
        &self.grid
    }

    /// Number of cells owned by each player.
    #[must_use]
    pub fn owner_counts(&self) -> FxHashMap<PlayerId, usize> {
        let mut counts = FxHashMap::default();
        for owner in self.grid.iter().flatten() {
            *counts.entry(*owner).or_insert(0) += 1;
        }
        counts
    }

    /// Check whether every cell has an owner.
    #[must_use]
    pub fn is_fully_owned(&self) -> bool {
        self.grid.iter().all(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(n: u32) -> Vec<Player> {
        (1..=n).map(|i| Player::new(PlayerId::new(i), format!("P{}", i))).collect()
    }

    #[test]
    fn test_new_board_unowned() {
        let board = Board::new(2, 3).unwrap();

        assert_eq!(board.capacity(), 6);
        assert!(!board.is_fully_owned());
        assert_eq!(board.owner_at(1, 2).unwrap(), None);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(Board::new(0, 3), Err(GameError::InvalidDimension { rows: 0, cols: 3 }));
        assert_eq!(Board::new(3, 0), Err(GameError::InvalidDimension { rows: 3, cols: 0 }));
    }

    #[test]
    fn test_capacity_for() {
        assert_eq!(Board::capacity_for(3, 4), Ok(12));
        assert_eq!(Board::capacity_for(0, 4), Err(GameError::InvalidDimension { rows: 0, cols: 4 }));

        #[cfg(target_pointer_width = "64")]
        assert_eq!(
            Board::capacity_for(u32::MAX, u32::MAX),
            Ok(u32::MAX as usize * u32::MAX as usize)
        );
        #[cfg(target_pointer_width = "32")]
        assert!(Board::capacity_for(u32::MAX, 2).is_err());
    }

    #[test]
    fn test_from_grid_huge_dimensions() {
        let err = Board::from_grid(u32::MAX, u32::MAX, vec![None; 4]).unwrap_err();
        assert_eq!(err.kind(), crate::core::ErrorKind::CorruptSnapshot);

        let err = Board::from_grid(0, 2, Vec::new()).unwrap_err();
        assert_eq!(err.kind(), crate::core::ErrorKind::CorruptSnapshot);
    }

    #[test]
    fn test_place_players_row_major() {
        let mut board = Board::new(2, 2).unwrap();
        let mut ps = players(4);

        board.place_players(&mut ps).unwrap();

        assert_eq!(board.owner_at(0, 0).unwrap(), Some(PlayerId::new(1)));
        assert_eq!(board.owner_at(0, 1).unwrap(), Some(PlayerId::new(2)));
        assert_eq!(board.owner_at(1, 0).unwrap(), Some(PlayerId::new(3)));
        assert_eq!(board.owner_at(1, 1).unwrap(), Some(PlayerId::new(4)));
        assert_eq!(ps[2].primary_position(), Some(Cell::new(1, 0)));
        assert!(ps.iter().all(|p| p.cell_count() == 1));
        assert!(board.is_fully_owned());
    }

    #[test]
    fn test_place_players_cardinality() {
        let mut board = Board::new(2, 2).unwrap();
        let mut ps = players(3);

        let err = board.place_players(&mut ps).unwrap_err();
        assert_eq!(err, GameError::CardinalityMismatch { expected: 4, actual: 3 });
        assert!(!board.is_fully_owned());
    }

    #[test]
    fn test_owner_at_out_of_range() {
        let board = Board::new(1, 2).unwrap();

        assert_eq!(board.owner_at(1, 0), Err(GameError::OutOfRange { row: 1, col: 0 }));
        assert_eq!(board.owner_at(0, 2), Err(GameError::OutOfRange { row: 0, col: 2 }));
    }

    #[test]
    fn test_transfer_cell() {
        let mut board = Board::new(1, 2).unwrap();
        let mut ps = players(2);
        board.place_players(&mut ps).unwrap();

        board
            .transfer_cell(Cell::new(0, 0), PlayerId::new(1), PlayerId::new(2))
            .unwrap();
        assert_eq!(board.owner_at(0, 0).unwrap(), Some(PlayerId::new(2)));

        // Wrong previous owner leaves the grid untouched
        let err = board
            .transfer_cell(Cell::new(0, 0), PlayerId::new(1), PlayerId::new(2))
            .unwrap_err();
        assert_eq!(err.kind(), crate::core::ErrorKind::InvariantViolation);
        assert_eq!(board.owner_at(0, 0).unwrap(), Some(PlayerId::new(2)));
    }

    #[test]
    fn test_owner_counts() {
        let mut board = Board::new(1, 3).unwrap();
        let mut ps = players(3);
        board.place_players(&mut ps).unwrap();
        board
            .transfer_cell(Cell::new(0, 2), PlayerId::new(3), PlayerId::new(1))
            .unwrap();

        let counts = board.owner_counts();
        assert_eq!(counts[&PlayerId::new(1)], 2);
        assert_eq!(counts[&PlayerId::new(2)], 1);
        assert!(!counts.contains_key(&PlayerId::new(3)));
    }

    #[test]
    fn test_cells_iteration() {
        let board = Board::new(2, 2).unwrap();
        let cells: Vec<_> = board.cells().collect();
        assert_eq!(
            cells,
            vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)]
        );
    }

    #[test]
    fn test_from_grid_length_checked() {
        let err = Board::from_grid(2, 2, vec![None; 3]).unwrap_err();
        assert_eq!(err.kind(), crate::core::ErrorKind::CorruptSnapshot);
    }
}
