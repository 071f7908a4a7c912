//! Whole-game snapshots.
//!
//! A `GameSnapshot` captures everything needed to rebuild a game: players in
//! placement order, the ownership grid, duel history, status, the recorded
//! turn challenger, and the RNG position. Restoring validates the snapshot
//! so an edited or truncated file cannot produce a game that breaks the
//! cell partition.
//!
//! Categories are stored by value. After a restore, players and duels that
//! shared one `Arc<Category>` hold equal but distinct allocations.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::state::{Game, GameStatus};
use crate::board::Board;
use crate::core::{GameError, GameResult, GameRng, GameRngState, Player, PlayerId};
use crate::duel::Duel;

/// Serializable capture of a [`Game`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub rows: u32,
    pub cols: u32,
    /// Row-major cell owners.
    pub grid: Vec<Option<PlayerId>>,
    /// Players in placement order.
    pub players: Vec<Player>,
    pub duel_history: Vec<Duel>,
    pub status: GameStatus,
    pub turn_challenger: Option<PlayerId>,
    pub rng: GameRngState,
}

impl GameSnapshot {
    /// Encode with bincode.
    pub fn to_bytes(&self) -> GameResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bincode. The result is not validated until restored.
    pub fn from_bytes(bytes: &[u8]) -> GameResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl Game {
    /// Capture the full game state.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            rows: self.rows(),
            cols: self.cols(),
            grid: self.board().grid().to_vec(),
            players: self.players().cloned().collect(),
            duel_history: self.duel_history().iter().cloned().collect(),
            status: self.status(),
            turn_challenger: self.turn_challenger_id(),
            rng: self.rng_state(),
        }
    }

    /// Rebuild a game from a snapshot.
    ///
    /// Fails with `CorruptSnapshot` if the snapshot does not describe a
    /// reachable game state.
    pub fn restore(snapshot: GameSnapshot) -> GameResult<Self> {
        let GameSnapshot {
            rows,
            cols,
            grid,
            players,
            duel_history,
            status,
            turn_challenger,
            rng,
        } = snapshot;

        let board = Board::from_grid(rows, cols, grid)?;
        if players.len() != board.capacity() {
            return Err(GameError::corrupt(format!(
                "{} players for {} cells",
                players.len(),
                board.capacity()
            )));
        }

        let mut ids = FxHashSet::default();
        for p in &players {
            if !ids.insert(p.id()) {
                return Err(GameError::corrupt(format!("duplicate {}", p.id())));
            }
        }

        for (index, duel) in duel_history.iter().enumerate() {
            if duel.id().index() != index {
                return Err(GameError::corrupt(format!("{} stored at index {}", duel.id(), index)));
            }
            if duel.challenger() == duel.challenged() {
                return Err(GameError::corrupt(format!("{} is a self-challenge", duel.id())));
            }
            for pid in duel.participants() {
                if !ids.contains(&pid) {
                    return Err(GameError::corrupt(format!("{} references unknown {}", duel.id(), pid)));
                }
            }
            if let Some(winner) = duel.winner().filter(|&w| !duel.involves(w)) {
                return Err(GameError::corrupt(format!("{} won by non-participant {}", duel.id(), winner)));
            }
        }

        // Elimination is permanent, so every recorded loser must still be out.
        let eliminated: FxHashSet<PlayerId> = players
            .iter()
            .filter(|p| p.is_eliminated())
            .map(Player::id)
            .collect();
        for duel in &duel_history {
            if let Some(loser) = duel.loser().filter(|l| !eliminated.contains(l)) {
                return Err(GameError::corrupt(format!("{} lost {} but is still playing", loser, duel.id())));
            }
        }

        if let Some(pid) = turn_challenger.filter(|pid| !ids.contains(pid)) {
            return Err(GameError::corrupt(format!("turn challenger {} is unknown", pid)));
        }

        let game = Game::from_parts(
            players,
            board,
            duel_history.into_iter().collect(),
            status,
            turn_challenger,
            GameRng::from_state(&rng),
        );

        game.check_invariants()
            .map_err(|err| GameError::corrupt(err.to_string()))?;

        // A lone player on a one-cell board never finishes; anything larger
        // with a single survivor must already be over.
        if game.status() == GameStatus::Active && game.player_count() > 1 && game.alive_players().count() == 1 {
            return Err(GameError::corrupt("game marked active but already won"));
        }

        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::categories::Category;
    use crate::core::{DuelId, ErrorKind, GameConfig};

    fn sample_game() -> Game {
        let players = (1..=4).map(|i| Player::new(PlayerId::new(i), format!("P{}", i))).collect();
        let mut game = Game::with_config(players, &GameConfig::square(2).with_seed(11)).unwrap();
        game.set_player_expertise(PlayerId::new(2), Arc::new(Category::new("Science"))).unwrap();
        game.set_player_expertise(PlayerId::new(3), Arc::new(Category::new("Art"))).unwrap();
        let d = game.challenge(PlayerId::new(1), PlayerId::new(2)).unwrap();
        game.resolve_duel(d, PlayerId::new(2)).unwrap();
        game.challenge(PlayerId::new(4), PlayerId::new(3)).unwrap();
        game.start_turn();
        game
    }

    #[test]
    fn test_snapshot_captures_state() {
        let game = sample_game();
        let snap = game.snapshot();

        assert_eq!(snap.players.len(), 4);
        assert_eq!(snap.duel_history.len(), 2);
        assert_eq!(snap.grid[0], Some(PlayerId::new(2)));
        assert_eq!(snap.status, GameStatus::Active);
        assert_eq!(snap.turn_challenger, game.turn_challenger_id());
    }

    #[test]
    fn test_restore_continues_identically() {
        let mut original = sample_game();
        let mut restored = Game::restore(original.snapshot()).unwrap();

        assert_eq!(restored.snapshot(), original.snapshot());
        for _ in 0..10 {
            assert_eq!(restored.start_turn(), original.start_turn());
        }

        restored.resolve_duel(DuelId::new(1), PlayerId::new(3)).unwrap();
        original.resolve_duel(DuelId::new(1), PlayerId::new(3)).unwrap();
        assert_eq!(restored.snapshot(), original.snapshot());
    }

    #[test]
    fn test_bincode_bytes() {
        let game = sample_game();
        let bytes = game.snapshot().to_bytes().unwrap();

        let decoded = GameSnapshot::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, game.snapshot());
        Game::restore(decoded).unwrap();
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = GameSnapshot::from_bytes(&[1, 2, 3]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }

    #[test]
    fn test_tampered_grid_rejected() {
        let mut snap = sample_game().snapshot();
        snap.grid[3] = Some(PlayerId::new(1));

        let err = Game::restore(snap).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptSnapshot);
    }

    #[test]
    fn test_unknown_duel_participant_rejected() {
        let mut snap = sample_game().snapshot();
        snap.duel_history[1] = Duel::new(
            DuelId::new(1),
            PlayerId::new(4),
            PlayerId::new(99),
            Arc::new(Category::new("Art")),
        );

        let err = Game::restore(snap).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptSnapshot);
    }

    #[test]
    fn test_false_game_over_rejected() {
        let mut snap = sample_game().snapshot();
        snap.status = GameStatus::Over { winner: PlayerId::new(2) };

        let err = Game::restore(snap).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptSnapshot);
    }

    #[test]
    fn test_json_snapshot() {
        let snap = sample_game().snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let decoded: GameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, snap);
    }
}
