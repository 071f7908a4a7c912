//! Game controller: the duel state machine.
//!
//! ## Lifecycle
//!
//! A game starts `Active` with every player owning one cell. Each resolved
//! duel moves all of the loser's cells to the winner and eliminates the
//! loser. The game becomes `Over` once a single remaining player owns the
//! whole board; that transition is permanent.
//!
//! ## Atomicity
//!
//! Every mutating operation validates all of its preconditions before it
//! touches state, so a failed call leaves the game exactly as it was.

use std::sync::Arc;

use im::Vector;
use rand::Rng;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::turn;
use crate::board::Board;
use crate::categories::Category;
use crate::core::{
    DuelId, GameConfig, GameError, GameResult, GameRng, GameRngState, Player, PlayerId,
};
use crate::duel::Duel;

/// Game-level state label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Duels may still be issued.
    Active,
    /// One player owns the whole board.
    Over { winner: PlayerId },
}

/// A single game: board, players, duel history, and turn state.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use floor_duel::categories::Category;
/// use floor_duel::core::{GameConfig, Player, PlayerId};
/// use floor_duel::game::{Game, GameStatus};
///
/// let players = vec![
///     Player::new(PlayerId::new(1), "Alice"),
///     Player::new(PlayerId::new(2), "Bob"),
/// ];
/// let mut game = Game::with_config(players, &GameConfig::new(1, 2).with_seed(7)).unwrap();
///
/// game.set_player_expertise(PlayerId::new(2), Arc::new(Category::new("Science"))).unwrap();
/// let duel = game.challenge(PlayerId::new(1), PlayerId::new(2)).unwrap();
/// assert_eq!(game.duel(duel).unwrap().category().name(), "Science");
///
/// game.resolve_duel(duel, PlayerId::new(2)).unwrap();
/// assert_eq!(game.status(), GameStatus::Over { winner: PlayerId::new(2) });
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    players: FxHashMap<PlayerId, Player>,
    /// Placement order; also the deterministic iteration order.
    order: Vec<PlayerId>,
    board: Board,
    duel_history: Vector<Duel>,
    status: GameStatus,
    turn_challenger: Option<PlayerId>,
    rng: GameRng,
}

impl Game {
    /// Create a game on a `rows x cols` board with an entropy-seeded RNG.
    pub fn new(players: Vec<Player>, rows: u32, cols: u32) -> GameResult<Self> {
        Self::with_rng(players, rows, cols, GameRng::from_entropy())
    }

    /// Create a game from a config.
    pub fn with_config(players: Vec<Player>, config: &GameConfig) -> GameResult<Self> {
        Self::with_rng(players, config.rows, config.cols, config.make_rng())
    }

    /// Create a game with an explicit randomness source.
    ///
    /// Players are placed in row-major order in the order given.
    pub fn with_rng(mut players: Vec<Player>, rows: u32, cols: u32, rng: GameRng) -> GameResult<Self> {
        // Player count is checked before the grid is allocated.
        let capacity = Board::capacity_for(rows, cols)?;
        if players.len() != capacity {
            return Err(GameError::CardinalityMismatch {
                expected: capacity,
                actual: players.len(),
            });
        }

        let mut seen = FxHashSet::default();
        for p in &players {
            if !seen.insert(p.id()) {
                return Err(GameError::DuplicatePlayer(p.id()));
            }
        }

        let mut board = Board::new(rows, cols)?;
        board.place_players(&mut players)?;

        let order: Vec<PlayerId> = players.iter().map(Player::id).collect();
        let players = players.into_iter().map(|p| (p.id(), p)).collect();

        debug!(rows, cols, players = order.len(), "game created");

        Ok(Self {
            players,
            order,
            board,
            duel_history: Vector::new(),
            status: GameStatus::Active,
            turn_challenger: None,
            rng,
        })
    }

    /// Assemble a game from already-validated parts.
    pub(crate) fn from_parts(
        players: Vec<Player>,
        board: Board,
        duel_history: Vector<Duel>,
        status: GameStatus,
        turn_challenger: Option<PlayerId>,
        rng: GameRng,
    ) -> Self {
        let order = players.iter().map(Player::id).collect();
        let players = players.into_iter().map(|p| (p.id(), p)).collect();
        Self {
            players,
            order,
            board,
            duel_history,
            status,
            turn_challenger,
            rng,
        }
    }

    // === Queries ===

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn rows(&self) -> u32 {
        self.board.rows()
    }

    #[must_use]
    pub fn cols(&self) -> u32 {
        self.board.cols()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.board.capacity()
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    fn require_player(&self, id: PlayerId) -> GameResult<&Player> {
        self.players.get(&id).ok_or(GameError::UnknownPlayer(id))
    }

    fn require_player_mut(&mut self, id: PlayerId) -> GameResult<&mut Player> {
        self.players.get_mut(&id).ok_or(GameError::UnknownPlayer(id))
    }

    /// All players in placement order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.order.iter().filter_map(|id| self.players.get(id))
    }

    /// Players not yet eliminated, in placement order.
    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players().filter(|p| !p.is_eliminated())
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Over { .. })
    }

    #[must_use]
    pub fn winner_id(&self) -> Option<PlayerId> {
        match self.status {
            GameStatus::Over { winner } => Some(winner),
            GameStatus::Active => None,
        }
    }

    /// Challenger chosen by the most recent [`start_turn`](Self::start_turn).
    #[must_use]
    pub fn turn_challenger_id(&self) -> Option<PlayerId> {
        self.turn_challenger
    }

    #[must_use]
    pub fn duel(&self, id: DuelId) -> Option<&Duel> {
        self.duel_history.get(id.index())
    }

    /// Every duel issued so far, oldest first.
    #[must_use]
    pub fn duel_history(&self) -> &Vector<Duel> {
        &self.duel_history
    }

    /// Duels issued but not yet resolved.
    pub fn pending_duels(&self) -> impl Iterator<Item = &Duel> {
        self.duel_history.iter().filter(|d| !d.is_resolved())
    }

    /// Winner of a resolved duel.
    #[must_use]
    pub fn duel_winner(&self, id: DuelId) -> Option<&Player> {
        self.duel(id)?.winner().and_then(|w| self.player(w))
    }

    /// Loser of a resolved duel.
    #[must_use]
    pub fn duel_loser(&self, id: DuelId) -> Option<&Player> {
        self.duel(id)?.loser().and_then(|l| self.player(l))
    }

    /// Current RNG state, for snapshots.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    // === Player setup ===

    /// Declare a player's expertise.
    pub fn set_player_expertise(&mut self, id: PlayerId, category: Arc<Category>) -> GameResult<()> {
        let player = self.require_player_mut(id)?;
        debug!(player = %id, category = %category, "expertise set");
        player.set_expertise(category);
        Ok(())
    }

    /// Rename a player.
    pub fn set_player_name(&mut self, id: PlayerId, name: impl Into<String>) -> GameResult<()> {
        self.require_player_mut(id)?.set_name(name);
        Ok(())
    }

    // === Duels ===

    /// Issue a challenge on the challenged player's declared expertise.
    ///
    /// The new duel is appended to the history and its id returned.
    pub fn challenge(&mut self, challenger: PlayerId, challenged: PlayerId) -> GameResult<DuelId> {
        if challenger == challenged {
            return Err(GameError::SelfChallenge(challenger));
        }

        let attacker = self.require_player(challenger)?;
        let defender = self.require_player(challenged)?;
        let category = defender
            .expertise()
            .cloned()
            .ok_or(GameError::NoExpertiseSet(challenged))?;

        for p in [attacker, defender] {
            if p.is_eliminated() {
                return Err(GameError::PlayerEliminated(p.id()));
            }
        }

        let id = DuelId::new(self.duel_history.len() as u32);
        debug!(duel = %id, %challenger, %challenged, category = %category, "challenge issued");
        self.duel_history.push_back(Duel::new(id, challenger, challenged, category));
        Ok(id)
    }

    /// Record a duel's winner and apply the outcome.
    ///
    /// The loser's cells all move to the winner and the loser is eliminated.
    /// The winner's expertise becomes the challenger's expertise, whichever
    /// side won. Fails with `UnknownDuel` for an id outside the history,
    /// `InvalidWinner` for a non-participant or an already resolved duel, and
    /// `PlayerEliminated` if a participant was knocked out after the challenge.
    pub fn resolve_duel(&mut self, id: DuelId, winner: PlayerId) -> GameResult<()> {
        let duel = self.duel(id).ok_or(GameError::UnknownDuel(id))?;
        duel.validate_winner(winner)?;

        let challenger = duel.challenger();
        let loser = if winner == challenger { duel.challenged() } else { challenger };

        for pid in [winner, loser] {
            if self.require_player(pid)?.is_eliminated() {
                return Err(GameError::PlayerEliminated(pid));
            }
        }

        let inherited = self.require_player(challenger)?.expertise().cloned();
        for &cell in self.require_player(loser)?.positions() {
            if self.board.owner_of(cell)? != Some(loser) {
                return Err(GameError::invariant(format!(
                    "{} lists {} but the board disagrees",
                    loser, cell
                )));
            }
        }

        // All checks passed; apply.
        if let Some(d) = self.duel_history.get_mut(id.index()) {
            d.resolve(winner)?;
        }

        let lost = self.require_player_mut(loser)?.eliminate();
        for &cell in &lost {
            self.board.transfer_cell(cell, loser, winner)?;
        }

        let victor = self.require_player_mut(winner)?;
        for &cell in &lost {
            victor.gain_cell(cell);
        }
        victor.set_expertise_opt(inherited);

        info!(duel = %id, %winner, %loser, cells = lost.len(), "player eliminated");

        self.update_status();
        Ok(())
    }

    fn update_status(&mut self) {
        if self.is_over() {
            return;
        }

        let (winner, cells) = {
            let mut alive = self.alive_players();
            match (alive.next(), alive.next()) {
                (Some(survivor), None) => (survivor.id(), survivor.cell_count()),
                _ => return,
            }
        };

        if cells == self.board.capacity() {
            info!(%winner, "game over");
            self.status = GameStatus::Over { winner };
        }
    }

    // === Turns ===

    /// Select and record the next challenger using the game's own RNG.
    ///
    /// Returns `None` (and clears the recorded challenger) when no player
    /// remains.
    pub fn start_turn(&mut self) -> Option<PlayerId> {
        let chosen = turn::pick_challenger(&self.players, &self.order, &mut self.rng);
        self.record_turn(chosen)
    }

    /// Select and record the next challenger using a caller-supplied RNG.
    pub fn start_turn_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<PlayerId> {
        let chosen = turn::pick_challenger(&self.players, &self.order, rng);
        self.record_turn(chosen)
    }

    fn record_turn(&mut self, chosen: Option<PlayerId>) -> Option<PlayerId> {
        self.turn_challenger = chosen;
        if let Some(id) = chosen {
            debug!(challenger = %id, "turn started");
        }
        chosen
    }

    /// Players the next turn may pick from, in placement order.
    #[must_use]
    pub fn challenger_candidates(&self) -> Vec<PlayerId> {
        turn::challenger_candidates(&self.players, &self.order)
    }

    // === Invariants ===

    /// Verify the cell partition and elimination consistency.
    ///
    /// - every cell has an owner that lists it among its positions
    /// - the positions of all players add up to the board capacity
    /// - a player is eliminated exactly when it owns no cells
    /// - an `Over` game's winner is the sole survivor owning every cell
    pub fn check_invariants(&self) -> GameResult<()> {
        for (cell, owner) in self.board.iter() {
            let owner = owner.ok_or_else(|| GameError::invariant(format!("cell {} has no owner", cell)))?;
            let player = self
                .player(owner)
                .ok_or_else(|| GameError::invariant(format!("cell {} owned by unknown {}", cell, owner)))?;
            if !player.owns(cell) {
                return Err(GameError::invariant(format!(
                    "board gives {} to {}, which does not list it",
                    cell, owner
                )));
            }
        }

        let total: usize = self.players.values().map(Player::cell_count).sum();
        if total != self.board.capacity() {
            return Err(GameError::invariant(format!(
                "players list {} cells, board has {}",
                total,
                self.board.capacity()
            )));
        }

        for p in self.players.values() {
            if p.is_eliminated() != p.positions().is_empty() {
                return Err(GameError::invariant(format!(
                    "{} eliminated={} with {} cells",
                    p.id(),
                    p.is_eliminated(),
                    p.cell_count()
                )));
            }
        }

        if let GameStatus::Over { winner } = self.status {
            let sole = self.alive_players().count() == 1;
            let owns_all = self
                .player(winner)
                .is_some_and(|p| p.cell_count() == self.board.capacity());
            if !sole || !owns_all {
                return Err(GameError::invariant(format!(
                    "game over for {} but it does not hold the whole board alone",
                    winner
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::core::{ErrorKind, WinnerRejection};

    fn players(n: u32) -> Vec<Player> {
        (1..=n).map(|i| Player::new(PlayerId::new(i), format!("P{}", i))).collect()
    }

    fn game(rows: u32, cols: u32) -> Game {
        let n = rows * cols;
        Game::with_config(players(n), &GameConfig::new(rows, cols).with_seed(42)).unwrap()
    }

    fn cat(name: &str) -> Arc<Category> {
        Arc::new(Category::new(name))
    }

    fn pid(i: u32) -> PlayerId {
        PlayerId::new(i)
    }

    #[test]
    fn test_new_game_places_players() {
        let g = game(2, 2);

        assert_eq!(g.status(), GameStatus::Active);
        assert_eq!(g.capacity(), 4);
        assert_eq!(g.player(pid(3)).unwrap().primary_position(), Some(Cell::new(1, 0)));
        assert!(g.duel_history().is_empty());
        assert_eq!(g.turn_challenger_id(), None);
        g.check_invariants().unwrap();
    }

    #[test]
    fn test_duplicate_player_ids_rejected() {
        let ps = vec![Player::new(pid(1), "A"), Player::new(pid(1), "B")];
        let err = Game::new(ps, 1, 2).unwrap_err();
        assert_eq!(err, GameError::DuplicatePlayer(pid(1)));
    }

    #[test]
    fn test_invalid_dimension() {
        let err = Game::new(Vec::new(), 0, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDimension);
    }

    #[test]
    fn test_set_expertise_unknown_player() {
        let mut g = game(1, 2);
        let err = g.set_player_expertise(pid(9), cat("Art")).unwrap_err();
        assert_eq!(err, GameError::UnknownPlayer(pid(9)));
    }

    #[test]
    fn test_challenge_checks() {
        let mut g = game(1, 3);

        assert_eq!(g.challenge(pid(1), pid(1)), Err(GameError::SelfChallenge(pid(1))));
        assert_eq!(g.challenge(pid(1), pid(7)), Err(GameError::UnknownPlayer(pid(7))));
        assert_eq!(g.challenge(pid(7), pid(1)), Err(GameError::UnknownPlayer(pid(7))));
        assert_eq!(g.challenge(pid(1), pid(2)), Err(GameError::NoExpertiseSet(pid(2))));
        assert!(g.duel_history().is_empty());
    }

    #[test]
    fn test_challenge_uses_defender_category() {
        let mut g = game(1, 2);
        let science = cat("Science");
        g.set_player_expertise(pid(1), cat("History")).unwrap();
        g.set_player_expertise(pid(2), science.clone()).unwrap();

        let id = g.challenge(pid(1), pid(2)).unwrap();

        let duel = g.duel(id).unwrap();
        assert!(Arc::ptr_eq(duel.category(), &science));
        assert_eq!(duel.challenger(), pid(1));
        assert_eq!(duel.challenged(), pid(2));
        assert_eq!(g.pending_duels().count(), 1);
    }

    #[test]
    fn test_resolve_transfers_and_eliminates() {
        let mut g = game(1, 3);
        let history = cat("History");
        g.set_player_expertise(pid(1), history.clone()).unwrap();
        g.set_player_expertise(pid(2), cat("Science")).unwrap();

        let id = g.challenge(pid(1), pid(2)).unwrap();
        g.resolve_duel(id, pid(2)).unwrap();

        let winner = g.player(pid(2)).unwrap();
        assert_eq!(winner.cell_count(), 2);
        assert!(winner.owns(Cell::new(0, 0)));
        assert!(Arc::ptr_eq(winner.expertise().unwrap(), &history));
        assert!(g.player(pid(1)).unwrap().is_eliminated());
        assert_eq!(g.board().owner_at(0, 0).unwrap(), Some(pid(2)));
        assert_eq!(g.duel_winner(id).unwrap().id(), pid(2));
        assert_eq!(g.duel_loser(id).unwrap().id(), pid(1));
        assert_eq!(g.status(), GameStatus::Active);
        g.check_invariants().unwrap();
    }

    #[test]
    fn test_resolve_moves_every_loser_cell() {
        let mut g = game(2, 2);
        for i in 1..=4 {
            g.set_player_expertise(pid(i), cat("Art")).unwrap();
        }
        let d = g.challenge(pid(3), pid(4)).unwrap();
        g.resolve_duel(d, pid(3)).unwrap();
        let taken = g.player(pid(3)).unwrap().positions().clone();

        let d = g.challenge(pid(1), pid(3)).unwrap();
        g.resolve_duel(d, pid(1)).unwrap();

        let winner = g.player(pid(1)).unwrap();
        assert_eq!(winner.cell_count(), 3);
        assert!(taken.iter().all(|&cell| winner.owns(cell)));
        assert!(g.player(pid(3)).unwrap().positions().is_empty());
        for &cell in &taken {
            assert_eq!(g.board().owner_of(cell).unwrap(), Some(pid(1)));
        }
        g.check_invariants().unwrap();
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_construction_checks_count_before_allocating() {
        let err = Game::new(players(2), u32::MAX, u32::MAX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CardinalityMismatch);

        let err = Game::new(players(2), 100_000, 100_000).unwrap_err();
        assert_eq!(err, GameError::CardinalityMismatch { expected: 10_000_000_000, actual: 2 });
    }

    #[test]
    fn test_resolve_unknown_duel() {
        let mut g = game(1, 2);
        assert_eq!(
            g.resolve_duel(DuelId::new(0), pid(1)),
            Err(GameError::UnknownDuel(DuelId::new(0)))
        );
    }

    #[test]
    fn test_resolve_twice_rejected_without_changes() {
        let mut g = game(1, 3);
        g.set_player_expertise(pid(2), cat("Science")).unwrap();
        let id = g.challenge(pid(1), pid(2)).unwrap();
        g.resolve_duel(id, pid(1)).unwrap();

        let before = g.snapshot();
        let err = g.resolve_duel(id, pid(1)).unwrap_err();

        assert!(matches!(
            err,
            GameError::InvalidWinner {
                reason: WinnerRejection::AlreadyResolved,
                ..
            }
        ));
        assert_eq!(g.snapshot(), before);
    }

    #[test]
    fn test_resolve_non_participant() {
        let mut g = game(1, 3);
        g.set_player_expertise(pid(2), cat("Science")).unwrap();
        let id = g.challenge(pid(1), pid(2)).unwrap();

        let err = g.resolve_duel(id, pid(3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidWinner);
        assert!(!g.duel(id).unwrap().is_resolved());
    }

    #[test]
    fn test_stale_duel_rejected() {
        let mut g = game(1, 3);
        g.set_player_expertise(pid(2), cat("Science")).unwrap();
        g.set_player_expertise(pid(3), cat("Art")).unwrap();

        let first = g.challenge(pid(1), pid(2)).unwrap();
        let second = g.challenge(pid(3), pid(2)).unwrap();
        g.resolve_duel(first, pid(1)).unwrap();

        assert_eq!(g.resolve_duel(second, pid(2)), Err(GameError::PlayerEliminated(pid(2))));
        assert!(!g.duel(second).unwrap().is_resolved());
        g.check_invariants().unwrap();
    }

    #[test]
    fn test_game_over() {
        let mut g = game(1, 3);
        g.set_player_expertise(pid(2), cat("Science")).unwrap();
        g.set_player_expertise(pid(3), cat("Art")).unwrap();

        let d1 = g.challenge(pid(1), pid(2)).unwrap();
        g.resolve_duel(d1, pid(1)).unwrap();
        assert!(!g.is_over());

        let d2 = g.challenge(pid(1), pid(3)).unwrap();
        g.resolve_duel(d2, pid(1)).unwrap();

        assert_eq!(g.status(), GameStatus::Over { winner: pid(1) });
        assert_eq!(g.winner_id(), Some(pid(1)));
        assert_eq!(g.player(pid(1)).unwrap().cell_count(), 3);
        g.check_invariants().unwrap();

        // Nobody left to challenge
        assert_eq!(g.challenge(pid(1), pid(3)), Err(GameError::PlayerEliminated(pid(3))));
    }

    #[test]
    fn test_start_turn_records_challenger() {
        let mut g = game(1, 3);

        let chosen = g.start_turn().unwrap();

        assert_eq!(g.turn_challenger_id(), Some(chosen));
        assert!(g.challenger_candidates().contains(&chosen));
    }

    #[test]
    fn test_start_turn_prefers_single_cell() {
        let mut g = game(1, 3);
        g.set_player_expertise(pid(2), cat("Science")).unwrap();
        let id = g.challenge(pid(1), pid(2)).unwrap();
        g.resolve_duel(id, pid(1)).unwrap();

        for _ in 0..50 {
            assert_eq!(g.start_turn(), Some(pid(3)));
        }
    }

    #[test]
    fn test_start_turn_with_injected_rng() {
        let mut a = game(2, 2);
        let mut b = game(2, 2);
        let mut rng_a = GameRng::new(5);
        let mut rng_b = GameRng::new(5);

        for _ in 0..10 {
            assert_eq!(a.start_turn_with(&mut rng_a), b.start_turn_with(&mut rng_b));
        }
    }

    #[test]
    fn test_set_player_name() {
        let mut g = game(1, 2);
        g.set_player_name(pid(1), "Alice").unwrap();
        assert_eq!(g.player(pid(1)).unwrap().name(), "Alice");
        assert!(g.set_player_name(pid(5), "X").is_err());
    }
}
