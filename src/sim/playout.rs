//! Random-adjudication playouts.
//!
//! A playout drives a game to completion without any real questions: each
//! turn picks a challenger with [`Game::start_turn`], targets a random
//! remaining opponent, and flips a weighted coin for the winner. Players
//! without an expertise are given a random catalog category first.
//! Playouts are used for soak-testing the engine and by the `floor-sim`
//! binary.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::categories::{Category, CategoryCatalog};
use crate::core::{GameConfig, GameError, GameResult, GameRng, Player, PlayerId};
use crate::game::Game;

/// Configuration for playouts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayoutConfig {
    /// Maximum turns before giving up.
    pub max_turns: usize,

    /// Probability that the challenger wins a duel.
    pub challenger_win_rate: f64,

    /// Seed for adjudication and opponent choice.
    pub seed: u64,
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        Self {
            max_turns: 10_000,
            challenger_win_rate: 0.5,
            seed: 0,
        }
    }
}

impl PlayoutConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum turns per playout.
    #[must_use]
    pub fn with_max_turns(mut self, max: usize) -> Self {
        self.max_turns = max;
        self
    }

    /// Set the challenger's chance of winning each duel.
    #[must_use]
    pub fn with_challenger_win_rate(mut self, rate: f64) -> Self {
        self.challenger_win_rate = rate;
        self
    }

    /// Set the adjudication seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Outcome of a single playout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoutSummary {
    /// Winner, or `None` if `max_turns` ran out first.
    pub winner: Option<PlayerId>,
    /// Turns started.
    pub turns: usize,
    /// Duels resolved.
    pub duels: usize,
    /// Players in the order they were eliminated.
    pub eliminated_order: Vec<PlayerId>,
}

/// Drives one game with random adjudication.
pub struct Playout {
    config: PlayoutConfig,
    rng: GameRng,
    categories: Vec<Arc<Category>>,
}

impl Playout {
    /// Create a playout drawing expertise from `catalog`.
    ///
    /// An empty catalog falls back to a single "General" category.
    pub fn new(config: PlayoutConfig, catalog: &CategoryCatalog) -> Self {
        let mut categories: Vec<_> = catalog.iter().map(|(_, c)| c.clone()).collect();
        if categories.is_empty() {
            categories.push(Arc::new(Category::new("General")));
        }

        Self {
            rng: GameRng::new(config.seed),
            config,
            categories,
        }
    }

    /// Build a fresh game with numbered players and play it out.
    pub fn run_new(&mut self, game_config: &GameConfig) -> GameResult<(Game, PlayoutSummary)> {
        let capacity = game_config.capacity();
        let count = u32::try_from(capacity).map_err(|_| GameError::CardinalityMismatch {
            expected: capacity,
            actual: u32::MAX as usize,
        })?;
        let players = (1..=count)
            .map(|i| Player::new(PlayerId::new(i), format!("Player {}", i)))
            .collect();
        let mut game = Game::with_config(players, game_config)?;
        let summary = self.run(&mut game)?;
        Ok((game, summary))
    }

    /// Play `game` until it is over or the turn limit is hit.
    pub fn run(&mut self, game: &mut Game) -> GameResult<PlayoutSummary> {
        let mut summary = PlayoutSummary {
            winner: game.winner_id(),
            turns: 0,
            duels: 0,
            eliminated_order: Vec::new(),
        };

        while !game.is_over() && summary.turns < self.config.max_turns {
            let Some(challenger) = game.start_turn() else {
                break;
            };
            summary.turns += 1;

            let opponents: Vec<PlayerId> = game
                .alive_players()
                .map(Player::id)
                .filter(|&id| id != challenger)
                .collect();
            let Some(&challenged) = self.rng.choose(&opponents) else {
                break;
            };

            let needs_expertise = game
                .player(challenged)
                .ok_or(GameError::UnknownPlayer(challenged))?
                .expertise()
                .is_none();
            if needs_expertise {
                if let Some(category) = self.rng.choose(&self.categories).cloned() {
                    game.set_player_expertise(challenged, category)?;
                }
            }

            let duel = game.challenge(challenger, challenged)?;
            let (winner, loser) = if self.rng.gen_bool(self.config.challenger_win_rate) {
                (challenger, challenged)
            } else {
                (challenged, challenger)
            };
            game.resolve_duel(duel, winner)?;

            summary.duels += 1;
            summary.eliminated_order.push(loser);
            debug!(turn = summary.turns, %winner, %loser, "playout duel");

            #[cfg(debug_assertions)]
            game.check_invariants()?;
        }

        summary.winner = game.winner_id();
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DuelId;
    use crate::game::GameStatus;

    fn catalog() -> CategoryCatalog {
        let mut catalog = CategoryCatalog::new();
        catalog.extend_from_csv("History, Science, Art");
        catalog
    }

    #[test]
    fn test_playout_finishes() {
        let mut playout = Playout::new(PlayoutConfig::new().with_seed(3), &catalog());

        let (game, summary) = playout.run_new(&GameConfig::new(3, 4).with_seed(3)).unwrap();

        // Every duel eliminates exactly one player
        assert_eq!(summary.duels, 11);
        assert_eq!(summary.eliminated_order.len(), 11);
        assert!(game.is_over());
        assert_eq!(game.status(), GameStatus::Over { winner: summary.winner.unwrap() });
        game.check_invariants().unwrap();
    }

    #[test]
    fn test_playout_deterministic() {
        let run = || {
            let mut playout = Playout::new(PlayoutConfig::new().with_seed(8), &catalog());
            playout.run_new(&GameConfig::square(3).with_seed(8)).unwrap().1
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_turn_limit() {
        let mut playout = Playout::new(PlayoutConfig::new().with_max_turns(2), &catalog());

        let (game, summary) = playout.run_new(&GameConfig::square(3).with_seed(1)).unwrap();

        assert_eq!(summary.turns, 2);
        assert_eq!(summary.winner, None);
        assert!(!game.is_over());
        assert_eq!(game.alive_players().count(), 7);
    }

    #[test]
    fn test_empty_catalog_fallback() {
        let mut playout = Playout::new(PlayoutConfig::new().with_seed(5), &CategoryCatalog::new());

        let (game, summary) = playout.run_new(&GameConfig::new(1, 2).with_seed(5)).unwrap();

        assert_eq!(summary.duels, 1);
        let duel = game.duel(DuelId::new(0)).unwrap();
        assert_eq!(duel.category().name(), "General");
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_board_too_large_for_player_ids() {
        let mut playout = Playout::new(PlayoutConfig::new(), &catalog());

        let err = playout.run_new(&GameConfig::new(u32::MAX, 2)).unwrap_err();

        assert_eq!(err.kind(), crate::core::ErrorKind::CardinalityMismatch);
    }

    #[test]
    fn test_config_builder() {
        let config = PlayoutConfig::new()
            .with_max_turns(50)
            .with_challenger_win_rate(0.8)
            .with_seed(4);

        assert_eq!(config.max_turns, 50);
        assert_eq!(config.challenger_win_rate, 0.8);
        assert_eq!(config.seed, 4);
    }
}
