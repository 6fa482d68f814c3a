//! Cross-level progression and the state shared by every tick
//!
//! `SimulationContext` owns what outlives a single level: the current
//! attempt, the seeded RNG and the bonus registry. Each tick borrows them as
//! a `FrameContext` so entity code never reaches for globals.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bonus::BonusRegistry;
use super::game::Game;
use super::levels::{MAX_LEVEL, create_level};
use crate::settings::Settings;
use crate::{LevelId, Lives, Score};

/// One play session: lives and score carried across levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    lives: Lives,
    score: Score,
    next_level: LevelId,
}

impl Attempt {
    pub fn new(lives: Lives, first_level: LevelId) -> Self {
        Self {
            lives,
            score: 0,
            next_level: first_level,
        }
    }

    pub fn lives(&self) -> Lives {
        self.lives
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn next_level(&self) -> LevelId {
        self.next_level
    }

    pub fn add_lives(&mut self, lives: Lives) {
        self.lives = self.lives.saturating_add(lives);
    }

    /// Lives never go below zero
    pub fn remove_lives(&mut self, lives: Lives) {
        self.lives = self.lives.saturating_sub(lives);
    }

    pub fn increase_score(&mut self, amount: Score) {
        self.score = self.score.saturating_add(amount);
    }

    /// Build the next level in the sequence and serve a ball on it
    pub fn start_next_level(&mut self) -> Game {
        let level = create_level(self.next_level);
        self.next_level = if self.next_level >= MAX_LEVEL {
            0
        } else {
            self.next_level + 1
        };

        log::info!(
            "Starting level {} with {} lives, score {}",
            level.id(),
            self.lives,
            self.score
        );

        let mut game = Game::new(level);
        game.reset_balls();
        game
    }
}

/// Borrowed view of the context for one tick
pub struct FrameContext<'a> {
    pub attempt: &'a mut Attempt,
    pub rng: &'a mut Pcg32,
    pub bonuses: &'a BonusRegistry,
    pub bonus_chance: f32,
}

/// Everything the simulation needs besides the game itself
#[derive(Debug, Clone)]
pub struct SimulationContext {
    settings: Settings,
    rng: Pcg32,
    bonuses: BonusRegistry,
    attempt: Option<Attempt>,
}

impl SimulationContext {
    pub fn new(settings: Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::debug!("Simulation seed {seed}");

        Self {
            settings,
            rng: Pcg32::seed_from_u64(seed),
            bonuses: BonusRegistry::default(),
            attempt: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn bonuses(&self) -> &BonusRegistry {
        &self.bonuses
    }

    /// Registry access for adding custom bonus kinds
    pub fn bonuses_mut(&mut self) -> &mut BonusRegistry {
        &mut self.bonuses
    }

    pub fn attempt(&self) -> Option<&Attempt> {
        self.attempt.as_ref()
    }

    pub fn attempt_mut(&mut self) -> Option<&mut Attempt> {
        self.attempt.as_mut()
    }

    /// Begin a fresh attempt. Returns false (and keeps the current one) if an
    /// attempt is already in progress.
    pub fn start_attempt(&mut self) -> bool {
        if self.attempt.is_some() {
            log::warn!("An attempt is already in progress");
            return false;
        }

        log::info!("Starting attempt with {} lives", self.settings.starting_lives);
        self.attempt = Some(Attempt::new(
            self.settings.starting_lives,
            self.settings.first_level,
        ));
        true
    }

    /// Finish the current attempt, returning it
    pub fn end_attempt(&mut self) -> Option<Attempt> {
        let attempt = self.attempt.take();
        match &attempt {
            Some(attempt) => log::info!("Attempt ended with score {}", attempt.score()),
            None => log::warn!("No attempt to end"),
        }
        attempt
    }

    /// Drop any attempt in progress and play the first level of a new one
    pub fn start_game(&mut self) -> Option<Game> {
        if self.attempt.is_some() {
            self.end_attempt();
        }
        self.start_attempt();
        self.start_next_level()
    }

    /// Continue the current attempt on its next level
    pub fn start_next_level(&mut self) -> Option<Game> {
        match self.attempt.as_mut() {
            Some(attempt) => Some(attempt.start_next_level()),
            None => {
                log::warn!("No attempt in progress, cannot start a level");
                None
            }
        }
    }

    /// Borrow the per-tick view. None without an attempt.
    pub fn frame(&mut self) -> Option<FrameContext<'_>> {
        let attempt = self.attempt.as_mut()?;
        Some(FrameContext {
            attempt,
            rng: &mut self.rng,
            bonuses: &self.bonuses,
            bonus_chance: self.settings.bonus_chance,
        })
    }
}
