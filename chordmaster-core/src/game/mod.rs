//! The game core: held notes, target generation, matching, scoring and the
//! round state machine that ties them together.

pub mod controller;
pub mod generator;
pub mod matcher;
pub mod scoring;
pub mod tracker;

pub use controller::{Phase, RoundController, RoundState};
pub use generator::ChordGenerator;
pub use matcher::ChordMatcher;
pub use scoring::{ScoringEngine, ScoringRules, StreakState};
pub use tracker::HeldNotes;

use chordmaster_types::ChordQuality;

use crate::config::{Config, DEFAULT_ROUNDS_PER_GAME};

/// Everything a session needs from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    pub rounds_per_game: usize,
    /// Target qualities; also the identification search order.
    pub qualities: Vec<ChordQuality>,
    pub max_generation_attempts: u32,
    pub scoring: ScoringRules,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            rounds_per_game: DEFAULT_ROUNDS_PER_GAME,
            qualities: vec![ChordQuality::Major, ChordQuality::Minor],
            max_generation_attempts: generator::DEFAULT_MAX_ATTEMPTS,
            scoring: ScoringRules::default(),
        }
    }
}

impl GameSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            rounds_per_game: config.rounds_per_game(),
            qualities: config.qualities(),
            max_generation_attempts: config.max_generation_attempts(),
            scoring: config.scoring_rules(),
        }
    }
}
