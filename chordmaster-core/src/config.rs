use std::path::PathBuf;

use serde::Deserialize;

use crate::game::generator::DEFAULT_MAX_ATTEMPTS;
use crate::game::scoring::ScoringRules;
use crate::leaderboard::DEFAULT_CAPACITY;
use chordmaster_types::ChordQuality;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

pub const DEFAULT_ROUNDS_PER_GAME: usize = 10;

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    game: GameConfig,
    #[serde(default)]
    scoring: ScoringConfig,
    #[serde(default)]
    leaderboard: LeaderboardConfig,
    #[serde(default)]
    midi: MidiConfig,
}

#[derive(Deserialize, Default)]
struct GameConfig {
    rounds_per_game: Option<usize>,
    qualities: Option<Vec<String>>,
    max_generation_attempts: Option<u32>,
}

#[derive(Deserialize, Default)]
struct ScoringConfig {
    max_base_score: Option<u32>,
    min_base_score: Option<u32>,
    smooth_intervals: Option<Vec<u8>>,
}

#[derive(Deserialize, Default)]
struct LeaderboardConfig {
    capacity: Option<usize>,
}

#[derive(Deserialize, Default)]
struct MidiConfig {
    port: Option<usize>,
}

/// Game settings: embedded defaults merged with the user's config file.
pub struct Config {
    game: GameConfig,
    scoring: ScoringConfig,
    leaderboard: LeaderboardConfig,
    midi: MidiConfig,
}

impl Config {
    pub fn load() -> Self {
        let mut config = Self::embedded();

        if let Some(path) = user_config_path() {
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(contents) => {
                        if let Err(e) = config.merge_str(&contents) {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    }
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        config
    }

    /// Defaults only, without looking at the user's config directory.
    pub fn embedded() -> Self {
        let base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");
        Config {
            game: base.game,
            scoring: base.scoring,
            leaderboard: base.leaderboard,
            midi: base.midi,
        }
    }

    /// Overlay settings from TOML text; keys absent from `contents` are kept.
    pub fn merge_str(&mut self, contents: &str) -> Result<(), toml::de::Error> {
        let user: ConfigFile = toml::from_str(contents)?;
        merge_game(&mut self.game, user.game);
        merge_scoring(&mut self.scoring, user.scoring);
        if user.leaderboard.capacity.is_some() {
            self.leaderboard.capacity = user.leaderboard.capacity;
        }
        if user.midi.port.is_some() {
            self.midi.port = user.midi.port;
        }
        Ok(())
    }

    /// Rounds in one game (at least 1).
    pub fn rounds_per_game(&self) -> usize {
        self.game
            .rounds_per_game
            .unwrap_or(DEFAULT_ROUNDS_PER_GAME)
            .max(1)
    }

    pub fn set_rounds_per_game(&mut self, rounds: usize) {
        self.game.rounds_per_game = Some(rounds);
    }

    /// Enabled target qualities, in identification order.
    pub fn qualities(&self) -> Vec<ChordQuality> {
        let mut qualities = Vec::new();
        for name in self.game.qualities.iter().flatten() {
            match ChordQuality::parse(name) {
                Some(q) if !qualities.contains(&q) => qualities.push(q),
                Some(_) => {}
                None => log::warn!(target: "config", "unknown chord quality {:?}", name),
            }
        }
        if qualities.is_empty() {
            qualities = vec![ChordQuality::Major, ChordQuality::Minor];
        }
        qualities
    }

    pub fn max_generation_attempts(&self) -> u32 {
        self.game
            .max_generation_attempts
            .unwrap_or(DEFAULT_MAX_ATTEMPTS)
            .max(1)
    }

    pub fn scoring_rules(&self) -> ScoringRules {
        let fallback = ScoringRules::default();
        let max_base_score = self.scoring.max_base_score.unwrap_or(fallback.max_base_score);
        let min_base_score = self
            .scoring
            .min_base_score
            .unwrap_or(fallback.min_base_score)
            .min(max_base_score);
        let smooth_intervals = match &self.scoring.smooth_intervals {
            Some(intervals) => intervals.iter().map(|i| i % 12).collect(),
            None => fallback.smooth_intervals,
        };
        ScoringRules {
            max_base_score,
            min_base_score,
            smooth_intervals,
        }
    }

    pub fn leaderboard_capacity(&self) -> usize {
        self.leaderboard.capacity.unwrap_or(DEFAULT_CAPACITY).max(1)
    }

    pub fn midi_port(&self) -> usize {
        self.midi.port.unwrap_or(0)
    }

    pub fn set_midi_port(&mut self, port: usize) {
        self.midi.port = Some(port);
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("chordmaster").join("config.toml"))
}

fn merge_game(base: &mut GameConfig, user: GameConfig) {
    if user.rounds_per_game.is_some() {
        base.rounds_per_game = user.rounds_per_game;
    }
    if user.qualities.is_some() {
        base.qualities = user.qualities;
    }
    if user.max_generation_attempts.is_some() {
        base.max_generation_attempts = user.max_generation_attempts;
    }
}

fn merge_scoring(base: &mut ScoringConfig, user: ScoringConfig) {
    if user.max_base_score.is_some() {
        base.max_base_score = user.max_base_score;
    }
    if user.min_base_score.is_some() {
        base.min_base_score = user.min_base_score;
    }
    if user.smooth_intervals.is_some() {
        base.smooth_intervals = user.smooth_intervals;
    }
}
