//! Events emitted by the game core for the presentation layer.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chord::{Chord, Spelling};

/// How the highest voice moved between this correct chord and the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceLeading {
    /// First correct chord of the session; nothing to compare against yet.
    Established,
    /// Smooth motion; the streak multiplier grew to `multiplier`.
    Achieved { multiplier: u32 },
    /// Non-smooth motion ended a streak that had reached `previous_multiplier`.
    Broken { previous_multiplier: u32 },
    /// Non-smooth motion with no streak active.
    None,
}

/// Score breakdown for one correctly played chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub base_score: u32,
    pub bonus: u32,
    /// Multiplier after this match was evaluated.
    pub multiplier: u32,
    /// Cumulative session score including this round.
    pub total_score: u64,
    pub elapsed: Duration,
    pub voice_leading: VoiceLeading,
}

impl MatchOutcome {
    /// Points this round added to the total.
    pub fn round_score(&self) -> u32 {
        self.base_score.saturating_add(self.bonus)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted {
        /// Zero-based index of the round within the game.
        round_index: usize,
        total_rounds: usize,
        target: Chord,
        name: String,
        spelling: Spelling,
    },
    ChordMatched(MatchOutcome),
    VoiceLeadingAchieved {
        multiplier: u32,
    },
    StreakBroken {
        previous_multiplier: u32,
    },
    /// Wrong chord held. `identified` names it when it is a known triad.
    Mismatch {
        identified: Option<String>,
    },
    GameOver {
        final_score: u64,
        rounds: usize,
    },
}
