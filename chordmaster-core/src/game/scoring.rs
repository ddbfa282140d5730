//! Time-decay base score and the voice-leading streak.
//!
//! A correct chord earns `max(max_base - deciseconds, min_base)`. When the
//! highest note moved by a "smooth" distance from the previous correct
//! chord's highest note, the streak multiplier grows and the round also
//! earns `base * (multiplier - 1)`. Any other motion, or any wrong chord,
//! drops the multiplier back to 1.

use std::time::Duration;

use chordmaster_types::{MatchOutcome, VoiceLeading};

/// Scoring constants, normally taken from the `[scoring]` config table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringRules {
    pub max_base_score: u32,
    pub min_base_score: u32,
    /// Top-note distances (semitones mod 12) that extend a streak.
    pub smooth_intervals: Vec<u8>,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            max_base_score: 100,
            min_base_score: 10,
            smooth_intervals: vec![0, 1, 2, 5, 7],
        }
    }
}

impl ScoringRules {
    /// Base score for a chord found after `elapsed`: one point off per whole
    /// decisecond, never below `min_base_score`.
    pub fn base_score(&self, elapsed: Duration) -> u32 {
        let deciseconds = elapsed.as_millis() / 100;
        let penalty = u32::try_from(deciseconds).unwrap_or(u32::MAX);
        self.max_base_score
            .saturating_sub(penalty)
            .max(self.min_base_score)
    }

    pub fn is_smooth(&self, distance: u8) -> bool {
        self.smooth_intervals.contains(&(distance % 12))
    }
}

/// Distance between two top notes as used by the streak rule:
/// absolute semitone difference, reduced mod 12.
pub fn top_note_distance(a: u8, b: u8) -> u8 {
    ((i16::from(a) - i16::from(b)).unsigned_abs() % 12) as u8
}

/// Voice-leading streak. Lives for a whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakState {
    /// 1 means no streak.
    pub multiplier: u32,
    /// Highest pitch of the last correct chord; `None` until the first one.
    pub previous_highest: Option<u8>,
}

impl Default for StreakState {
    fn default() -> Self {
        Self {
            multiplier: 1,
            previous_highest: None,
        }
    }
}

impl StreakState {
    pub fn is_streaking(&self) -> bool {
        self.multiplier > 1
    }

    /// End an active streak. Returns the multiplier it had reached.
    fn break_streak(&mut self) -> Option<u32> {
        if self.is_streaking() {
            let previous = self.multiplier;
            self.multiplier = 1;
            Some(previous)
        } else {
            None
        }
    }
}

/// Owns the session's cumulative score and streak.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    rules: ScoringRules,
    streak: StreakState,
    total: u64,
}

impl ScoringEngine {
    pub fn new(rules: ScoringRules) -> Self {
        Self {
            rules,
            streak: StreakState::default(),
            total: 0,
        }
    }

    pub fn streak(&self) -> StreakState {
        self.streak
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Score a correct chord whose highest held pitch is `highest`, found
    /// `elapsed` after the round started.
    pub fn score_match(&mut self, highest: u8, elapsed: Duration) -> MatchOutcome {
        let base_score = self.rules.base_score(elapsed);
        let mut bonus = 0;

        let voice_leading = match self.streak.previous_highest {
            None => VoiceLeading::Established,
            Some(previous) => {
                let distance = top_note_distance(highest, previous);
                if self.rules.is_smooth(distance) {
                    self.streak.multiplier += 1;
                    bonus = base_score.saturating_mul(self.streak.multiplier - 1);
                    log::debug!(
                        "voice leading kept (distance {}), multiplier x{}",
                        distance,
                        self.streak.multiplier
                    );
                    VoiceLeading::Achieved {
                        multiplier: self.streak.multiplier,
                    }
                } else {
                    match self.streak.break_streak() {
                        Some(previous_multiplier) => {
                            log::debug!(
                                "voice leading broken (distance {}), was x{}",
                                distance,
                                previous_multiplier
                            );
                            VoiceLeading::Broken {
                                previous_multiplier,
                            }
                        }
                        None => VoiceLeading::None,
                    }
                }
            }
        };
        self.streak.previous_highest = Some(highest);

        self.total += u64::from(base_score) + u64::from(bonus);
        MatchOutcome {
            base_score,
            bonus,
            multiplier: self.streak.multiplier,
            total_score: self.total,
            elapsed,
            voice_leading,
        }
    }

    /// A wrong chord was held. Ends any active streak; the score is untouched.
    /// Returns the multiplier the streak had reached, if one was active.
    pub fn register_miss(&mut self) -> Option<u32> {
        let broken = self.streak.break_streak();
        if let Some(previous) = broken {
            log::debug!("wrong chord broke streak at x{}", previous);
        }
        broken
    }

    /// Back to a fresh session: zero score, no streak, no previous top note.
    pub fn reset(&mut self) {
        self.streak = StreakState::default();
        self.total = 0;
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringRules::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn base_score_decays_per_decisecond() {
        let rules = ScoringRules::default();
        assert_eq!(rules.base_score(Duration::ZERO), 100);
        assert_eq!(rules.base_score(Duration::from_millis(300)), 97);
        assert_eq!(rules.base_score(Duration::from_millis(399)), 97);
        assert_eq!(rules.base_score(secs(4.5)), 55);
        assert_eq!(rules.base_score(secs(9.0)), 10);
        assert_eq!(rules.base_score(secs(15.0)), 10);
        assert_eq!(rules.base_score(Duration::from_secs(1_000_000_000)), 10);
    }

    #[test]
    fn distance_is_abs_mod_12() {
        assert_eq!(top_note_distance(67, 60), 7);
        assert_eq!(top_note_distance(60, 67), 7);
        assert_eq!(top_note_distance(72, 60), 0);
        assert_eq!(top_note_distance(79, 60), 7);
        assert_eq!(top_note_distance(55, 60), 5);
        assert_eq!(top_note_distance(0, 127), 7);
    }

    #[test]
    fn first_match_sets_reference_only() {
        let mut engine = ScoringEngine::default();
        let outcome = engine.score_match(67, Duration::from_millis(300));
        assert_eq!(outcome.base_score, 97);
        assert_eq!(outcome.bonus, 0);
        assert_eq!(outcome.multiplier, 1);
        assert_eq!(outcome.voice_leading, VoiceLeading::Established);
        assert_eq!(engine.streak().previous_highest, Some(67));
        assert_eq!(engine.total(), 97);
    }

    #[test]
    fn fifth_motion_starts_streak() {
        let mut engine = ScoringEngine::default();
        engine.score_match(60, Duration::ZERO);
        let outcome = engine.score_match(67, Duration::from_millis(1_000));
        assert_eq!(outcome.base_score, 90);
        assert_eq!(outcome.multiplier, 2);
        assert_eq!(outcome.bonus, 90);
        assert_eq!(outcome.voice_leading, VoiceLeading::Achieved { multiplier: 2 });
        assert_eq!(outcome.total_score, 100 + 180);
    }

    #[test]
    fn streak_grows_without_cap() {
        let mut engine = ScoringEngine::default();
        engine.score_match(60, Duration::ZERO);
        for expected in 2..=15 {
            let outcome = engine.score_match(60, Duration::ZERO);
            assert_eq!(outcome.multiplier, expected);
            assert_eq!(outcome.bonus, 100 * (expected - 1));
        }
    }

    #[test]
    fn third_motion_breaks_streak() {
        let mut engine = ScoringEngine::default();
        engine.score_match(60, Duration::ZERO);
        engine.score_match(62, Duration::ZERO);
        engine.score_match(64, Duration::ZERO);
        assert_eq!(engine.streak().multiplier, 3);

        let outcome = engine.score_match(68, Duration::ZERO);
        assert_eq!(outcome.multiplier, 1);
        assert_eq!(outcome.bonus, 0);
        assert_eq!(
            outcome.voice_leading,
            VoiceLeading::Broken {
                previous_multiplier: 3
            }
        );
        assert_eq!(engine.streak().previous_highest, Some(68));
    }

    #[test]
    fn rough_motion_without_streak_is_quiet() {
        let mut engine = ScoringEngine::default();
        engine.score_match(60, Duration::ZERO);
        let outcome = engine.score_match(63, Duration::ZERO);
        assert_eq!(outcome.voice_leading, VoiceLeading::None);
        assert_eq!(outcome.multiplier, 1);
        assert_eq!(engine.streak().previous_highest, Some(63));
    }

    #[test]
    fn miss_breaks_streak_but_keeps_score() {
        let mut engine = ScoringEngine::default();
        engine.score_match(60, Duration::ZERO);
        engine.score_match(67, Duration::ZERO);
        let total = engine.total();
        assert_eq!(engine.register_miss(), Some(2));
        assert_eq!(engine.streak().multiplier, 1);
        assert_eq!(engine.streak().previous_highest, Some(67));
        assert_eq!(engine.total(), total);
        assert_eq!(engine.register_miss(), None);
    }

    #[test]
    fn configured_smooth_set_is_used() {
        let mut engine = ScoringEngine::new(ScoringRules {
            smooth_intervals: vec![3, 4],
            ..ScoringRules::default()
        });
        engine.score_match(60, Duration::ZERO);
        let outcome = engine.score_match(64, Duration::ZERO);
        assert_eq!(outcome.multiplier, 2);
        let outcome = engine.score_match(71, Duration::ZERO);
        assert_eq!(outcome.multiplier, 1);
    }

    #[test]
    fn reset_clears_everything() {
        let mut engine = ScoringEngine::default();
        engine.score_match(60, Duration::ZERO);
        engine.score_match(60, Duration::ZERO);
        engine.reset();
        assert_eq!(engine.total(), 0);
        assert_eq!(engine.streak(), StreakState::default());
    }
}
