//! Round lifecycle: Idle → Active → GameOver → (restart) → Idle.
//!
//! Every operation returns the `GameEvent`s the presentation layer should
//! show, in order. Time is passed in by the caller so a session can be
//! replayed deterministically.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use chordmaster_types::{Chord, GameEvent, NoteEvent, ScoreRecord, VoiceLeading};

use super::generator::ChordGenerator;
use super::matcher::{ChordMatcher, MIN_CHORD_CLASSES};
use super::scoring::{ScoringEngine, StreakState};
use super::GameSettings;
use crate::error::{GameError, TransportStatus};

/// One target chord being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundState {
    pub target: Chord,
    pub started_at: Instant,
    /// Zero-based.
    pub round_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active(RoundState),
    GameOver { final_score: u64 },
}

/// Owns a single game session: held notes, streak, score and round counters.
pub struct RoundController {
    settings: GameSettings,
    generator: ChordGenerator,
    matcher: ChordMatcher,
    scoring: ScoringEngine,
    held: super::tracker::HeldNotes,
    phase: Phase,
    rounds_completed: usize,
    last_target: Option<Chord>,
}

impl RoundController {
    pub fn new(settings: GameSettings, seed: u64) -> Self {
        let generator = ChordGenerator::new(
            settings.qualities.clone(),
            settings.max_generation_attempts,
            seed,
        );
        let matcher = ChordMatcher::new(generator.qualities().to_vec());
        let scoring = ScoringEngine::new(settings.scoring.clone());
        Self {
            settings,
            generator,
            matcher,
            scoring,
            held: Default::default(),
            phase: Phase::Idle,
            rounds_completed: 0,
            last_target: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active(_))
    }

    pub fn current_round(&self) -> Option<&RoundState> {
        match &self.phase {
            Phase::Active(round) => Some(round),
            _ => None,
        }
    }

    pub fn held_notes(&self) -> &super::tracker::HeldNotes {
        &self.held
    }

    pub fn streak(&self) -> StreakState {
        self.scoring.streak()
    }

    pub fn total_score(&self) -> u64 {
        self.scoring.total()
    }

    pub fn rounds_completed(&self) -> usize {
        self.rounds_completed
    }

    pub fn rounds_per_game(&self) -> usize {
        self.settings.rounds_per_game
    }

    /// Time since the current round started. For the display tick only;
    /// scoring samples its own time when a match is detected.
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        self.current_round()
            .map(|round| now.saturating_duration_since(round.started_at))
    }

    /// Begin a new game. Any session in progress is discarded first.
    /// Refuses to start unless the transport reports a connected device.
    pub fn start(
        &mut self,
        transport: &TransportStatus,
        now: Instant,
    ) -> Result<Vec<GameEvent>, GameError> {
        transport.ready()?;
        if self.phase != Phase::Idle {
            self.restart();
        }
        log::info!("starting game of {} rounds", self.settings.rounds_per_game);
        Ok(vec![self.begin_round(now)])
    }

    /// Drop all session state and go back to Idle.
    pub fn restart(&mut self) {
        self.scoring.reset();
        self.held.clear();
        self.rounds_completed = 0;
        self.last_target = None;
        self.phase = Phase::Idle;
    }

    /// Feed one note event from the transport.
    ///
    /// Note-ons that add a pitch while a round is active trigger evaluation.
    /// Everything else only updates the held set.
    pub fn handle_note(&mut self, event: NoteEvent, now: Instant) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.held.apply(event) || !event.on {
            return events;
        }
        let Phase::Active(round) = self.phase else {
            return events;
        };

        if self.matcher.matches_target(self.held.iter(), &round.target) {
            self.complete_round(round, now, &mut events);
        } else if self.held.pitch_classes().len() >= MIN_CHORD_CLASSES {
            if let Some(previous_multiplier) = self.scoring.register_miss() {
                events.push(GameEvent::StreakBroken {
                    previous_multiplier,
                });
            }
            let identified = self
                .matcher
                .identify(self.held.iter())
                .map(|chord| chord.with_spelling(round.target.spelling).name());
            log::debug!(
                "wrong chord for {}: {:?}",
                round.target,
                identified.as_deref().unwrap_or("?")
            );
            events.push(GameEvent::Mismatch { identified });
        }
        events
    }

    /// The record to hand to the leaderboard once the game is over.
    pub fn score_record(&self, name: &str, timestamp: DateTime<Utc>) -> Option<ScoreRecord> {
        match self.phase {
            Phase::GameOver { final_score } => ScoreRecord::new(name, final_score, timestamp),
            _ => None,
        }
    }

    fn complete_round(&mut self, round: RoundState, now: Instant, events: &mut Vec<GameEvent>) {
        let elapsed = now.saturating_duration_since(round.started_at);
        let Some(highest) = self.held.highest() else {
            return;
        };
        let outcome = self.scoring.score_match(highest, elapsed);
        log::info!(
            "round {} {} in {:.1}s: {} + {} bonus (x{}), total {}",
            round.round_index + 1,
            round.target,
            elapsed.as_secs_f64(),
            outcome.base_score,
            outcome.bonus,
            outcome.multiplier,
            outcome.total_score
        );
        events.push(GameEvent::ChordMatched(outcome));
        match outcome.voice_leading {
            VoiceLeading::Achieved { multiplier } => {
                events.push(GameEvent::VoiceLeadingAchieved { multiplier })
            }
            VoiceLeading::Broken {
                previous_multiplier,
            } => events.push(GameEvent::StreakBroken {
                previous_multiplier,
            }),
            VoiceLeading::Established | VoiceLeading::None => {}
        }

        self.rounds_completed += 1;
        if self.rounds_completed < self.settings.rounds_per_game {
            events.push(self.begin_round(now));
        } else {
            let final_score = self.scoring.total();
            log::info!("game over, final score {}", final_score);
            self.phase = Phase::GameOver { final_score };
            events.push(GameEvent::GameOver {
                final_score,
                rounds: self.rounds_completed,
            });
        }
    }

    fn begin_round(&mut self, now: Instant) -> GameEvent {
        // Keys still down from the last chord must not count toward this one.
        self.held.clear();
        let target = self.generator.next(self.last_target.as_ref());
        self.last_target = Some(target);
        let round = RoundState {
            target,
            started_at: now,
            round_index: self.rounds_completed,
        };
        self.phase = Phase::Active(round);
        log::debug!("round {} target {}", round.round_index + 1, target);
        GameEvent::RoundStarted {
            round_index: round.round_index,
            total_rounds: self.settings.rounds_per_game,
            target,
            name: target.name(),
            spelling: target.spelling,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordmaster_types::{ChordQuality, MatchOutcome};

    fn connected() -> TransportStatus {
        TransportStatus::Connected {
            port: "Test Keys".into(),
        }
    }

    fn controller() -> RoundController {
        RoundController::new(GameSettings::default(), 11)
    }

    /// Root-position triad of `chord` starting at octave `base`.
    fn voicing(chord: &Chord, base: u8) -> Vec<u8> {
        chord
            .intervals()
            .iter()
            .map(|i| base + chord.root + i)
            .collect()
    }

    fn play(ctl: &mut RoundController, pitches: &[u8], now: Instant) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for &p in pitches {
            events.extend(ctl.handle_note(NoteEvent::on(p), now));
        }
        events
    }

    fn target(ctl: &RoundController) -> Chord {
        ctl.current_round().expect("round active").target
    }

    fn matched(events: &[GameEvent]) -> Option<MatchOutcome> {
        events.iter().find_map(|e| match e {
            GameEvent::ChordMatched(o) => Some(*o),
            _ => None,
        })
    }

    #[test]
    fn start_requires_connected_device() {
        let mut ctl = controller();
        let now = Instant::now();
        assert_eq!(
            ctl.start(&TransportStatus::NoDevices, now),
            Err(GameError::NoDevicesConnected)
        );
        assert!(ctl
            .start(&TransportStatus::Unavailable("unsupported".into()), now)
            .is_err());
        assert_eq!(ctl.phase(), Phase::Idle);
    }

    #[test]
    fn start_emits_first_round() {
        let mut ctl = controller();
        let events = ctl.start(&connected(), Instant::now()).unwrap();
        assert_eq!(events.len(), 1);
        match &events[0] {
            GameEvent::RoundStarted {
                round_index,
                total_rounds,
                target,
                name,
                ..
            } => {
                assert_eq!(*round_index, 0);
                assert_eq!(*total_rounds, 10);
                assert_eq!(name, &target.name());
            }
            other => panic!("expected RoundStarted, got {:?}", other),
        }
        assert!(ctl.is_active());
    }

    #[test]
    fn notes_ignored_while_idle() {
        let mut ctl = controller();
        let events = play(&mut ctl, &[60, 64, 67], Instant::now());
        assert!(events.is_empty());
        assert_eq!(ctl.held_notes().len(), 3);
    }

    #[test]
    fn correct_chord_scores_and_advances() {
        let mut ctl = controller();
        let t0 = Instant::now();
        ctl.start(&connected(), t0).unwrap();
        let first = target(&ctl);

        let events = play(&mut ctl, &voicing(&first, 48), t0 + Duration::from_millis(300));
        let outcome = matched(&events).expect("match");
        assert_eq!(outcome.base_score, 97);
        assert_eq!(outcome.bonus, 0);
        assert_eq!(outcome.voice_leading, VoiceLeading::Established);
        assert_eq!(ctl.total_score(), 97);
        assert_eq!(ctl.rounds_completed(), 1);
        assert!(ctl.held_notes().is_empty());
        assert_ne!(target(&ctl), first);
        assert!(matches!(
            events.last(),
            Some(GameEvent::RoundStarted { round_index: 1, .. })
        ));
    }

    #[test]
    fn partial_chord_is_silent() {
        let mut ctl = controller();
        let t0 = Instant::now();
        ctl.start(&connected(), t0).unwrap();
        let notes = voicing(&target(&ctl), 60);
        let events = play(&mut ctl, &notes[..2], t0);
        assert!(events.is_empty());
    }

    #[test]
    fn wrong_chord_reports_identified_name() {
        let mut ctl = controller();
        let t0 = Instant::now();
        ctl.start(&connected(), t0).unwrap();
        let goal = target(&ctl);
        let other_quality = if goal.quality == ChordQuality::Major {
            ChordQuality::Minor
        } else {
            ChordQuality::Major
        };
        let wrong = Chord::new(goal.root, other_quality).with_spelling(goal.spelling);

        let events = play(&mut ctl, &voicing(&wrong, 48), t0);
        assert_eq!(
            events,
            vec![GameEvent::Mismatch {
                identified: Some(wrong.name())
            }]
        );
        assert_eq!(ctl.total_score(), 0);
        assert!(ctl.is_active());
    }

    #[test]
    fn cluster_reports_unknown() {
        let mut ctl = controller();
        let t0 = Instant::now();
        ctl.start(&connected(), t0).unwrap();
        let root = (target(&ctl).root + 1) % 12;
        let events = play(&mut ctl, &[48 + root, 49 + root, 50 + root], t0);
        assert_eq!(events, vec![GameEvent::Mismatch { identified: None }]);
    }

    #[test]
    fn note_off_never_evaluates() {
        let mut ctl = controller();
        let t0 = Instant::now();
        ctl.start(&connected(), t0).unwrap();
        let chord_notes = voicing(&target(&ctl), 48);
        let extra = chord_notes[0] + 1;
        let mut notes = vec![extra];
        notes.extend(chord_notes);
        let events = play(&mut ctl, &notes, t0);
        assert!(matches!(events.last(), Some(GameEvent::Mismatch { .. })));
        // Releasing the extra note leaves exactly the target held, but only
        // a new note-on is evaluated.
        assert!(ctl.handle_note(NoteEvent::off(extra), t0).is_empty());
        assert_eq!(ctl.rounds_completed(), 0);
    }

    #[test]
    fn restart_clears_session() {
        let mut ctl = controller();
        let t0 = Instant::now();
        ctl.start(&connected(), t0).unwrap();
        let chord = target(&ctl);
        play(&mut ctl, &voicing(&chord, 48), t0);
        ctl.handle_note(NoteEvent::on(30), t0);
        ctl.restart();
        assert_eq!(ctl.phase(), Phase::Idle);
        assert_eq!(ctl.total_score(), 0);
        assert_eq!(ctl.rounds_completed(), 0);
        assert_eq!(ctl.streak(), StreakState::default());
        assert!(ctl.held_notes().is_empty());
        assert_eq!(ctl.elapsed(t0), None);
    }

    #[test]
    fn elapsed_follows_round_start() {
        let mut ctl = controller();
        let t0 = Instant::now();
        assert_eq!(ctl.elapsed(t0), None);
        ctl.start(&connected(), t0).unwrap();
        assert_eq!(
            ctl.elapsed(t0 + Duration::from_millis(1_500)),
            Some(Duration::from_millis(1_500))
        );
    }

    #[test]
    fn score_record_only_after_game_over() {
        let mut ctl = RoundController::new(
            GameSettings {
                rounds_per_game: 1,
                ..GameSettings::default()
            },
            5,
        );
        let t0 = Instant::now();
        assert!(ctl.score_record("ada", Utc::now()).is_none());
        ctl.start(&connected(), t0).unwrap();
        let chord = target(&ctl);
        let events = play(&mut ctl, &voicing(&chord, 48), t0);
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameOver {
                final_score: 100,
                rounds: 1
            })
        );
        assert_eq!(ctl.phase(), Phase::GameOver { final_score: 100 });
        let record = ctl.score_record(" ada ", Utc::now()).unwrap();
        assert_eq!(record.name, "ada");
        assert_eq!(record.score, 100);
        assert!(ctl.score_record("  ", Utc::now()).is_none());
    }

    #[test]
    fn start_from_game_over_discards_session() {
        let mut ctl = RoundController::new(
            GameSettings {
                rounds_per_game: 1,
                ..GameSettings::default()
            },
            5,
        );
        let t0 = Instant::now();
        ctl.start(&connected(), t0).unwrap();
        let chord = target(&ctl);
        play(&mut ctl, &voicing(&chord, 48), t0);
        assert!(matches!(ctl.phase(), Phase::GameOver { .. }));

        ctl.start(&connected(), t0).unwrap();
        assert!(ctl.is_active());
        assert_eq!(ctl.total_score(), 0);
        assert_eq!(ctl.streak().previous_highest, None);
    }
}
