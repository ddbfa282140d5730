#![allow(dead_code)]

use std::time::Instant;

use chordmaster_core::game::scoring::{top_note_distance, ScoringRules};
use chordmaster_core::game::RoundController;
use chordmaster_core::TransportStatus;
use chordmaster_types::{Chord, GameEvent, MatchOutcome, NoteEvent};

pub fn connected() -> TransportStatus {
    TransportStatus::Connected {
        port: "Virtual Keys".into(),
    }
}

pub fn target(ctl: &RoundController) -> Chord {
    ctl.current_round().expect("round should be active").target
}

/// Press every pitch in order, collecting the emitted events.
pub fn press(ctl: &mut RoundController, pitches: &[u8], now: Instant) -> Vec<GameEvent> {
    pitches
        .iter()
        .flat_map(|&p| ctl.handle_note(NoteEvent::on(p), now))
        .collect()
}

pub fn release(ctl: &mut RoundController, pitches: &[u8], now: Instant) -> Vec<GameEvent> {
    pitches
        .iter()
        .flat_map(|&p| ctl.handle_note(NoteEvent::off(p), now))
        .collect()
}

pub fn outcome(events: &[GameEvent]) -> Option<MatchOutcome> {
    events.iter().find_map(|e| match e {
        GameEvent::ChordMatched(o) => Some(*o),
        _ => None,
    })
}

/// Voicing of `chord` whose top note moves smoothly (or not) from
/// `previous_top`, staying near the middle of the keyboard. The other two
/// tones sit below C2.
pub fn voicing_with_top(chord: &Chord, previous_top: u8, smooth: bool) -> Vec<u8> {
    let rules = ScoringRules::default();
    let prev = i16::from(previous_top);
    let toward_middle: i16 = if prev < 66 { 1 } else { -1 };
    let steps = std::iter::once(0)
        .chain((1..=12).map(|s| s * toward_middle))
        .chain((1..=12).map(|s| -s * toward_middle));
    for step in steps {
        let top = (prev + step) as u8;
        let pc = top % 12;
        if chord.pitch_classes().contains(pc)
            && rules.is_smooth(top_note_distance(top, previous_top)) == smooth
        {
            let mut notes: Vec<u8> = chord
                .pitch_classes()
                .iter()
                .filter(|&c| c != pc)
                .map(|c| 24 + c)
                .collect();
            notes.push(top);
            return notes;
        }
    }
    panic!("no suitable top note for {} from {}", chord, previous_top);
}
