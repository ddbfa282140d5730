//! Held-note bookkeeping from the ordered note stream.

use chordmaster_types::{NoteEvent, PitchClassSet};

/// Raw MIDI pitches currently sounding, one bit per note number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldNotes {
    bits: u128,
}

impl HeldNotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event. Returns true only if the held set changed.
    /// Invalid events and repeated on/off are no-ops.
    pub fn apply(&mut self, event: NoteEvent) -> bool {
        if !event.is_valid() {
            log::trace!("dropping invalid note event {:?}", event);
            return false;
        }
        if event.on {
            self.insert(event.pitch)
        } else {
            self.remove(event.pitch)
        }
    }

    fn insert(&mut self, pitch: u8) -> bool {
        let mask = 1u128 << pitch;
        let changed = self.bits & mask == 0;
        self.bits |= mask;
        changed
    }

    fn remove(&mut self, pitch: u8) -> bool {
        let mask = 1u128 << pitch;
        let changed = self.bits & mask != 0;
        self.bits &= !mask;
        changed
    }

    pub fn contains(&self, pitch: u8) -> bool {
        pitch < 128 && self.bits & (1u128 << pitch) != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    /// Held pitches in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..128u8).filter(move |&p| self.contains(p))
    }

    pub fn highest(&self) -> Option<u8> {
        if self.bits == 0 {
            None
        } else {
            Some(127 - self.bits.leading_zeros() as u8)
        }
    }

    pub fn pitch_classes(&self) -> PitchClassSet {
        PitchClassSet::from_pitches(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_and_off() {
        let mut held = HeldNotes::new();
        assert!(held.apply(NoteEvent::on(60)));
        assert!(held.apply(NoteEvent::on(64)));
        assert!(held.contains(60));
        assert_eq!(held.len(), 2);
        assert!(held.apply(NoteEvent::off(60)));
        assert!(!held.contains(60));
        assert_eq!(held.iter().collect::<Vec<_>>(), vec![64]);
    }

    #[test]
    fn repeated_events_are_noops() {
        let mut held = HeldNotes::new();
        assert!(held.apply(NoteEvent::on(60)));
        assert!(!held.apply(NoteEvent::on(60)));
        assert_eq!(held.len(), 1);
        assert!(!held.apply(NoteEvent::off(61)));
        assert!(held.apply(NoteEvent::off(60)));
        assert!(!held.apply(NoteEvent::off(60)));
        assert!(held.is_empty());
    }

    #[test]
    fn invalid_pitch_dropped() {
        let mut held = HeldNotes::new();
        assert!(!held.apply(NoteEvent::on(128)));
        assert!(!held.apply(NoteEvent::on(255)));
        assert!(held.is_empty());
    }

    #[test]
    fn highest_pitch() {
        let mut held = HeldNotes::new();
        assert_eq!(held.highest(), None);
        for p in [48, 79, 64] {
            held.apply(NoteEvent::on(p));
        }
        assert_eq!(held.highest(), Some(79));
        held.apply(NoteEvent::on(127));
        held.apply(NoteEvent::on(0));
        assert_eq!(held.highest(), Some(127));
    }

    #[test]
    fn pitch_classes_fold_octaves() {
        let mut held = HeldNotes::new();
        for p in [48, 64, 79, 60] {
            held.apply(NoteEvent::on(p));
        }
        assert_eq!(held.pitch_classes().iter().collect::<Vec<_>>(), vec![0, 4, 7]);
    }
}
