//! Exact chord matching and nearest-name identification.
//!
//! Both operations compare pitch-class sets built from raw pitches, so they
//! ignore octave, doubling and inversion. A held set with fewer than three
//! classes never matches anything.

use chordmaster_types::{Chord, ChordQuality, PitchClassSet};

/// Smallest pitch-class count that can form a triad.
pub const MIN_CHORD_CLASSES: usize = 3;

#[derive(Debug, Clone)]
pub struct ChordMatcher {
    /// Search order for `identify`.
    qualities: Vec<ChordQuality>,
}

impl ChordMatcher {
    pub fn new(qualities: Vec<ChordQuality>) -> Self {
        Self { qualities }
    }

    /// True iff the held pitch classes are exactly the target's: every chord
    /// tone present, nothing extra.
    pub fn matches_target<I>(&self, held: I, target: &Chord) -> bool
    where
        I: IntoIterator<Item = u8>,
    {
        let played = PitchClassSet::from_pitches(held);
        played.len() >= MIN_CHORD_CLASSES && played == target.pitch_classes()
    }

    /// The triad whose pitch classes equal the held set, if any.
    ///
    /// Roots are searched ascending from C, then qualities in configured
    /// order. Every (root, quality) pair has a distinct class set, so the
    /// first hit is the only one.
    pub fn identify<I>(&self, held: I) -> Option<Chord>
    where
        I: IntoIterator<Item = u8>,
    {
        let played = PitchClassSet::from_pitches(held);
        if played.len() < MIN_CHORD_CLASSES {
            return None;
        }
        (0..12u8)
            .flat_map(|root| self.qualities.iter().map(move |&q| Chord::new(root, q)))
            .find(|chord| chord.pitch_classes() == played)
    }
}

impl Default for ChordMatcher {
    fn default() -> Self {
        Self::new(ChordQuality::ALL.to_vec())
    }
}
