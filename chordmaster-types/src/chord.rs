//! Pitch classes, triad qualities and target chords.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

const NOTE_NAMES_SHARP: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const NOTE_NAMES_FLAT: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Reduce a raw MIDI pitch to its pitch class (0-11).
pub fn pitch_class(pitch: u8) -> u8 {
    pitch % 12
}

/// Set of pitch classes packed into the low 12 bits of a `u16`.
///
/// Only ever built from raw pitches (`from_pitches`) or from a chord's
/// root + intervals, so every member is already in `0..12`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PitchClassSet(u16);

impl PitchClassSet {
    pub const EMPTY: PitchClassSet = PitchClassSet(0);

    /// Build from raw MIDI pitches, reducing each one mod 12.
    pub fn from_pitches<I: IntoIterator<Item = u8>>(pitches: I) -> Self {
        let mut set = Self::EMPTY;
        for p in pitches {
            set.insert(pitch_class(p));
        }
        set
    }

    fn insert(&mut self, pc: u8) {
        self.0 |= 1 << (pc % 12);
    }

    pub fn contains(&self, pc: u8) -> bool {
        pc < 12 && self.0 & (1 << pc) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Ascending pitch classes in the set.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..12u8).filter(move |&pc| self.contains(pc))
    }
}

/// Triad qualities available as targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 3] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Diminished,
    ];

    /// Semitone offsets from the root.
    pub fn intervals(&self) -> [u8; 3] {
        match self {
            ChordQuality::Major => [0, 4, 7],
            ChordQuality::Minor => [0, 3, 7],
            ChordQuality::Diminished => [0, 3, 6],
        }
    }

    /// Suffix appended to the root name ("" for major, "m" for minor).
    pub fn suffix(&self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
        }
    }

    /// Parse a configuration name. Accepts the full name or the suffix.
    pub fn parse(s: &str) -> Option<ChordQuality> {
        match s {
            "Major" | "major" | "maj" => Some(ChordQuality::Major),
            "Minor" | "minor" | "m" | "min" => Some(ChordQuality::Minor),
            "Diminished" | "diminished" | "dim" => Some(ChordQuality::Diminished),
            _ => None,
        }
    }
}

/// Whether root names are shown with sharps or flats. Display only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Spelling {
    #[default]
    Sharp,
    Flat,
}

impl Spelling {
    pub fn root_name(&self, root: u8) -> &'static str {
        let idx = (root % 12) as usize;
        match self {
            Spelling::Sharp => NOTE_NAMES_SHARP[idx],
            Spelling::Flat => NOTE_NAMES_FLAT[idx],
        }
    }
}

/// A triad: root pitch class plus quality.
///
/// Identity is `(root % 12, quality)`. `spelling` is carried for display and
/// ignored by `PartialEq` and `Hash`. Deserialized roots are reduced mod 12.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "RawChord")]
pub struct Chord {
    pub root: u8,
    pub quality: ChordQuality,
    pub spelling: Spelling,
}

#[derive(Deserialize)]
struct RawChord {
    root: u8,
    quality: ChordQuality,
    #[serde(default)]
    spelling: Spelling,
}

impl From<RawChord> for Chord {
    fn from(raw: RawChord) -> Self {
        Chord::new(raw.root, raw.quality).with_spelling(raw.spelling)
    }
}

impl Chord {
    pub fn new(root: u8, quality: ChordQuality) -> Self {
        Self {
            root: root % 12,
            quality,
            spelling: Spelling::Sharp,
        }
    }

    pub fn with_spelling(mut self, spelling: Spelling) -> Self {
        self.spelling = spelling;
        self
    }

    pub fn intervals(&self) -> [u8; 3] {
        self.quality.intervals()
    }

    pub fn pitch_classes(&self) -> PitchClassSet {
        let mut set = PitchClassSet::EMPTY;
        for interval in self.intervals() {
            set.insert((self.root % 12 + interval) % 12);
        }
        set
    }

    /// Display name, e.g. "C", "Ebm", "F#dim".
    pub fn name(&self) -> String {
        format!(
            "{}{}",
            self.spelling.root_name(self.root),
            self.quality.suffix()
        )
    }
}

impl PartialEq for Chord {
    fn eq(&self, other: &Self) -> bool {
        self.root % 12 == other.root % 12 && self.quality == other.quality
    }
}

impl Eq for Chord {}

impl Hash for Chord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.root % 12).hash(state);
        self.quality.hash(state);
    }
}

impl std::fmt::Display for Chord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
