//! Random target chords with no immediate repeats.

use chordmaster_types::{Chord, ChordQuality, Spelling};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Draws target chords from an LCG so a seed reproduces a whole game.
#[derive(Debug, Clone)]
pub struct ChordGenerator {
    qualities: Vec<ChordQuality>,
    max_attempts: u32,
    rng_state: u64,
}

impl ChordGenerator {
    /// `qualities` must be non-empty; an empty list falls back to major and minor.
    pub fn new(qualities: Vec<ChordQuality>, max_attempts: u32, seed: u64) -> Self {
        let qualities = if qualities.is_empty() {
            vec![ChordQuality::Major, ChordQuality::Minor]
        } else {
            qualities
        };
        Self {
            qualities,
            max_attempts: max_attempts.max(1),
            rng_state: seed,
        }
    }

    pub fn qualities(&self) -> &[ChordQuality] {
        &self.qualities
    }

    /// Next target, differing from `previous` in root or quality.
    ///
    /// Gives up after `max_attempts` draws and returns the last one, which can
    /// only repeat when a single root/quality pair is possible.
    pub fn next(&mut self, previous: Option<&Chord>) -> Chord {
        let mut chord = self.draw();
        let mut attempts = 1;
        while previous == Some(&chord) {
            if attempts >= self.max_attempts {
                log::warn!(
                    "no distinct chord after {} attempts, repeating {}",
                    attempts,
                    chord
                );
                break;
            }
            chord = self.draw();
            attempts += 1;
        }

        let spelling = if self.next_u32() % 2 == 0 {
            Spelling::Sharp
        } else {
            Spelling::Flat
        };
        chord.with_spelling(spelling)
    }

    fn draw(&mut self) -> Chord {
        let root = (self.next_u32() % 12) as u8;
        let idx = self.next_u32() as usize % self.qualities.len();
        Chord::new(root, self.qualities[idx])
    }

    fn next_u32(&mut self) -> u32 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.rng_state >> 33) as u32
    }
}
