//! Raw note events from the input transport.

use serde::{Deserialize, Serialize};

/// Highest valid MIDI note number.
pub const MAX_PITCH: u8 = 127;

/// A single note-on or note-off, channel already discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub pitch: u8,
    pub on: bool,
}

impl NoteEvent {
    pub fn on(pitch: u8) -> Self {
        Self { pitch, on: true }
    }

    pub fn off(pitch: u8) -> Self {
        Self { pitch, on: false }
    }

    /// Pitches above 127 are not MIDI notes and are dropped before any state change.
    pub fn is_valid(&self) -> bool {
        self.pitch <= MAX_PITCH
    }
}
