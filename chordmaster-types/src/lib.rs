//! # chordmaster-types
//!
//! Shared type definitions for the ChordMaster trainer: pitch-class sets,
//! triads, raw note events, presentation events and leaderboard records.
//! Pure data; no I/O.

pub mod chord;
pub mod event;
pub mod note;
pub mod record;

pub use chord::{pitch_class, Chord, ChordQuality, PitchClassSet, Spelling};
pub use event::{GameEvent, MatchOutcome, VoiceLeading};
pub use note::{NoteEvent, MAX_PITCH};
pub use record::{ScoreRecord, MAX_NAME_LEN};
