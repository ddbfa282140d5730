//! # chordmaster-core
//!
//! Game core for the ChordMaster ear/finger trainer. A MIDI keyboard streams
//! note events; the core keeps the set of held notes, picks target triads,
//! checks whether the held notes form the target, and scores each correct
//! chord with a time-decay base plus a voice-leading streak bonus.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::time::Instant;
//! use chordmaster_core::config::Config;
//! use chordmaster_core::game::{GameSettings, RoundController};
//! use chordmaster_core::midi::MidiInputManager;
//!
//! let config = Config::load();
//! let mut midi = MidiInputManager::new();
//! midi.refresh_ports();
//! midi.connect(config.midi_port())?;
//!
//! let mut game = RoundController::new(GameSettings::from_config(&config), seed);
//! let events = game.start(&midi.status(), Instant::now())?;
//! for note in midi.poll_events() {
//!     for event in game.handle_note(note.event, note.received) {
//!         // hand GameEvents to the presentation layer
//!     }
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`game`]: `HeldNotes`, `ChordGenerator`, `ChordMatcher`, `ScoringEngine`
//!   and the `RoundController` state machine
//! - [`leaderboard`]: ranking of finished games (no storage)
//! - [`midi`]: `midir` input transport and note message parsing
//! - [`config`]: TOML configuration (embedded defaults + user override)
//! - [`error`]: `GameError` and `TransportStatus`

pub mod config;
pub mod error;
pub mod game;
pub mod leaderboard;
pub mod midi;

pub use error::{GameError, TransportStatus};
