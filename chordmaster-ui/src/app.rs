//! Event loop: keys drive the round controller, MIDI notes feed it, and every
//! returned `GameEvent` is printed.

use std::io;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use chordmaster_core::game::{Phase, RoundController};
use chordmaster_core::leaderboard::Leaderboard;
use chordmaster_core::midi::MidiInputManager;
use chordmaster_types::{GameEvent, MAX_NAME_LEN};

use crate::rankings::RankingsStore;
use crate::terminal::{describe, format_rankings, TerminalBackend};

/// Display refresh interval. Only the status line uses it.
const TICK: Duration = Duration::from_millis(100);

/// Player name typed after a game ends. Starts from the last submitted name.
#[derive(Debug, Default)]
struct NameEntry {
    editing: Option<String>,
    last_submitted: Option<String>,
}

impl NameEntry {
    fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    fn text(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    fn begin(&mut self) {
        self.editing = Some(self.last_submitted.clone().unwrap_or_default());
    }

    fn push(&mut self, c: char) {
        if let Some(name) = self.editing.as_mut() {
            if name.chars().count() < MAX_NAME_LEN {
                name.push(c);
            }
        }
    }

    fn pop(&mut self) {
        if let Some(name) = self.editing.as_mut() {
            name.pop();
        }
    }

    fn cancel(&mut self) {
        self.editing = None;
    }

    /// Stop editing and hand back what was typed.
    fn finish(&mut self) -> String {
        self.editing.take().unwrap_or_default()
    }

    fn remember(&mut self, name: &str) {
        self.last_submitted = Some(name.to_string());
    }
}

pub struct App {
    controller: RoundController,
    midi: MidiInputManager,
    midi_port: usize,
    store: RankingsStore,
    board: Leaderboard,
    name_entry: NameEntry,
}

impl App {
    pub fn new(
        controller: RoundController,
        midi: MidiInputManager,
        midi_port: usize,
        store: RankingsStore,
        board: Leaderboard,
    ) -> Self {
        Self {
            controller,
            midi,
            midi_port,
            store,
            board,
            name_entry: NameEntry::default(),
        }
    }

    pub fn run(&mut self, term: &mut TerminalBackend) -> io::Result<()> {
        self.print_banner(term)?;
        loop {
            if let Some(key) = term.poll_key(TICK)? {
                if !self.handle_key(key, term)? {
                    break;
                }
            }

            for note in self.midi.poll_events() {
                let events = self.controller.handle_note(note.event, note.received);
                self.show(term, &events)?;
            }

            self.draw_status(term)?;
        }
        Ok(())
    }

    fn print_banner(&mut self, term: &mut TerminalBackend) -> io::Result<()> {
        term.line("ChordMaster")?;
        let midi_line = match self.midi.status().ready() {
            Ok(()) => format!("MIDI: {}", self.midi.connected_port_name().unwrap_or("?")),
            Err(e) => format!("MIDI: {}", e),
        };
        term.line(&midi_line)?;
        for line in format_rankings(&self.board, None) {
            term.line(&line)?;
        }
        term.line("Space: start   c: reconnect MIDI   r: restart   q: quit")
    }

    /// Returns false when the app should quit.
    fn handle_key(&mut self, key: KeyEvent, term: &mut TerminalBackend) -> io::Result<bool> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(false);
        }

        if self.name_entry.is_editing() {
            self.handle_name_key(key, term)?;
            return Ok(true);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(false),
            KeyCode::Char(' ') => self.start_game(term)?,
            KeyCode::Char('r') => {
                self.controller.restart();
                term.line("Ready. Press Space to start.")?;
            }
            KeyCode::Char('c') => self.reconnect(term)?,
            _ => {}
        }
        Ok(true)
    }

    fn handle_name_key(&mut self, key: KeyEvent, term: &mut TerminalBackend) -> io::Result<()> {
        match key.code {
            KeyCode::Enter => self.submit_name(term)?,
            KeyCode::Esc => {
                self.name_entry.cancel();
                self.controller.restart();
                term.line("Score discarded.")?;
            }
            KeyCode::Backspace => self.name_entry.pop(),
            KeyCode::Char(c) => self.name_entry.push(c),
            _ => {}
        }
        Ok(())
    }

    fn start_game(&mut self, term: &mut TerminalBackend) -> io::Result<()> {
        match self.controller.start(&self.midi.status(), Instant::now()) {
            Ok(events) => self.show(term, &events),
            Err(e) => {
                log::warn!("cannot start game: {}", e);
                term.line(&format!("Cannot start: {}", e))
            }
        }
    }

    fn reconnect(&mut self, term: &mut TerminalBackend) -> io::Result<()> {
        self.midi.refresh_ports();
        match self.midi.connect(self.midi_port) {
            Ok(()) => term.line(&format!(
                "MIDI: {}",
                self.midi.connected_port_name().unwrap_or("?")
            )),
            Err(e) => {
                log::warn!("MIDI reconnect failed: {}", e);
                term.line(&format!("MIDI: {}", e))
            }
        }
    }

    fn submit_name(&mut self, term: &mut TerminalBackend) -> io::Result<()> {
        let Some(name) = self.name_entry.text() else {
            return Ok(());
        };
        let Some(record) = self.controller.score_record(name, Utc::now()) else {
            return Ok(());
        };
        self.name_entry.finish();
        self.name_entry.remember(&record.name);
        let submission = self.board.submit(record);
        if let Err(e) = self.store.save(&self.board) {
            log::error!("could not save rankings {}: {}", self.store.path().display(), e);
            term.line(&format!("Could not save rankings: {}", e))?;
        }
        self.controller.restart();

        if submission.is_high_score {
            term.line("New high score!")?;
        }
        for line in format_rankings(&self.board, submission.rank) {
            term.line(&line)?;
        }
        term.line("Press Space to play again.")
    }

    fn show(&mut self, term: &mut TerminalBackend, events: &[GameEvent]) -> io::Result<()> {
        for event in events {
            term.line(&describe(event))?;
            if matches!(event, GameEvent::GameOver { .. }) {
                self.name_entry.begin();
            }
        }
        Ok(())
    }

    fn draw_status(&mut self, term: &mut TerminalBackend) -> io::Result<()> {
        if let Some(name) = self.name_entry.text() {
            return term.status(&format!("Name: {}_", name));
        }
        match self.controller.phase() {
            Phase::Active(round) => {
                let elapsed = self.controller.elapsed(Instant::now()).unwrap_or_default();
                let streak = self.controller.streak();
                term.status(&format!(
                    "{}  time {:.1}s  score {}  x{}",
                    round.target,
                    elapsed.as_secs_f64(),
                    self.controller.total_score(),
                    streak.multiplier
                ))
            }
            Phase::Idle | Phase::GameOver { .. } => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_entry_starts_empty() {
        let mut entry = NameEntry::default();
        assert!(!entry.is_editing());
        entry.begin();
        assert_eq!(entry.text(), Some(""));
    }

    #[test]
    fn test_name_entry_prefills_last_submitted() {
        let mut entry = NameEntry::default();
        entry.begin();
        for c in "ada".chars() {
            entry.push(c);
        }
        let name = entry.finish();
        entry.remember(&name);
        assert!(!entry.is_editing());

        entry.begin();
        assert_eq!(entry.text(), Some("ada"));
        entry.pop();
        assert_eq!(entry.text(), Some("ad"));
    }

    #[test]
    fn test_name_entry_cancel_keeps_last_name() {
        let mut entry = NameEntry::default();
        entry.remember("bo");
        entry.begin();
        entry.push('b');
        entry.cancel();
        assert_eq!(entry.text(), None);
        entry.begin();
        assert_eq!(entry.text(), Some("bo"));
    }

    #[test]
    fn test_name_entry_caps_length() {
        let mut entry = NameEntry::default();
        entry.begin();
        for _ in 0..30 {
            entry.push('x');
        }
        assert_eq!(entry.text().map(|t| t.chars().count()), Some(MAX_NAME_LEN));
    }
}
