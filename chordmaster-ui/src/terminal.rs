//! Line-oriented crossterm frontend: raw-mode key input, one printed line per
//! game event, and a self-overwriting status line for the display tick.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyEvent, KeyEventKind},
    execute, queue,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
};

use chordmaster_core::leaderboard::Leaderboard;
use chordmaster_types::GameEvent;

/// Raw-mode terminal. `start` before use, `stop` before exit.
pub struct TerminalBackend {
    out: Stdout,
    raw_mode: bool,
}

impl TerminalBackend {
    /// Create the backend (does not enter raw mode)
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            raw_mode: false,
        }
    }

    pub fn start(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        self.raw_mode = true;
        execute!(self.out, cursor::Hide)
    }

    pub fn stop(&mut self) -> io::Result<()> {
        execute!(self.out, cursor::Show, Print("\r\n"))?;
        if self.raw_mode {
            disable_raw_mode()?;
            self.raw_mode = false;
        }
        Ok(())
    }

    /// Wait up to `timeout` for a key press.
    pub fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<KeyEvent>> {
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(key));
                }
            }
        }
        Ok(None)
    }

    /// Print a permanent line, replacing whatever the status line showed.
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        queue!(
            self.out,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(text),
            Print("\r\n")
        )?;
        self.out.flush()
    }

    /// Overwrite the status line in place.
    pub fn status(&mut self, text: &str) -> io::Result<()> {
        queue!(
            self.out,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(text)
        )?;
        self.out.flush()
    }
}

impl Drop for TerminalBackend {
    fn drop(&mut self) {
        if self.raw_mode {
            let _ = disable_raw_mode();
        }
    }
}

/// Human-readable line for one game event.
pub fn describe(event: &GameEvent) -> String {
    match event {
        GameEvent::RoundStarted {
            round_index,
            total_rounds,
            name,
            ..
        } => format!("Round {}/{}: play {}", round_index + 1, total_rounds, name),
        GameEvent::ChordMatched(outcome) => {
            let mut text = format!(
                "Correct! +{} points ({:.1}s)",
                outcome.base_score,
                outcome.elapsed.as_secs_f64()
            );
            if outcome.bonus > 0 {
                text.push_str(&format!(
                    " +{} voice leading bonus! = {}",
                    outcome.bonus,
                    outcome.round_score()
                ));
            }
            text.push_str(&format!("  score {}", outcome.total_score));
            text
        }
        GameEvent::VoiceLeadingAchieved { multiplier } => {
            format!("Voice leading! x{}", multiplier)
        }
        GameEvent::StreakBroken {
            previous_multiplier,
        } => format!("Streak broken (was x{})", previous_multiplier),
        GameEvent::Mismatch {
            identified: Some(name),
        } => format!("Not quite. You played {}", name),
        GameEvent::Mismatch { identified: None } => "Not quite.".to_string(),
        GameEvent::GameOver { final_score, rounds } => format!(
            "Game over after {} chords. Final score: {}. Type your name and press Enter.",
            rounds, final_score
        ),
    }
}

/// Rankings table, one line per entry. `highlight` marks a zero-based rank.
pub fn format_rankings(board: &Leaderboard, highlight: Option<usize>) -> Vec<String> {
    if board.entries().is_empty() {
        return vec!["No rankings yet.".to_string()];
    }
    let mut lines = vec!["Rankings".to_string()];
    for (i, entry) in board.entries().iter().enumerate() {
        let marker = if highlight == Some(i) { ">" } else { " " };
        lines.push(format!(
            "{}{:>2}. {:<20} {:>6}  {}",
            marker,
            i + 1,
            entry.name,
            entry.score,
            entry.timestamp.format("%Y-%m-%d")
        ));
    }
    lines
}
