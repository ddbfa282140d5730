//! Ranking of finished games. Storage belongs to the caller.

use chordmaster_types::ScoreRecord;

pub const DEFAULT_CAPACITY: usize = 10;

/// Result of adding a record to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    /// Zero-based position, or `None` if the record did not make the cut.
    pub rank: Option<usize>,
    /// The record beats every score previously on the board.
    pub is_high_score: bool,
}

/// Best scores, highest first, at most `capacity` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<ScoreRecord>,
    capacity: usize,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl Leaderboard {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Adopt previously stored entries, re-sorting and trimming them.
    pub fn from_entries(mut entries: Vec<ScoreRecord>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(capacity);
        Self { entries, capacity }
    }

    pub fn entries(&self) -> &[ScoreRecord] {
        &self.entries
    }

    pub fn best(&self) -> Option<&ScoreRecord> {
        self.entries.first()
    }

    /// Insert `record`. Ties keep earlier entries ahead.
    pub fn submit(&mut self, record: ScoreRecord) -> Submission {
        let is_high_score = self.best().map_or(true, |best| record.score > best.score);
        let position = self
            .entries
            .iter()
            .position(|e| record.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(position, record);
        self.entries.truncate(self.capacity);
        let rank = (position < self.capacity).then_some(position);
        log::debug!("leaderboard submission rank {:?}", rank);
        Submission {
            rank,
            is_high_score,
        }
    }
}
