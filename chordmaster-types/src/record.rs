//! Leaderboard entry produced at the end of a game.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest accepted player name, in characters.
pub const MAX_NAME_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u64,
    /// Serialized as an RFC 3339 (ISO-8601) string.
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
}

impl ScoreRecord {
    /// Build a record, trimming the name and capping it at `MAX_NAME_LEN`.
    /// Returns `None` for a blank name.
    pub fn new(name: &str, score: u64, timestamp: DateTime<Utc>) -> Option<Self> {
        let name: String = name.trim().chars().take(MAX_NAME_LEN).collect();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name,
            score,
            timestamp,
        })
    }
}
