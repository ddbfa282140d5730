//! JSON file storage for the leaderboard.

use std::io;
use std::path::{Path, PathBuf};

use chordmaster_core::leaderboard::Leaderboard;
use chordmaster_types::ScoreRecord;

/// File stem the rankings are stored under.
pub const STORAGE_KEY: &str = "chordMasterRankings";

pub struct RankingsStore {
    path: PathBuf,
}

impl RankingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chordmaster")
            .join(format!("{}.json", STORAGE_KEY))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load stored rankings. A missing or unreadable file gives an empty board.
    pub fn load(&self, capacity: usize) -> Leaderboard {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    log::warn!("could not read rankings {}: {}", self.path.display(), e);
                }
                return Leaderboard::with_capacity(capacity);
            }
        };
        match serde_json::from_str::<Vec<ScoreRecord>>(&contents) {
            Ok(entries) => Leaderboard::from_entries(entries, capacity),
            Err(e) => {
                log::warn!("ignoring corrupt rankings {}: {}", self.path.display(), e);
                Leaderboard::with_capacity(capacity)
            }
        }
    }

    pub fn save(&self, board: &Leaderboard) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(board.entries())
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        std::fs::write(&self.path, json)
    }
}
