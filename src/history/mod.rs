//! Completed-session history
//!
//! Keeps the ten most recent sessions, newest first, and mirrors them to a
//! JSON file. Persistence problems never stop the game: a missing or broken
//! file reads as an empty history and failed writes are only logged.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::HistoryError;
use crate::game::GameMode;

/// Maximum number of sessions to keep
pub const MAX_RECORDS: usize = 10;

/// Outcome of one finished session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub score: u32,
    pub mode: GameMode,
    /// Local time the session ended, human readable
    pub timestamp: String,
}

impl SessionRecord {
    pub fn new(score: u32, mode: GameMode, timestamp: impl Into<String>) -> Self {
        Self {
            score,
            mode,
            timestamp: timestamp.into(),
        }
    }

    /// Record stamped with the current local time
    pub fn now(score: u32, mode: GameMode) -> Self {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Self::new(score, mode, timestamp)
    }
}

/// Bounded newest-first list of session records
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    records: Vec<SessionRecord>,
    /// Backing file; `None` keeps the history in memory only
    path: Option<PathBuf>,
}

impl SessionHistory {
    /// History that is never written anywhere
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the history stored at `path`, starting empty if it cannot be read
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match load_records(&path) {
            Ok(records) => {
                info!(count = records.len(), path = ?path, "Loaded session history");
                records
            }
            Err(HistoryError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = ?path, "No session history yet");
                Vec::new()
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "Ignoring unreadable session history");
                Vec::new()
            }
        };

        let mut history = Self {
            records,
            path: Some(path),
        };
        history.records.truncate(MAX_RECORDS);
        history
    }

    /// Add a finished session at the front and persist the list
    pub fn record(&mut self, record: SessionRecord) {
        self.records.insert(0, record);
        self.records.truncate(MAX_RECORDS);

        if let Some(path) = &self.path {
            if let Err(e) = save_records(path, &self.records) {
                warn!(path = ?path, error = %e, "Failed to save session history");
            }
        }
    }

    /// Records, newest first
    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn best_score(&self) -> Option<u32> {
        self.records.iter().map(|r| r.score).max()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read a JSON list of records
pub fn load_records(path: &Path) -> Result<Vec<SessionRecord>, HistoryError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Write records as a JSON list, creating parent directories as needed
pub fn save_records(path: &Path, records: &[SessionRecord]) -> Result<(), HistoryError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    Ok(())
}
