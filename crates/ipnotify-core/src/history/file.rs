// # File History Log
//
// File-based implementation of HistoryLog.
//
// ## Discipline
//
// - Read-modify-write on every append: load existing entries (corrupt or
//   missing log reads as empty), push, truncate to the most recent 100,
//   write atomically via temp-then-rename
// - Parent directory created on demand
// - Never consulted by decision logic; observability only
//
// ## File format
//
// ```json
// {
//   "entries": [
//     {
//       "timestamp": "2025-01-09T12:00:00Z",
//       "address": "192.168.1.100",
//       "notificationSent": true,
//       "reason": "first_run"
//     }
//   ]
// }
// ```
//
// Most-recent-last.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::HISTORY_CAP;
use crate::Error;
use crate::traits::history_log::{HistoryEntry, HistoryLog};

/// Serializable history file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HistoryFileFormat {
    entries: Vec<HistoryEntry>,
}

/// File-based history log with drop-oldest retention
#[derive(Debug, Clone)]
pub struct FileHistoryLog {
    path: PathBuf,
}

impl FileHistoryLog {
    /// Create a log backed by the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read all retained entries, most-recent-last
    ///
    /// Missing, unreadable, or corrupt logs read as empty; this operation
    /// never fails.
    pub async fn entries(&self) -> Vec<HistoryEntry> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str::<HistoryFileFormat>(&content) {
            Ok(file) => file.entries,
            Err(e) => {
                tracing::warn!(
                    "history file {} is corrupt, starting fresh: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    async fn write_entries(&self, entries: Vec<HistoryEntry>) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(&HistoryFileFormat { entries })
            .map_err(|e| Error::history(format!("failed to serialize history: {}", e)))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::history(format!(
                    "failed to create history directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::history(format!(
                    "failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::history(format!(
                    "failed to write temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::history(format!(
                    "failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::history(format!(
                "failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }
}

#[async_trait]
impl HistoryLog for FileHistoryLog {
    async fn append(&self, entry: HistoryEntry) -> Result<(), Error> {
        let mut entries = self.entries().await;
        entries.push(entry);

        // Drop-oldest retention
        if entries.len() > HISTORY_CAP {
            let excess = entries.len() - HISTORY_CAP;
            entries.drain(..excess);
        }

        self.write_entries(entries).await
    }
}
