// # File State Store
//
// File-based implementation of StateStore.
//
// ## Durability discipline
//
// - Atomic replace: new state goes to a temporary file, then a rename
// - Parent directory created on demand before the first write
// - Corrupt or unreadable content reads as absent (self-healing: the next
//   successful notification overwrites it)
//
// ## No caching
//
// Every agent invocation is a separate short-lived process, so this store
// holds nothing in memory: `read` and `write` always hit the file.
//
// ## File format
//
// ```json
// {
//   "address": "192.168.1.100",
//   "observedAt": "2025-01-09T12:00:00Z"
// }
// ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::traits::state_store::{ObservedState, StateStore};

/// File-based state store with atomic replace
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Create a store backed by the given path
    ///
    /// The file itself may not exist yet; that is the first-run signal.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn read(&self) -> Result<Option<ObservedState>, Error> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("state file does not exist: {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                // Unreadable counts as absent, same as corrupt
                tracing::warn!("state file unreadable, treating as absent: {}", e);
                return Ok(None);
            }
        };

        match serde_json::from_str::<ObservedState>(&content) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                tracing::warn!(
                    "state file {} is corrupt, treating as absent: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    async fn write(&self, state: &ObservedState) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| Error::state_store(format!("failed to serialize state: {}", e)))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::state_store(format!(
                    "failed to create state directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::state_store(format!(
                    "failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::state_store(format!(
                    "failed to write temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::state_store(format!(
                    "failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        // Atomic rename (temp -> actual)
        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::state_store(format!(
                "failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("state written to {}", self.path.display());
        Ok(())
    }
}
