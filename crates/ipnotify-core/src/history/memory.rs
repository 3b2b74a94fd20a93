// # Memory History Log
//
// In-memory implementation of HistoryLog for tests and dry runs.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::HISTORY_CAP;
use crate::Error;
use crate::traits::history_log::{HistoryEntry, HistoryLog};

/// In-memory history log with the same drop-oldest retention as the file log
#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryLog {
    inner: Arc<RwLock<Vec<HistoryEntry>>>,
}

impl MemoryHistoryLog {
    /// Create a new empty memory history log
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all retained entries, most-recent-last
    pub async fn entries(&self) -> Vec<HistoryEntry> {
        self.inner.read().await.clone()
    }
}

#[async_trait]
impl HistoryLog for MemoryHistoryLog {
    async fn append(&self, entry: HistoryEntry) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.push(entry);
        if guard.len() > HISTORY_CAP {
            let excess = guard.len() - HISTORY_CAP;
            guard.drain(..excess);
        }
        Ok(())
    }
}
