// # History Log Trait
//
// Defines the interface for the append-only record of run outcomes.
//
// ## Purpose
//
// Observability only. The log is one-way: entries describe what a run
// decided and whether the notification went out, and nothing ever reads
// them back into decision logic. Every failure from this interface is
// caught and discarded by the agent.
//
// ## Implementations
//
// - File-based: JSON with atomic replace (`history::FileHistoryLog`)
// - In-memory: tests (`history::MemoryHistoryLog`)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Why a run decided a change had happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeReason {
    /// No prior state existed
    FirstRun,
    /// Prior state existed with a different address
    AddressChange,
    /// Catch-all for entries written by older builds
    Unknown,
}

/// One recorded run outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// When the run made its decision, ISO-8601 on disk
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// The detected address the decision was about
    pub address: Ipv4Addr,
    /// Whether the notification was delivered
    pub notification_sent: bool,
    /// Why the run considered this a change
    pub reason: ChangeReason,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time
    pub fn now(address: Ipv4Addr, notification_sent: bool, reason: ChangeReason) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            address,
            notification_sent,
            reason,
        }
    }
}

/// Trait for history log implementations
#[async_trait]
pub trait HistoryLog: Send + Sync {
    /// Append one entry, evicting the oldest beyond the retention cap
    ///
    /// Implementations treat an unreadable or corrupt existing log as empty
    /// rather than failing; the write itself can still fail, and callers are
    /// expected to discard that failure.
    async fn append(&self, entry: HistoryEntry) -> Result<(), crate::Error>;
}
