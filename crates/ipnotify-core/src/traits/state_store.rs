// # State Store Trait
//
// Defines the interface for persisting the last-known observed state.
//
// ## Purpose
//
// The persisted state is the single source of truth for "the address that
// was last successfully communicated". It is written only after a
// notification succeeded, so a failed send leaves the stale state in place
// and the next trigger re-detects the same change.
//
// ## Implementations
//
// - File-based: JSON with atomic replace (`state::FileStateStore`)
// - In-memory: tests and ephemeral runs (`state::MemoryStateStore`)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// The last network state for which a notification was delivered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedState {
    /// Private IPv4 address, dotted decimal on disk
    pub address: Ipv4Addr,
    /// When the state was committed, ISO-8601 on disk
    pub observed_at: chrono::DateTime<chrono::Utc>,
}

impl ObservedState {
    /// Create a state stamped with the current time
    pub fn now(address: Ipv4Addr) -> Self {
        Self {
            address,
            observed_at: chrono::Utc::now(),
        }
    }
}

/// Trait for state store implementations
///
/// Each invocation of the agent is a fresh, short-lived process, so
/// implementations must not cache across calls: `read` reflects what is
/// durably stored right now.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the persisted state
    ///
    /// Absence is not an error; it is the first-run signal. Unreadable or
    /// corrupt persisted data is also reported as absent (self-healing: the
    /// next successful notification overwrites it).
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ObservedState))`: a prior commit exists and decodes
    /// - `Ok(None)`: no usable prior state
    /// - `Err(Error)`: the storage itself failed (not mere corruption)
    async fn read(&self) -> Result<Option<ObservedState>, crate::Error>;

    /// Replace the persisted state atomically
    ///
    /// The whole previous content is replaced in one operation; a concurrent
    /// reader must never observe a partial write. Implementations ensure the
    /// containing location exists first.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: the state is durably committed
    /// - `Err(Error)`: genuine I/O failure
    async fn write(&self, state: &ObservedState) -> Result<(), crate::Error>;
}
