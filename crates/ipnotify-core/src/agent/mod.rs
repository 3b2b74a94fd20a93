//! Decision core
//!
//! The Agent is responsible for one trigger-fired pass:
//! - Load and validate configuration
//! - Detect the current private IPv4 address
//! - Compare against the persisted observed state
//! - Notify on change, then commit state only if notification succeeded
//! - Append a best-effort history entry
//!
//! ## Decision flow
//!
//! ```text
//! ┌──────────────┐   disabled          ┌─────────────────┐
//! │ ConfigSource │────────────────────▶│ silent exit     │
//! └──────┬───────┘   structural error  │ (Disabled)      │
//!        │          ─────fatal────▶    └─────────────────┘
//!        ▼
//! ┌──────────────┐   failure
//! │   IpSource   │────────────────────▶ silent exit (NoNetwork)
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐   same address
//! │  StateStore  │────────────────────▶ silent exit (NoChange)
//! │   (read)     │
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐   failure           ┌─────────────────┐
//! │   Notifier   │────────────────────▶│ history entry,  │
//! └──────┬───────┘                     │ state untouched │
//!        ▼                             └─────────────────┘
//! ┌──────────────┐
//! │  StateStore  │──▶ history entry, done
//! │   (write)    │
//! └──────────────┘
//! ```
//!
//! Exactly one pass per call. No loops, no retries, no sleeps: re-delivery
//! happens because a failed run leaves the stale state in place, so the next
//! external trigger sees the same change again.

use std::net::Ipv4Addr;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::traits::{
    ChangeReason, ConfigSource, HistoryEntry, HistoryLog, IpSource, Notifier, ObservedState,
    StateStore,
};

/// How a run terminated.
///
/// Most of these are "silent" paths: they carry no error to the caller, but
/// the distinction still matters for logging and for tests. Never conflate
/// "no error" with "nothing went wrong".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Configuration marks the feature disabled; zero side effects
    Disabled,
    /// No qualifying private address was detected; zero side effects
    NoNetwork,
    /// Detected address equals the persisted one; zero side effects
    NoChange { address: Ipv4Addr },
    /// A change was detected but notification failed; state untouched
    NotifyFailed {
        address: Ipv4Addr,
        reason: ChangeReason,
    },
    /// Notification delivered and state committed
    Notified {
        address: Ipv4Addr,
        reason: ChangeReason,
    },
}

/// Trigger-fired decision core
///
/// Owns no policy beyond the ordered pass above; every capability is an
/// injected collaborator. The only error class that escapes [`Agent::run`]
/// to the caller is structurally invalid configuration (see
/// [`Error::is_fatal`]) plus the rare state-commit failure after a
/// successful notification, which the binary logs without escalating.
pub struct Agent {
    config_source: Box<dyn ConfigSource>,
    ip_source: Box<dyn IpSource>,
    state_store: Box<dyn StateStore>,
    notifier: Box<dyn Notifier>,
    history: Box<dyn HistoryLog>,
}

impl Agent {
    /// Create a new agent from its collaborators
    pub fn new(
        config_source: Box<dyn ConfigSource>,
        ip_source: Box<dyn IpSource>,
        state_store: Box<dyn StateStore>,
        notifier: Box<dyn Notifier>,
        history: Box<dyn HistoryLog>,
    ) -> Self {
        Self {
            config_source,
            ip_source,
            state_store,
            notifier,
            history,
        }
    }

    /// Execute exactly one decision pass
    ///
    /// # Returns
    ///
    /// - `Ok(RunOutcome)`: the run terminated normally (including all the
    ///   silent paths and a failed notification)
    /// - `Err(Error)`: structural configuration failure, or a state commit
    ///   failure after a successful notification
    pub async fn run(&self) -> Result<RunOutcome> {
        // Step 1: configuration. Disabled is a normal exit; anything else
        // that fails here is the one fatal class.
        let config = match self.config_source.load().await {
            Ok(config) => config,
            Err(Error::Disabled) => {
                debug!("notifier disabled in configuration, exiting");
                return Ok(RunOutcome::Disabled);
            }
            Err(e) => return Err(e),
        };

        // Step 2: detection. Failure is environmental: exit silently with
        // no history entry.
        let address = match self.ip_source.current().await {
            Ok(address) => address,
            Err(e) => {
                debug!("network detection failed, exiting: {}", e);
                return Ok(RunOutcome::NoNetwork);
            }
        };

        // Step 3: previous state. Absence (including self-healed corruption)
        // signals a first run.
        let previous = self.state_store.read().await?;

        // Step 4: change detection
        let reason = match &previous {
            None => ChangeReason::FirstRun,
            Some(prev) if prev.address != address => ChangeReason::AddressChange,
            Some(_) => {
                debug!("address {} unchanged, exiting", address);
                return Ok(RunOutcome::NoChange { address });
            }
        };

        info!(
            "change detected ({:?}): {:?} -> {}",
            reason,
            previous.as_ref().map(|p| p.address),
            address
        );

        // Step 5: notify. All-or-nothing across recipients; on failure the
        // state stays stale so the next trigger retries the whole attempt.
        if let Err(e) = self.notifier.notify(&config, address).await {
            warn!("notification via {} failed: {}", self.notifier.name(), e);
            self.append_history(HistoryEntry::now(address, false, reason))
                .await;
            return Ok(RunOutcome::NotifyFailed { address, reason });
        }

        // Step 6: commit state, only now that the notification went out
        self.state_store.write(&ObservedState::now(address)).await?;

        // Step 7: record the success
        self.append_history(HistoryEntry::now(address, true, reason))
            .await;

        info!("notified and committed state for {}", address);
        Ok(RunOutcome::Notified { address, reason })
    }

    /// Append a history entry, discarding any failure.
    ///
    /// History is strictly best-effort observability; it must never change
    /// the outcome of a run.
    async fn append_history(&self, entry: HistoryEntry) {
        if let Err(e) = self.history.append(entry).await {
            warn!("failed to append history entry (ignored): {}", e);
        }
    }
}
