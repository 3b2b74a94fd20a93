// # ipnotify-core
//
// Core library for the trigger-fired network-change notifier.
//
// ## Architecture Overview
//
// One invocation, one decision, one exit:
// - **ConfigSource**: load and validate the persisted configuration
// - **IpSource**: detect the current private IPv4 address
// - **StateStore**: persist the last successfully communicated state
// - **Notifier**: deliver the change notification (all-or-nothing)
// - **HistoryLog**: best-effort append-only record of run outcomes
// - **Agent**: orchestrates the pass with strict ordering and failure
//   containment
//
// ## Design Principles
//
// 1. **State follows notification**: the observed state is committed if and
//    only if the notification succeeded in the same run
// 2. **Containment**: only structural configuration errors escape; every
//    environmental failure maps to a silent, normal termination
// 3. **Externally driven retries**: a failed run changes nothing, so the
//    next trigger re-detects the same change
// 4. **No hidden state**: two small JSON files, read and replaced
//    atomically, no in-process caching across invocations

pub mod agent;
pub mod config;
pub mod error;
pub mod history;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use agent::{Agent, RunOutcome};
pub use config::{AgentConfig, DisplayMetadata, FileConfigSource, SecretRef};
pub use error::{Error, Result};
pub use history::{FileHistoryLog, MemoryHistoryLog};
pub use state::{FileStateStore, MemoryStateStore};
pub use traits::{
    ChangeReason, ConfigSource, HistoryEntry, HistoryLog, IpSource, Notifier, ObservedState,
    SecretStore, StateStore,
};
