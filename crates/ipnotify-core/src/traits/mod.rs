//! Collaborator traits for the notifier agent
//!
//! The decision core only ever talks to these interfaces; the concrete
//! config file, interface scan, mail transport, and state files hide behind
//! them.
//!
//! - [`ConfigSource`]: load and validate configuration
//! - [`IpSource`]: detect the current private IPv4 address
//! - [`Notifier`]: deliver a change notification (all-or-nothing)
//! - [`SecretStore`]: resolve an opaque secret reference
//! - [`StateStore`]: persist the last successfully communicated state
//! - [`HistoryLog`]: best-effort append-only record of run outcomes

pub mod config_source;
pub mod history_log;
pub mod ip_source;
pub mod notifier;
pub mod secret_store;
pub mod state_store;

pub use config_source::ConfigSource;
pub use history_log::{ChangeReason, HistoryEntry, HistoryLog};
pub use ip_source::IpSource;
pub use notifier::Notifier;
pub use secret_store::SecretStore;
pub use state_store::{ObservedState, StateStore};
