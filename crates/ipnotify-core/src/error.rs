//! Error types for the notifier agent
//!
//! Most of these variants are deliberately never surfaced to the caller:
//! the agent's contract is that only structural configuration problems are
//! fatal, while environmental failures terminate the run silently. The
//! variants still exist so that tests and logs can tell the causes apart.

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the notifier agent
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file does not exist
    #[error("configuration file not found: {0}")]
    ConfigMissing(String),

    /// Configuration file exists but cannot be decoded
    #[error("configuration is malformed: {0}")]
    ConfigInvalid(String),

    /// Configuration schema generation is not supported
    #[error("unsupported configuration schema version: {0}")]
    UnsupportedSchemaVersion(u32),

    /// Configuration carries no usable recipient
    #[error("configuration has no recipients")]
    MissingRecipients,

    /// Secret reference is incomplete (empty service or account)
    #[error("configuration has an invalid secret reference")]
    InvalidSecretRef,

    /// The feature is switched off in configuration.
    /// Not a failure: the agent exits normally when it sees this.
    #[error("notifier is disabled in configuration")]
    Disabled,

    /// Network detection errors (no interface, no qualifying address)
    #[error("IP source error: {0}")]
    IpSource(String),

    /// Notification delivery errors (transport, timeout, non-2xx, secret lookup)
    #[error("notifier error: {0}")]
    Notify(String),

    /// State store errors
    #[error("state store error: {0}")]
    StateStore(String),

    /// History log errors
    #[error("history log error: {0}")]
    History(String),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an IP source error
    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }

    /// Create a notifier error
    pub fn notify(msg: impl Into<String>) -> Self {
        Self::Notify(msg.into())
    }

    /// Create a state store error
    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::StateStore(msg.into())
    }

    /// Create a history log error
    pub fn history(msg: impl Into<String>) -> Self {
        Self::History(msg.into())
    }

    /// Create a malformed-configuration error
    pub fn config_invalid(msg: impl Into<String>) -> Self {
        Self::ConfigInvalid(msg.into())
    }

    /// Whether this error belongs to the one class that crosses the agent
    /// boundary: structurally invalid or unreadable configuration.
    ///
    /// `Disabled` is excluded on purpose; it is a silent success path.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigMissing(_)
                | Self::ConfigInvalid(_)
                | Self::UnsupportedSchemaVersion(_)
                | Self::MissingRecipients
                | Self::InvalidSecretRef
        )
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
