// # Config Source Trait
//
// Defines the interface for loading validated configuration.
//
// ## Implementations
//
// - File-based: `FileConfigSource` in the `config` module
// - Test doubles in the contract test suite

use async_trait::async_trait;

use crate::config::AgentConfig;

/// Trait for configuration sources
///
/// A successful load yields a configuration that already passed validation:
/// supported schema version, enabled, at least one recipient, complete
/// secret reference. The error taxonomy matters to callers:
///
/// - `Error::Disabled` is a normal-exit signal, not a failure
/// - every other error from this trait is structural and fatal
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Load and validate the configuration
    async fn load(&self) -> Result<AgentConfig, crate::Error>;
}
