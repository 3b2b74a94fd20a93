// # Secret Store Trait
//
// Defines the interface for resolving an opaque secret reference.
//
// The agent never sees a resolved secret: it passes the `{service, account}`
// pair from configuration through to the notifier, and the notifier resolves
// it at send time. Resolution failures surface as ordinary notification
// failures.

use crate::config::SecretRef;

/// Trait for platform secret store implementations
pub trait SecretStore: Send + Sync {
    /// Resolve a secret reference to its value
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: the stored secret
    /// - `Err(Error)`: the reference does not resolve
    fn resolve(&self, secret_ref: &SecretRef) -> Result<String, crate::Error>;
}
