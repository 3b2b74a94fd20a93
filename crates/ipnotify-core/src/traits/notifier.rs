// # Notifier Trait
//
// Defines the interface for delivering a change notification.
//
// ## Implementations
//
// - Resend email API: `ipnotify-mail-resend` crate
// - Test doubles in the contract test suite
//
// ## All-or-nothing contract
//
// A configuration can name several recipients. Implementations may send to
// them sequentially or concurrently, but they expose exactly one composite
// verdict: any single recipient failure (including a timeout) fails the
// whole attempt, even if other recipients were already delivered. Partial
// success never leaks to the agent; the only retry mechanism is the next
// external trigger, which re-sends to every recipient.

use async_trait::async_trait;
use std::net::Ipv4Addr;

use crate::config::AgentConfig;

/// Trait for notification delivery implementations
///
/// Implementations must apply a bounded timeout (order of seconds) to the
/// outbound send so a run can never hang indefinitely; exceeding it is an
/// ordinary failure. No retries, no backoff, no scheduling: the agent owns
/// all of those decisions (by owning none, per its contract).
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification for the detected address
    ///
    /// # Parameters
    ///
    /// - `config`: validated configuration (recipients, metadata, secret ref)
    /// - `address`: the newly detected private IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(())`: every recipient was delivered
    /// - `Err(Error)`: at least one recipient failed
    async fn notify(&self, config: &AgentConfig, address: Ipv4Addr) -> Result<(), crate::Error>;

    /// Transport name for logging
    fn name(&self) -> &'static str;
}
