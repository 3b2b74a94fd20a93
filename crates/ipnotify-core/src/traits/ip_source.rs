// # IP Source Trait
//
// Defines the interface for detecting the current private IPv4 address.
//
// ## Implementations
//
// - Local interface scan: `ipnotify-net-local` crate
// - Test doubles in the contract test suite
//
// ## Contract
//
// The source either produces an RFC1918 address (never loopback, never
// link-local) or fails. It makes no decisions: whether a detection failure
// aborts the run, and what a new address means, is owned by the agent.

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for IP source implementations
///
/// A single-shot query for the current private IPv4 address. The agent is
/// trigger-fired and short-lived, so there is no watch/subscribe surface;
/// the external trigger mechanism is the change monitor.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Detect the current private IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(Ipv4Addr)`: an RFC1918 address on an interface that is up
    /// - `Err(Error)`: no interface or no qualifying address
    async fn current(&self) -> Result<Ipv4Addr, crate::Error>;
}
