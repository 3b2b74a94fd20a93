// # Local Interface IP Source
//
// This crate provides an IpSource that scans local network interfaces for
// a private IPv4 address.
//
// ## Detection rules
//
// An address qualifies when all of the following hold:
// - IPv4 on an interface that is UP and RUNNING
// - matches the configured interface name, if one is set
// - RFC1918 (10/8, 172.16/12, 192.168/16)
// - not loopback, not link-local
//
// The first qualifying address wins; none means the source fails and the
// agent exits silently for this trigger.
//
// ## Platform Support
//
// Interface enumeration uses `getifaddrs` via libc and is only available on
// Unix-like systems. On other platforms the source always fails, which the
// agent treats as "no network this run".

use async_trait::async_trait;
use std::net::Ipv4Addr;

use ipnotify_core::traits::IpSource;
use ipnotify_core::{Error, Result};

/// IP source backed by a scan of local network interfaces
#[derive(Debug, Clone, Default)]
pub struct LocalIpSource {
    /// Restrict the scan to one interface (e.g. "wlan0"); `None` scans all
    interface: Option<String>,
}

impl LocalIpSource {
    /// Create a source that scans every interface
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source restricted to a single interface name
    pub fn for_interface(interface: impl Into<String>) -> Self {
        Self {
            interface: Some(interface.into()),
        }
    }
}

#[async_trait]
impl IpSource for LocalIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        let candidates = enumerate_ipv4_addrs()?;

        for (name, addr) in candidates {
            if let Some(want) = &self.interface
                && name != *want
            {
                continue;
            }

            if is_private_lan(addr) {
                tracing::debug!("detected private address {} on {}", addr, name);
                return Ok(addr);
            }

            tracing::trace!("skipping non-qualifying address {} on {}", addr, name);
        }

        Err(Error::ip_source("no qualifying private IPv4 address"))
    }
}

/// Whether an address is a usable RFC1918 LAN address.
///
/// Loopback and link-local are excluded explicitly even though they fall
/// outside RFC1918 anyway; the checks document the contract.
pub fn is_private_lan(addr: Ipv4Addr) -> bool {
    !addr.is_loopback() && !addr.is_link_local() && addr.is_private()
}

/// Enumerate IPv4 addresses of interfaces that are UP and RUNNING,
/// as (interface name, address) pairs in kernel order.
#[cfg(unix)]
fn enumerate_ipv4_addrs() -> Result<Vec<(String, Ipv4Addr)>> {
    use std::ffi::CStr;

    let mut ifap: *mut libc::ifaddrs = std::ptr::null_mut();

    // SAFETY: getifaddrs allocates the list it stores into ifap; on success
    // we own it until the freeifaddrs below.
    if unsafe { libc::getifaddrs(&mut ifap) } != 0 {
        return Err(Error::ip_source(format!(
            "getifaddrs failed: {}",
            std::io::Error::last_os_error()
        )));
    }

    let mut addrs = Vec::new();
    let mut cursor = ifap;

    while !cursor.is_null() {
        // SAFETY: cursor is a valid node of the list returned by getifaddrs
        let ifa = unsafe { &*cursor };
        cursor = ifa.ifa_next;

        if ifa.ifa_addr.is_null() {
            continue;
        }

        // SAFETY: ifa_addr is non-null and points at a sockaddr
        let family = unsafe { (*ifa.ifa_addr).sa_family };
        if i32::from(family) != libc::AF_INET {
            continue;
        }

        let flags = ifa.ifa_flags;
        if flags & (libc::IFF_UP as u32) == 0 || flags & (libc::IFF_RUNNING as u32) == 0 {
            continue;
        }

        // SAFETY: ifa_name is a valid NUL-terminated string for list nodes
        let name = unsafe { CStr::from_ptr(ifa.ifa_name) }
            .to_string_lossy()
            .into_owned();

        // SAFETY: sa_family == AF_INET guarantees this is a sockaddr_in
        let sin = unsafe { &*(ifa.ifa_addr as *const libc::sockaddr_in) };
        let addr = Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr));

        addrs.push((name, addr));
    }

    // SAFETY: ifap came from a successful getifaddrs and is freed once
    unsafe { libc::freeifaddrs(ifap) };

    Ok(addrs)
}

#[cfg(not(unix))]
fn enumerate_ipv4_addrs() -> Result<Vec<(String, Ipv4Addr)>> {
    Err(Error::ip_source(
        "interface enumeration is only supported on Unix",
    ))
}
