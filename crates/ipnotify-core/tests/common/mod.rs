//! Test doubles and common utilities for decision contract tests
//!
//! These doubles count calls and record arguments so tests can verify the
//! agent's ordering and failure-containment guarantees without touching
//! real files or the network.

use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ipnotify_core::error::{Error, Result};
use ipnotify_core::traits::{
    ConfigSource, HistoryEntry, HistoryLog, IpSource, Notifier, ObservedState, StateStore,
};
use ipnotify_core::{AgentConfig, SecretRef};

/// A minimal valid v2 configuration
pub fn valid_config() -> AgentConfig {
    AgentConfig {
        version: 2,
        enabled: true,
        email: None,
        emails: Some(vec![
            "ops@example.com".to_string(),
            "oncall@example.com".to_string(),
        ]),
        metadata: None,
        keychain: SecretRef {
            service: "ipnotify".to_string(),
            account: "resend".to_string(),
        },
    }
}

/// What a [`StubConfigSource`] should answer with
#[derive(Debug, Clone)]
pub enum ConfigResponse {
    Valid(AgentConfig),
    Disabled,
    Malformed,
}

/// A config source with a scripted response
#[derive(Clone)]
pub struct StubConfigSource {
    response: ConfigResponse,
    load_calls: Arc<AtomicUsize>,
}

impl StubConfigSource {
    pub fn new(response: ConfigResponse) -> Self {
        Self {
            response,
            load_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigSource for StubConfigSource {
    async fn load(&self) -> Result<AgentConfig> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            ConfigResponse::Valid(config) => Ok(config.clone()),
            ConfigResponse::Disabled => Err(Error::Disabled),
            ConfigResponse::Malformed => Err(Error::config_invalid("scripted parse failure")),
        }
    }
}

/// An IP source returning a fixed address, or failing when given none
#[derive(Clone)]
pub struct FixedIpSource {
    address: Option<Ipv4Addr>,
    current_calls: Arc<AtomicUsize>,
}

impl FixedIpSource {
    pub fn new(address: Ipv4Addr) -> Self {
        Self {
            address: Some(address),
            current_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            address: None,
            current_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn current_calls(&self) -> usize {
        self.current_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IpSource for FixedIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        self.address
            .ok_or_else(|| Error::ip_source("no qualifying address"))
    }
}

/// A state store with counters around an in-memory slot
#[derive(Clone, Default)]
pub struct CountingStateStore {
    state: Arc<std::sync::Mutex<Option<ObservedState>>>,
    read_calls: Arc<AtomicUsize>,
    write_calls: Arc<AtomicUsize>,
}

impl CountingStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: ObservedState) -> Self {
        let store = Self::default();
        *store.state.lock().unwrap() = Some(state);
        store
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub fn current(&self) -> Option<ObservedState> {
        self.state.lock().unwrap().clone()
    }
}

#[async_trait]
impl StateStore for CountingStateStore {
    async fn read(&self) -> Result<Option<ObservedState>> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().unwrap().clone())
    }

    async fn write(&self, state: &ObservedState) -> Result<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        *self.state.lock().unwrap() = Some(state.clone());
        Ok(())
    }
}

/// A notifier that records the addresses and recipients it was asked about
#[derive(Clone)]
pub struct RecordingNotifier {
    succeed: bool,
    notify_calls: Arc<AtomicUsize>,
    last_address: Arc<std::sync::Mutex<Option<Ipv4Addr>>>,
    last_recipients: Arc<std::sync::Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn succeeding() -> Self {
        Self::new(true)
    }

    pub fn failing() -> Self {
        Self::new(false)
    }

    fn new(succeed: bool) -> Self {
        Self {
            succeed,
            notify_calls: Arc::new(AtomicUsize::new(0)),
            last_address: Arc::new(std::sync::Mutex::new(None)),
            last_recipients: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn notify_calls(&self) -> usize {
        self.notify_calls.load(Ordering::SeqCst)
    }

    pub fn last_address(&self) -> Option<Ipv4Addr> {
        *self.last_address.lock().unwrap()
    }

    pub fn last_recipients(&self) -> Vec<String> {
        self.last_recipients.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, config: &AgentConfig, address: Ipv4Addr) -> Result<()> {
        self.notify_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_address.lock().unwrap() = Some(address);
        *self.last_recipients.lock().unwrap() = config.recipients();

        if self.succeed {
            Ok(())
        } else {
            Err(Error::notify("scripted delivery failure"))
        }
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// A history log that records entries and can be scripted to fail
#[derive(Clone, Default)]
pub struct RecordingHistoryLog {
    fail: bool,
    entries: Arc<std::sync::Mutex<Vec<HistoryEntry>>>,
    append_calls: Arc<AtomicUsize>,
}

impl RecordingHistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn append_calls(&self) -> usize {
        self.append_calls.load(Ordering::SeqCst)
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryLog for RecordingHistoryLog {
    async fn append(&self, entry: HistoryEntry) -> Result<()> {
        self.append_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::history("scripted history failure"));
        }
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}
