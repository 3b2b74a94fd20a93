// # ipnotify-agent
//
// Trigger-fired entry point for the network-change notifier.
//
// An external scheduler (launchd watcher, systemd path/timer unit, hook
// script) invokes this binary once per network event. The binary wires the
// real collaborators, runs the decision core exactly once, and exits.
// There is no daemon mode: re-invocation is the only retry mechanism.
//
// ## Configuration
//
// Paths and knobs come from environment variables:
//
// - `IPNOTIFY_CONFIG_PATH`: notifier configuration (JSON)
// - `IPNOTIFY_STATE_PATH`: last successfully communicated state (JSON)
// - `IPNOTIFY_HISTORY_PATH`: append-only run history (JSON)
// - `IPNOTIFY_INTERFACE`: restrict detection to one interface (optional)
// - `IPNOTIFY_LOG_LEVEL`: trace|debug|info|warn|error (default: warn)
//
// Unset paths default to `$HOME/.config/ipnotify/{config,state,history}.json`.
//
// The notification API key is resolved from the environment variable named
// by the config's `keychain` reference (see `EnvSecretStore`).
//
// ## Exit codes
//
// - 0: any normal termination, including every silent path and a failed
//   notification
// - 1: structurally invalid or unreadable configuration (the one fatal
//   class), or broken process environment

use anyhow::Result;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use ipnotify_core::{Agent, FileConfigSource, FileHistoryLog, FileStateStore, RunOutcome};
use ipnotify_mail_resend::{EnvSecretStore, ResendMailer};
use ipnotify_net_local::LocalIpSource;

/// Exit codes for the trigger contract
///
/// The external trigger mechanism surfaces non-zero exits through its own
/// logging; everything else must look like a clean run.
#[derive(Debug, Clone, Copy)]
enum AgentExitCode {
    /// Normal termination, including silent paths and contained failures
    Success = 0,
    /// Structural configuration error (the one fatal class)
    ConfigError = 1,
}

impl From<AgentExitCode> for ExitCode {
    fn from(code: AgentExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Process environment settings
struct Settings {
    config_path: PathBuf,
    state_path: PathBuf,
    history_path: PathBuf,
    interface: Option<String>,
    log_level: String,
}

impl Settings {
    /// Load settings from environment variables
    fn from_env() -> Result<Self> {
        let base = match env::var("HOME") {
            Ok(home) => PathBuf::from(home).join(".config").join("ipnotify"),
            Err(_) => PathBuf::from(".").join("ipnotify"),
        };

        let path_or = |var: &str, default: PathBuf| -> PathBuf {
            env::var(var).map(PathBuf::from).unwrap_or(default)
        };

        Ok(Self {
            config_path: path_or("IPNOTIFY_CONFIG_PATH", base.join("config.json")),
            state_path: path_or("IPNOTIFY_STATE_PATH", base.join("state.json")),
            history_path: path_or("IPNOTIFY_HISTORY_PATH", base.join("history.json")),
            interface: env::var("IPNOTIFY_INTERFACE").ok().filter(|s| !s.is_empty()),
            log_level: env::var("IPNOTIFY_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
        })
    }

    /// Validate the settings
    fn validate(&self) -> Result<()> {
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "IPNOTIFY_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
        Ok(())
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    }
}

fn main() -> ExitCode {
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("environment error: {}", e);
            return AgentExitCode::ConfigError.into();
        }
    };

    if let Err(e) = settings.validate() {
        eprintln!("environment validation error: {}", e);
        return AgentExitCode::ConfigError.into();
    }

    // Logs go to stderr so a clean run writes nothing to stdout
    let subscriber = FmtSubscriber::builder()
        .with_max_level(settings.level())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set tracing subscriber: {}", e);
        return AgentExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create tokio runtime: {}", e);
            return AgentExitCode::ConfigError.into();
        }
    };

    rt.block_on(run_once(settings)).into()
}

/// Wire the collaborators and execute one decision pass
async fn run_once(settings: Settings) -> AgentExitCode {
    let ip_source = match &settings.interface {
        Some(interface) => LocalIpSource::for_interface(interface),
        None => LocalIpSource::new(),
    };

    let mailer = match ResendMailer::new(Box::new(EnvSecretStore::new())) {
        Ok(mailer) => mailer,
        Err(e) => {
            error!("failed to construct notifier: {}", e);
            return AgentExitCode::ConfigError;
        }
    };

    let agent = Agent::new(
        Box::new(FileConfigSource::new(&settings.config_path)),
        Box::new(ip_source),
        Box::new(FileStateStore::new(&settings.state_path)),
        Box::new(mailer),
        Box::new(FileHistoryLog::new(&settings.history_path)),
    );

    match agent.run().await {
        Ok(outcome) => {
            match &outcome {
                RunOutcome::Disabled => info!("exiting: disabled"),
                RunOutcome::NoNetwork => info!("exiting: no qualifying network"),
                RunOutcome::NoChange { address } => info!("exiting: {} unchanged", address),
                RunOutcome::NotifyFailed { address, .. } => {
                    warn!("notification failed for {}, state left stale", address)
                }
                RunOutcome::Notified { address, .. } => info!("notified for {}", address),
            }
            AgentExitCode::Success
        }
        Err(e) if e.is_fatal() => {
            error!("configuration error: {}", e);
            AgentExitCode::ConfigError
        }
        Err(e) => {
            // Contained by contract: a state commit failure after a
            // successful notification is logged but not escalated.
            error!("run failed after notification: {}", e);
            AgentExitCode::Success
        }
    }
}
