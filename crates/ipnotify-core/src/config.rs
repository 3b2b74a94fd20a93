//! Configuration types and the file-backed loader
//!
//! Two schema generations exist on disk and both must decode:
//!
//! - v1: a single `email` field (legacy)
//! - v2: an `emails` list (current)
//!
//! The loader normalizes both into one canonical recipient list, preferring
//! the v2 list whenever it is present and non-empty. Everything downstream
//! of the loader sees only the canonical shape.
//!
//! ## File format
//!
//! ```json
//! {
//!   "version": 2,
//!   "enabled": true,
//!   "emails": ["ops@example.com", "oncall@example.com"],
//!   "metadata": { "label": "home lab", "notes": "behind CGNAT" },
//!   "keychain": { "service": "ipnotify", "account": "resend" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{Error, Result};

/// Schema generations the loader accepts
const SUPPORTED_VERSIONS: &[u32] = &[1, 2];

/// Agent configuration, immutable once loaded for the duration of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Schema generation of the file this was decoded from
    pub version: u32,

    /// Master switch; a disabled config terminates the run silently
    pub enabled: bool,

    /// v1 single recipient (legacy, kept for decode compatibility)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// v2 recipient list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,

    /// Optional display metadata echoed into notifications
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DisplayMetadata>,

    /// Opaque secret reference, resolved by the notifier at send time
    pub keychain: SecretRef,
}

/// Free-form labels attached to notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Opaque handle into a platform secret store.
///
/// The decision core passes this through untouched; only the notifier's
/// secret store collaborator ever resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRef {
    pub service: String,
    pub account: String,
}

impl AgentConfig {
    /// All recipients, normalized across schema generations.
    ///
    /// Prefers the v2 `emails` list when present and non-empty, falling back
    /// to the v1 `email` field. Order is preserved; duplicates are allowed.
    pub fn recipients(&self) -> Vec<String> {
        if let Some(emails) = &self.emails
            && !emails.is_empty()
        {
            return emails.clone();
        }
        if let Some(email) = &self.email
            && !email.is_empty()
        {
            return vec![email.clone()];
        }
        Vec::new()
    }

    /// Validate the configuration
    ///
    /// Checks, in order: supported schema version, enabled flag, at least
    /// one recipient, complete secret reference. A disabled config is
    /// reported as `Error::Disabled`, which callers treat as a normal exit.
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version) {
            return Err(Error::UnsupportedSchemaVersion(self.version));
        }

        if !self.enabled {
            return Err(Error::Disabled);
        }

        if self.recipients().is_empty() {
            return Err(Error::MissingRecipients);
        }

        if self.keychain.service.is_empty() || self.keychain.account.is_empty() {
            return Err(Error::InvalidSecretRef);
        }

        Ok(())
    }
}

/// File-backed configuration source
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl crate::traits::ConfigSource for FileConfigSource {
    async fn load(&self) -> Result<AgentConfig> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ConfigMissing(self.path.display().to_string()));
            }
            Err(e) => {
                return Err(Error::config_invalid(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let config: AgentConfig = serde_json::from_str(&content).map_err(|e| {
            Error::config_invalid(format!("failed to parse {}: {}", self.path.display(), e))
        })?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ConfigSource;

    fn base_config() -> AgentConfig {
        AgentConfig {
            version: 2,
            enabled: true,
            email: None,
            emails: Some(vec!["ops@example.com".to_string()]),
            metadata: None,
            keychain: SecretRef {
                service: "ipnotify".to_string(),
                account: "resend".to_string(),
            },
        }
    }

    #[test]
    fn v2_list_is_used_natively() {
        let config = base_config();
        assert_eq!(config.recipients(), vec!["ops@example.com".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn v1_single_field_is_normalized_into_a_list() {
        let config = AgentConfig {
            version: 1,
            emails: None,
            email: Some("legacy@example.com".to_string()),
            ..base_config()
        };
        assert_eq!(config.recipients(), vec!["legacy@example.com".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn v2_list_wins_when_both_fields_are_present() {
        let config = AgentConfig {
            email: Some("legacy@example.com".to_string()),
            emails: Some(vec!["a@example.com".to_string(), "b@example.com".to_string()]),
            ..base_config()
        };
        assert_eq!(
            config.recipients(),
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );
    }

    #[test]
    fn empty_v2_list_falls_back_to_v1_field() {
        let config = AgentConfig {
            email: Some("legacy@example.com".to_string()),
            emails: Some(Vec::new()),
            ..base_config()
        };
        assert_eq!(config.recipients(), vec!["legacy@example.com".to_string()]);
    }

    #[test]
    fn disabled_config_is_its_own_variant() {
        let config = AgentConfig {
            enabled: false,
            ..base_config()
        };
        assert!(matches!(config.validate(), Err(Error::Disabled)));
    }

    #[test]
    fn unknown_schema_version_is_rejected() {
        let config = AgentConfig {
            version: 999,
            ..base_config()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::UnsupportedSchemaVersion(999))
        ));
    }

    #[test]
    fn missing_recipients_are_rejected() {
        let config = AgentConfig {
            email: None,
            emails: None,
            ..base_config()
        };
        assert!(matches!(config.validate(), Err(Error::MissingRecipients)));
    }

    #[test]
    fn incomplete_secret_ref_is_rejected() {
        let config = AgentConfig {
            keychain: SecretRef {
                service: String::new(),
                account: "resend".to_string(),
            },
            ..base_config()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidSecretRef)));
    }

    #[tokio::test]
    async fn file_source_decodes_both_generations() {
        let dir = tempfile::tempdir().unwrap();

        let v1 = dir.path().join("v1.json");
        tokio::fs::write(
            &v1,
            r#"{
                "version": 1,
                "enabled": true,
                "email": "legacy@example.com",
                "keychain": { "service": "ipnotify", "account": "resend" }
            }"#,
        )
        .await
        .unwrap();
        let config = FileConfigSource::new(&v1).load().await.unwrap();
        assert_eq!(config.recipients(), vec!["legacy@example.com".to_string()]);

        let v2 = dir.path().join("v2.json");
        tokio::fs::write(
            &v2,
            r#"{
                "version": 2,
                "enabled": true,
                "emails": ["a@example.com", "b@example.com"],
                "metadata": { "label": "home lab" },
                "keychain": { "service": "ipnotify", "account": "resend" }
            }"#,
        )
        .await
        .unwrap();
        let config = FileConfigSource::new(&v2).load().await.unwrap();
        assert_eq!(config.recipients().len(), 2);
        assert_eq!(config.metadata.unwrap().label.as_deref(), Some("home lab"));
    }

    #[tokio::test]
    async fn missing_file_is_a_distinct_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileConfigSource::new(dir.path().join("absent.json"));
        assert!(matches!(
            source.load().await,
            Err(Error::ConfigMissing(_))
        ));
    }

    #[tokio::test]
    async fn malformed_file_is_a_structural_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let err = FileConfigSource::new(&path).load().await.unwrap_err();
        assert!(err.is_fatal());
    }
}
