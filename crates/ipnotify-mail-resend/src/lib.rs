// # Resend Email Notifier
//
// This crate provides a Notifier implementation that delivers change
// notifications by email through the Resend HTTP API.
//
// ## Contract
//
// - One POST per recipient, sequentially, in configuration order
// - All-or-nothing: the first failed recipient (transport error, timeout,
//   non-2xx) fails the whole attempt; partial success is never reported
// - 10-second request timeout so a trigger-fired run can never hang
// - The API key is resolved through a SecretStore from the opaque
//   `{service, account}` reference in configuration; the decision core
//   never sees the resolved secret
// - NO retry logic: a failed attempt is retried in full by the next
//   external trigger
//
// ## Security
//
// The API key never appears in logs; the Debug implementation redacts it.
//
// ## API Reference
//
// - Resend API: https://resend.com/docs/api-reference/emails/send-email
// - Send Email: POST `https://api.resend.com/emails`

use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::time::Duration;

use ipnotify_core::config::{AgentConfig, SecretRef};
use ipnotify_core::traits::{Notifier, SecretStore};
use ipnotify_core::{Error, Result};

/// Resend API endpoint for sending emails
const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Sender address; Resend's shared testing domain
const FROM_ADDRESS: &str = "ipnotify <noreply@resend.dev>";

/// Bounded timeout for each outbound send
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Email notifier backed by the Resend HTTP API
pub struct ResendMailer {
    secrets: Box<dyn SecretStore>,
    client: reqwest::Client,
    api_url: String,
}

// The resolved API key must never leak through Debug output
impl std::fmt::Debug for ResendMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendMailer")
            .field("api_url", &self.api_url)
            .field("secrets", &"<SecretStore>")
            .finish()
    }
}

impl ResendMailer {
    /// Create a mailer that resolves its API key through the given store
    pub fn new(secrets: Box<dyn SecretStore>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| Error::notify(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            secrets,
            client,
            api_url: RESEND_API_URL.to_string(),
        })
    }

    /// Override the API endpoint (integration tests against a local server)
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    async fn send_one(
        &self,
        api_key: &str,
        recipient: &str,
        subject: &str,
        html: &str,
    ) -> Result<()> {
        let payload = serde_json::json!({
            "from": FROM_ADDRESS,
            "to": [recipient],
            "subject": subject,
            "html": html,
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::notify(format!("send to {} timed out", recipient))
                } else {
                    Error::notify(format!("send to {} failed: {}", recipient, e))
                }
            })?;

        if !response.status().is_success() {
            return Err(Error::notify(format!(
                "send to {} failed with status {}",
                recipient,
                response.status()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for ResendMailer {
    async fn notify(&self, config: &AgentConfig, address: Ipv4Addr) -> Result<()> {
        let api_key = self.secrets.resolve(&config.keychain)?;

        let recipients = config.recipients();
        if recipients.is_empty() {
            return Err(Error::notify("no recipients configured"));
        }

        let subject = format!("IP Address Update: {}", address);
        let html = render_body(config, address);

        // Sequential, all-or-nothing: the first failure aborts the attempt
        // and the whole notification reports failure.
        for recipient in &recipients {
            self.send_one(&api_key, recipient, &subject, &html).await?;
            tracing::debug!("delivered notification to {}", recipient);
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "resend"
    }
}

/// Render the HTML notification body
fn render_body(config: &AgentConfig, address: Ipv4Addr) -> String {
    let mut html = format!(
        "<html>\n<body>\n<h2>IP Address Update</h2>\n\
         <p><strong>IP Address:</strong> {}</p>\n",
        address
    );

    if let Some(metadata) = &config.metadata {
        if let Some(label) = &metadata.label {
            html.push_str(&format!("<p><strong>Label:</strong> {}</p>\n", label));
        }
        if let Some(notes) = &metadata.notes {
            html.push_str(&format!("<p><strong>Notes:</strong> {}</p>\n", notes));
        }
    }

    html.push_str(&format!(
        "<p><small>Sent at {}</small></p>\n</body>\n</html>\n",
        chrono::Utc::now().to_rfc3339()
    ));

    html
}

/// Secret store that resolves references from the process environment.
///
/// A reference `{service: "ipnotify", account: "resend"}` resolves to the
/// variable `IPNOTIFY_RESEND` (uppercased, non-alphanumeric characters
/// mapped to underscores, joined with an underscore).
#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    pub fn new() -> Self {
        Self
    }

    fn var_name(secret_ref: &SecretRef) -> String {
        let sanitize = |s: &str| -> String {
            s.chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() {
                        c.to_ascii_uppercase()
                    } else {
                        '_'
                    }
                })
                .collect()
        };
        format!(
            "{}_{}",
            sanitize(&secret_ref.service),
            sanitize(&secret_ref.account)
        )
    }
}

impl SecretStore for EnvSecretStore {
    fn resolve(&self, secret_ref: &SecretRef) -> Result<String> {
        let name = Self::var_name(secret_ref);
        std::env::var(&name)
            .map_err(|_| Error::notify(format!("secret not found in environment: {}", name)))
    }
}
