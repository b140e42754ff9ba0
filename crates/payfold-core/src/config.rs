//! Provider configuration.
//!
//! Configuration is an explicit object passed to each client or dispatcher at
//! construction time. There is no process-wide mutable singleton; callers that
//! want "set once at startup, read many times" semantics build one [`Config`]
//! during startup and share it.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com/v1";

/// Default outbound request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Provider configuration.
///
/// The webhook secret is the default for dispatchers constructed from this
/// config; a dispatcher may also be given an explicit per-instance secret.
#[derive(Clone)]
pub struct Config {
    /// Secret API key (`sk_test_...` or `sk_live_...`).
    pub api_key: String,

    /// Webhook signing secret (`whsec_...`), if configured.
    pub webhook_secret: Option<String>,

    /// Pinned API version sent as the `Stripe-Version` header, if set.
    pub api_version: Option<String>,

    /// API base URL (default: [`DEFAULT_API_BASE`]).
    pub api_base: String,

    /// Outbound request timeout in seconds (default: [`DEFAULT_TIMEOUT_SECONDS`]).
    pub timeout_seconds: u64,
}

/// Secrets file structure (`.secrets/payfold.json`).
#[derive(Debug, Deserialize)]
struct SecretsFile {
    api_key: String,
    #[serde(default)]
    webhook_secret: Option<String>,
    #[serde(default)]
    api_version: Option<String>,
}

impl Config {
    /// Create a configuration with an API key and defaults for everything else.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            webhook_secret: None,
            api_version: None,
            api_base: DEFAULT_API_BASE.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    /// Set the webhook signing secret.
    #[must_use]
    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    /// Pin the API version.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Load configuration from environment variables, with a secrets-file
    /// fallback.
    ///
    /// Reads `STRIPE_API_KEY`, `STRIPE_WEBHOOK_SECRET`, `STRIPE_API_VERSION`,
    /// `STRIPE_API_BASE` and `PAYFOLD_TIMEOUT_SECONDS`. When no API key is in
    /// the environment, `.secrets/payfold.json` is probed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] if no API key is resolvable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let (api_key, webhook_secret, api_version) = if let Ok(key) = std::env::var("STRIPE_API_KEY")
        {
            (
                key,
                std::env::var("STRIPE_WEBHOOK_SECRET").ok(),
                std::env::var("STRIPE_API_VERSION").ok(),
            )
        } else if let Some(secrets) = load_secrets() {
            (secrets.api_key, secrets.webhook_secret, secrets.api_version)
        } else {
            return Err(ConfigError::MissingApiKey);
        };

        let api_base = std::env::var("STRIPE_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_BASE.into());

        let timeout_seconds = std::env::var("PAYFOLD_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);

        Ok(Self {
            api_key,
            webhook_secret,
            api_version,
            api_base,
            timeout_seconds,
        })
    }

    /// The configured webhook secret, or an error if none is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingWebhookSecret`] if no secret is configured.
    pub fn require_webhook_secret(&self) -> Result<&str, ConfigError> {
        self.webhook_secret
            .as_deref()
            .ok_or(ConfigError::MissingWebhookSecret)
    }
}

/// Load secrets from the first readable secrets file.
fn load_secrets() -> Option<SecretsFile> {
    let secret_paths = [
        ".secrets/payfold.json",
        "payfold/.secrets/payfold.json",
        "../.secrets/payfold.json",
    ];

    for path in &secret_paths {
        if let Some(secrets) = load_secrets_file(path) {
            tracing::info!(path = %path, "Loaded provider secrets from file");
            return Some(secrets);
        }
    }

    tracing::debug!("Secrets file not found, using environment variables only");
    None
}

fn load_secrets_file(path: &str) -> Option<SecretsFile> {
    let path = Path::new(path);
    if !path.exists() {
        return None;
    }
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

// Secrets must never end up in logs; Debug renders them redacted.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"[redacted]")
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("api_version", &self.api_version)
            .field("api_base", &self.api_base)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = Config::new("sk_test_xxx");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert!(config.webhook_secret.is_none());
        assert!(config.api_version.is_none());
    }

    #[test]
    fn with_api_base_trims_trailing_slash() {
        let config = Config::new("sk_test_xxx").with_api_base("http://localhost:12111/");
        assert_eq!(config.api_base, "http://localhost:12111");
    }

    #[test]
    fn require_webhook_secret_errors_when_unset() {
        let config = Config::new("sk_test_xxx");
        assert!(matches!(
            config.require_webhook_secret(),
            Err(ConfigError::MissingWebhookSecret)
        ));

        let config = config.with_webhook_secret("whsec_xxx");
        assert_eq!(config.require_webhook_secret().unwrap(), "whsec_xxx");
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = Config::new("sk_live_very_secret").with_webhook_secret("whsec_also_secret");
        let rendered = format!("{config:?}");

        assert!(!rendered.contains("sk_live_very_secret"));
        assert!(!rendered.contains("whsec_also_secret"));
        assert!(rendered.contains("[redacted]"));
    }
}
