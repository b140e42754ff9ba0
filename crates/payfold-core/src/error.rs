//! Configuration error types.

/// Errors raised while resolving payfold configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No API key available from any configured source.
    #[error("missing API key: set STRIPE_API_KEY or provide .secrets/payfold.json")]
    MissingApiKey,

    /// A webhook secret was required but none is configured.
    #[error("missing webhook secret: set STRIPE_WEBHOOK_SECRET or pass one explicitly")]
    MissingWebhookSecret,

    /// A configuration value could not be parsed or read.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
