//! Client error types.

/// Errors that can occur when calling the provider API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider API returned an error.
    #[error("API error: {error_type} - {message}")]
    Api {
        /// Error type reported by the provider.
        error_type: String,
        /// Error message.
        message: String,
        /// Error code, when present.
        code: Option<String>,
        /// HTTP status code.
        status: u16,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}
