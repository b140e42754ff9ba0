//! Webhook error types.

use crate::signature::SignatureError;

/// Error returned by a registered event handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while constructing or running a webhook dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The dispatcher could not be built (no secret resolvable).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The payload failed signature verification.
    ///
    /// Never swallowed: the transport layer always sees this, even when an
    /// error callback is configured.
    #[error("signature verification failed: {0}")]
    Signature(#[from] SignatureError),

    /// The payload carried a valid signature but is not a well-formed event.
    #[error("malformed event payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// A registered handler failed while processing a verified event.
    #[error("handler for {event_type} failed: {source}")]
    Handler {
        /// The event type that was being handled.
        event_type: String,
        /// The handler's error.
        #[source]
        source: HandlerError,
    },
}
