//! Framework-agnostic transport adapter.
//!
//! HTTP frameworks differ in how they expose requests; the dispatcher only
//! needs a method, a header, and a body. [`InboundRequest`] is that narrow
//! interface, and [`handle_request`] maps a request through the dispatcher to
//! a status code and fixed JSON body. The axum bindings in `payfold-http`
//! build on the same mapping.

use futures::{pin_mut, Stream, StreamExt};

use crate::dispatcher::WebhookDispatcher;

/// Header carrying the provider's signature.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Default maximum accepted body size (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Transport-level options.
#[derive(Debug, Clone, Copy)]
pub struct TransportOptions {
    /// Maximum accepted body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// The minimal request shape the webhook transport needs.
///
/// Implementations must perform case-insensitive header lookup, per HTTP.
pub trait InboundRequest {
    /// The request method (e.g. `"POST"`).
    fn method(&self) -> &str;

    /// A header value by name, if present.
    fn header(&self, name: &str) -> Option<&str>;

    /// The buffered request body.
    fn body(&self) -> &[u8];
}

/// A transport-level reply: status code plus a JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookReply {
    /// HTTP status code.
    pub status: u16,

    /// JSON body.
    pub body: String,
}

impl WebhookReply {
    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: serde_json::json!({ "error": message }).to_string(),
        }
    }
}

/// Map a buffered inbound request through the dispatcher.
///
/// Transport-level failures (wrong method, missing header, oversized body)
/// short-circuit before verification is attempted. Dispatch failures map to
/// 400; success maps to 200 with the acknowledgment as the body.
pub async fn handle_request<R>(
    dispatcher: &WebhookDispatcher,
    request: &R,
    options: TransportOptions,
) -> WebhookReply
where
    R: InboundRequest + Sync,
{
    if !request.method().eq_ignore_ascii_case("POST") {
        return WebhookReply::error(405, "Method not allowed");
    }

    let Some(signature) = request.header(SIGNATURE_HEADER) else {
        return WebhookReply::error(400, &format!("Missing {SIGNATURE_HEADER} header"));
    };
    let signature = signature.to_owned();

    let body = request.body();
    if body.len() > options.max_body_bytes {
        return WebhookReply::error(413, "Webhook body too large");
    }

    match dispatcher.dispatch(body, &signature).await {
        Ok(ack) => WebhookReply {
            status: 200,
            body: serde_json::to_string(&ack)
                .unwrap_or_else(|_| r#"{"received":true}"#.to_string()),
        },
        Err(err) => WebhookReply::error(400, &err.to_string()),
    }
}

/// Body reading failures.
#[derive(Debug, thiserror::Error)]
pub enum BodyReadError {
    /// The running total exceeded the configured cap.
    #[error("webhook body exceeds {limit} bytes")]
    TooLarge {
        /// The configured cap.
        limit: usize,
    },

    /// The underlying stream failed.
    #[error("failed to read webhook body: {0}")]
    Read(String),
}

/// Buffer a chunked body stream, rejecting as soon as the running total would
/// exceed `cap`.
///
/// The rejection happens mid-stream: the chunk that crosses the cap is not
/// buffered and the remainder of the stream is not consumed, so a misbehaving
/// sender cannot force unbounded memory growth.
///
/// # Errors
///
/// Returns [`BodyReadError::TooLarge`] on cap violation, or
/// [`BodyReadError::Read`] if the stream yields an error.
pub async fn read_body_capped<S, B, E>(stream: S, cap: usize) -> Result<Vec<u8>, BodyReadError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    pin_mut!(stream);

    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|err| BodyReadError::Read(err.to_string()))?;
        let chunk = chunk.as_ref();

        if buf.len() + chunk.len() > cap {
            return Err(BodyReadError::TooLarge { limit: cap });
        }
        buf.extend_from_slice(chunk);
    }

    Ok(buf)
}
