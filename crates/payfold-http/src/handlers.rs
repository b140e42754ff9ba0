//! Webhook request handlers.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use payfold_webhook::{
    read_body_capped, DispatchAck, WebhookDispatcher, DEFAULT_MAX_BODY_BYTES, SIGNATURE_HEADER,
};

use crate::error::HttpError;

/// Shared state for the webhook route.
#[derive(Clone)]
pub struct WebhookState {
    /// The dispatcher handling verified deliveries.
    pub dispatcher: Arc<WebhookDispatcher>,

    /// Maximum accepted body size in bytes.
    pub max_body_bytes: usize,
}

impl WebhookState {
    /// Create state with the default body size cap (1 MiB).
    #[must_use]
    pub fn new(dispatcher: Arc<WebhookDispatcher>) -> Self {
        Self {
            dispatcher,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Override the body size cap.
    #[must_use]
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Handle an inbound webhook delivery.
///
/// Reads the signature header, streams the body through an incremental size
/// cap (oversized deliveries are rejected mid-stream with 413, before
/// verification), and delegates to the dispatcher. Success returns 200 with
/// the acknowledgment as the JSON body.
///
/// # Errors
///
/// Returns an [`HttpError`] mapping to 400 (missing header, unreadable body,
/// dispatch failure) or 413 (oversized body).
pub async fn receive_webhook(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<DispatchAck>, HttpError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned)
        .ok_or(HttpError::MissingSignatureHeader)?;

    let payload = read_body_capped(body.into_data_stream(), state.max_body_bytes).await?;

    let ack = state.dispatcher.dispatch(payload, &signature).await?;
    Ok(Json(ack))
}
