//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use payfold_webhook::{BodyReadError, WebhookError};

/// Errors surfaced by the webhook HTTP adapter.
///
/// Transport failures are detected before the dispatcher runs; dispatch
/// failures (signature, payload, or unswallowed handler errors) all map to a
/// client error, since the provider treats any non-2xx as "retry later".
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The signature header is absent.
    #[error("Missing stripe-signature header")]
    MissingSignatureHeader,

    /// The body exceeded the configured size cap.
    #[error("Webhook body too large")]
    BodyTooLarge,

    /// The body stream failed before completion.
    #[error("failed to read webhook body: {0}")]
    BodyRead(String),

    /// The dispatcher returned an error.
    #[error(transparent)]
    Dispatch(#[from] WebhookError),
}

impl From<BodyReadError> for HttpError {
    fn from(err: BodyReadError) -> Self {
        match err {
            BodyReadError::TooLarge { .. } => Self::BodyTooLarge,
            BodyReadError::Read(msg) => Self::BodyRead(msg),
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::BodyRead(msg) => {
                tracing::warn!(error = %msg, "Webhook body read failed");
                StatusCode::BAD_REQUEST
            }
            Self::MissingSignatureHeader | Self::Dispatch(_) => StatusCode::BAD_REQUEST,
        };

        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
