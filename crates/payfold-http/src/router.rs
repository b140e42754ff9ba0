//! Router configuration.

use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{receive_webhook, WebhookState};

/// Create a webhook router.
///
/// Exposes `POST /`; nest it wherever the endpoint should live
/// (e.g. `/webhooks/stripe`). Other methods receive 405 from the method
/// router without touching the dispatcher. Body size enforcement happens
/// inside the handler, incrementally, so oversized deliveries are cut off
/// mid-stream with 413.
pub fn webhook_router(state: WebhookState) -> Router {
    Router::new()
        .route("/", post(receive_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
