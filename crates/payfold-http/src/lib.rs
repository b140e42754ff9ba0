//! Batteries-included axum bindings for the payfold webhook dispatcher.
//!
//! [`webhook_router`] produces a ready-to-nest [`axum::Router`] exposing a
//! single `POST` route that reads the signature header, streams the body
//! through an incremental size cap, and delegates to the dispatcher:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use payfold_http::{webhook_router, WebhookState};
//! use payfold_webhook::{handler_fn, WebhookDispatcher};
//!
//! # fn example() -> Result<(), payfold_webhook::WebhookError> {
//! let dispatcher = Arc::new(
//!     WebhookDispatcher::builder()
//!         .secret("whsec_xxx")
//!         .on("payment_intent.succeeded", handler_fn(|_event| async move { Ok(()) }))
//!         .build()?,
//! );
//!
//! let app = axum::Router::new()
//!     .nest("/webhooks/stripe", webhook_router(WebhookState::new(dispatcher)));
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod handlers;
pub mod router;

pub use error::HttpError;
pub use handlers::{receive_webhook, WebhookState};
pub use router::webhook_router;
