//! Signature-verifying webhook dispatcher.
//!
//! This crate is the core of payfold: it verifies that an inbound payload was
//! genuinely issued by the payments provider, routes the resulting event to a
//! registered handler by event type, isolates handler failures, and returns a
//! uniform acknowledgment.
//!
//! # Example
//!
//! ```no_run
//! use payfold_webhook::{handler_fn, WebhookDispatcher};
//!
//! # async fn example(raw_body: &[u8], signature_header: &str) -> Result<(), payfold_webhook::WebhookError> {
//! let dispatcher = WebhookDispatcher::builder()
//!     .secret("whsec_xxx")
//!     .on(
//!         "payment_intent.succeeded",
//!         handler_fn(|event| async move {
//!             println!("payment {} succeeded", event.object_id().unwrap_or("?"));
//!             Ok(())
//!         }),
//!     )
//!     .on_error(|err, _event| eprintln!("webhook error: {err}"))
//!     .build()?;
//!
//! let ack = dispatcher.dispatch(raw_body, signature_header).await?;
//! assert!(ack.received);
//! # Ok(())
//! # }
//! ```
//!
//! # Delivery semantics
//!
//! The provider delivers events at least once; the dispatcher performs no
//! deduplication. Handlers must be idempotent, typically by recording the
//! event or object ID before acting.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod crypto;
pub mod dispatcher;
pub mod error;
pub mod signature;
pub mod transport;

pub use dispatcher::{
    handler_fn, DispatchAck, DispatcherBuilder, EventHandler, WebhookDispatcher,
    DEFAULT_TOLERANCE,
};
pub use error::{HandlerError, WebhookError};
pub use signature::{construct_event, signature_header, verify_signature, SignatureError};
pub use transport::{
    handle_request, read_body_capped, BodyReadError, InboundRequest, TransportOptions,
    WebhookReply, DEFAULT_MAX_BODY_BYTES, SIGNATURE_HEADER,
};
