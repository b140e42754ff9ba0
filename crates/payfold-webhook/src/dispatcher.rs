//! Event routing and handler isolation.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use payfold_core::{Config, Event};

use crate::error::{HandlerError, WebhookError};
use crate::signature;

/// Default timestamp tolerance for signature verification (the provider's
/// documented replay window).
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(300);

/// A handler invoked when an event's type matches its registered key.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process a verified event.
    async fn handle(&self, event: &Event) -> Result<(), HandlerError>;
}

struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> EventHandler for FnHandler<F>
where
    F: Fn(Event) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), HandlerError>> + Send,
{
    async fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        (self.0)(event.clone()).await
    }
}

/// Wrap an async closure as an [`EventHandler`].
///
/// ```
/// use payfold_webhook::handler_fn;
///
/// let handler = handler_fn(|event| async move {
///     tracing::info!(event_id = %event.id, "handled");
///     Ok(())
/// });
/// # let _ = handler;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> impl EventHandler
where
    F: Fn(Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    FnHandler(f)
}

type ErrorCallback = Arc<dyn Fn(&WebhookError, Option<&Event>) + Send + Sync>;
type UnhandledCallback = Arc<dyn Fn(&Event) + Send + Sync>;

/// Acknowledgment returned to the transport layer after a dispatch that did
/// not propagate an error.
///
/// Serializes to `{"received":true,"type":"<event type>"}`.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchAck {
    /// Whether the event was received (always `true` on the success path).
    pub received: bool,
    /// The type of the event that was dispatched.
    #[serde(rename = "type")]
    pub event_type: String,
}

/// Verifies, routes, and reports the outcome of one inbound event delivery.
///
/// Configuration (secret, registry, callbacks) is fixed at construction and
/// never mutated, so a dispatcher is safe to share across concurrent
/// dispatches.
pub struct WebhookDispatcher {
    secret: String,
    tolerance: Option<Duration>,
    handlers: HashMap<String, Arc<dyn EventHandler>>,
    on_error: Option<ErrorCallback>,
    on_unhandled: Option<UnhandledCallback>,
}

impl WebhookDispatcher {
    /// Start building a dispatcher.
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Verify a raw delivery and route the resulting event.
    ///
    /// Verification failures (and payloads that fail to parse after a valid
    /// signature) are never swallowed: the error callback, if any, observes
    /// them as a side channel and the error is still returned. A handler
    /// failure is swallowed only when an error callback is configured: the
    /// event was validly received and only its processing failed, so reporting
    /// success upstream prevents provider retry storms.
    ///
    /// The provider delivers at least once; this method performs no
    /// deduplication. Handlers are responsible for idempotency.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Signature`] or [`WebhookError::Payload`] for
    /// untrusted input, and [`WebhookError::Handler`] when a handler fails and
    /// no error callback is configured.
    pub async fn dispatch(
        &self,
        payload: impl AsRef<[u8]>,
        signature_header: &str,
    ) -> Result<DispatchAck, WebhookError> {
        let payload = payload.as_ref();

        let event = match signature::construct_event(
            payload,
            signature_header,
            &self.secret,
            self.tolerance,
        ) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(error = %err, "Webhook verification failed");
                if let Some(on_error) = &self.on_error {
                    on_error(&err, None);
                }
                return Err(err);
            }
        };

        tracing::info!(
            event_type = %event.event_type,
            event_id = %event.id,
            "Received webhook event"
        );

        if let Some(handler) = self.handlers.get(&event.event_type) {
            if let Err(source) = handler.handle(&event).await {
                let err = WebhookError::Handler {
                    event_type: event.event_type.clone(),
                    source,
                };
                match &self.on_error {
                    Some(on_error) => {
                        tracing::warn!(error = %err, "Handler failed, reported via error callback");
                        on_error(&err, Some(&event));
                    }
                    None => return Err(err),
                }
            }
        } else if let Some(on_unhandled) = &self.on_unhandled {
            on_unhandled(&event);
        } else {
            tracing::debug!(event_type = %event.event_type, "Unhandled event");
        }

        Ok(DispatchAck {
            received: true,
            event_type: event.event_type,
        })
    }

    /// Event types with a registered handler.
    pub fn handled_types(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

/// Builder for [`WebhookDispatcher`].
///
/// Construction is synchronous and performs no I/O; it only resolves the
/// secret and closes over the registry and callbacks.
#[derive(Default)]
pub struct DispatcherBuilder {
    secret: Option<String>,
    tolerance: Option<Option<Duration>>,
    handlers: HashMap<String, Arc<dyn EventHandler>>,
    on_error: Option<ErrorCallback>,
    on_unhandled: Option<UnhandledCallback>,
}

impl DispatcherBuilder {
    /// Set an explicit per-instance webhook secret.
    #[must_use]
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Fall back to the webhook secret from a [`Config`].
    ///
    /// An explicit [`secret`](Self::secret) takes precedence.
    #[must_use]
    pub fn config(mut self, config: &Config) -> Self {
        if self.secret.is_none() {
            self.secret.clone_from(&config.webhook_secret);
        }
        self
    }

    /// Override the timestamp tolerance (default: [`DEFAULT_TOLERANCE`]).
    #[must_use]
    pub fn tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = Some(Some(tolerance));
        self
    }

    /// Disable the timestamp check entirely.
    ///
    /// Useful when replaying stored deliveries, e.g. in tests.
    #[must_use]
    pub fn no_tolerance(mut self) -> Self {
        self.tolerance = Some(None);
        self
    }

    /// Register a handler for an event type.
    ///
    /// At most one handler per type; registering the same type again replaces
    /// the previous handler.
    #[must_use]
    pub fn on(mut self, event_type: impl Into<String>, handler: impl EventHandler + 'static) -> Self {
        self.handlers.insert(event_type.into(), Arc::new(handler));
        self
    }

    /// Observe dispatch errors.
    ///
    /// For verification failures the event argument is `None` (no event exists
    /// yet) and the error still propagates to the caller. For handler failures
    /// the callback receives the event, and dispatch reports success upstream.
    #[must_use]
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&WebhookError, Option<&Event>) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(callback));
        self
    }

    /// Observe events whose type has no registered handler.
    #[must_use]
    pub fn on_unhandled<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.on_unhandled = Some(Arc::new(callback));
        self
    }

    /// Build the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Configuration`] when no secret was provided
    /// either explicitly or via [`config`](Self::config).
    pub fn build(self) -> Result<WebhookDispatcher, WebhookError> {
        let secret = self.secret.ok_or_else(|| {
            WebhookError::Configuration("no webhook secret configured".into())
        })?;

        Ok(WebhookDispatcher {
            secret,
            tolerance: self.tolerance.unwrap_or(Some(DEFAULT_TOLERANCE)),
            handlers: self.handlers,
            on_error: self.on_error,
            on_unhandled: self.on_unhandled,
        })
    }
}
