//! Webhook HTTP adapter integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;
use axum_test::TestServer;
use serde_json::json;

use payfold_http::{webhook_router, WebhookState};
use payfold_webhook::{handler_fn, signature_header, WebhookDispatcher};

const SECRET: &str = "whsec_http_test";
const ROUTE: &str = "/webhooks/stripe";

struct Harness {
    server: TestServer,
    handler_calls: Arc<AtomicUsize>,
    error_calls: Arc<AtomicUsize>,
}

fn harness(max_body_bytes: Option<usize>, failing_handler: bool) -> Harness {
    let handler_calls = Arc::new(AtomicUsize::new(0));
    let error_calls = Arc::new(AtomicUsize::new(0));

    let handler_calls_in = handler_calls.clone();
    let error_calls_in = error_calls.clone();

    let dispatcher = WebhookDispatcher::builder()
        .secret(SECRET)
        .on(
            "payment_intent.succeeded",
            handler_fn(move |_event| {
                let calls = handler_calls_in.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    if failing_handler {
                        Err("downstream unavailable".into())
                    } else {
                        Ok(())
                    }
                }
            }),
        )
        .on_error(move |_err, _event| {
            error_calls_in.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .expect("dispatcher builds");

    let mut state = WebhookState::new(Arc::new(dispatcher));
    if let Some(max) = max_body_bytes {
        state = state.with_max_body_bytes(max);
    }

    let app = Router::new().nest(ROUTE, webhook_router(state));
    let server = TestServer::new(app).expect("test server starts");

    Harness {
        server,
        handler_calls,
        error_calls,
    }
}

fn payload(event_type: &str) -> String {
    format!(r#"{{"id":"evt_1","type":"{event_type}","data":{{"object":{{"id":"pi_1"}}}}}}"#)
}

fn signed(body: &str) -> String {
    signature_header(SECRET, chrono::Utc::now().timestamp(), body.as_bytes())
}

#[tokio::test]
async fn valid_delivery_returns_200_with_ack() {
    let harness = harness(None, false);
    let body = payload("payment_intent.succeeded");

    let response = harness
        .server
        .post(ROUTE)
        .add_header("stripe-signature", signed(&body))
        .text(body)
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({ "received": true, "type": "payment_intent.succeeded" })
    );
    assert_eq!(harness.handler_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_signature_header_returns_400_before_verification() {
    let harness = harness(None, false);

    let response = harness
        .server
        .post(ROUTE)
        .text(payload("payment_intent.succeeded"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({ "error": "Missing stripe-signature header" })
    );

    // The dispatcher was never invoked: no handler ran and no verification
    // failure reached the error callback.
    assert_eq!(harness.handler_calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.error_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn oversized_body_returns_413_before_verification() {
    let harness = harness(Some(256), false);
    let body = "x".repeat(1024);

    let response = harness
        .server
        .post(ROUTE)
        .add_header("stripe-signature", signed(&body))
        .text(body)
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({ "error": "Webhook body too large" })
    );
    assert_eq!(harness.handler_calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.error_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn forged_signature_returns_400() {
    let harness = harness(None, false);

    let response = harness
        .server
        .post(ROUTE)
        .add_header("stripe-signature", "t=1700000000,v1=forged")
        .text(payload("payment_intent.succeeded"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body = response.json::<serde_json::Value>();
    assert!(body["error"].as_str().unwrap().contains("signature"));

    assert_eq!(harness.handler_calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.error_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn handler_failure_still_acks_when_error_callback_is_set() {
    let harness = harness(None, true);
    let body = payload("payment_intent.succeeded");

    let response = harness
        .server
        .post(ROUTE)
        .add_header("stripe-signature", signed(&body))
        .text(body)
        .await;

    // The event was validly received; only its processing failed.
    response.assert_status_ok();
    assert_eq!(harness.handler_calls.load(Ordering::SeqCst), 1);
    assert_eq!(harness.error_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn non_post_methods_are_rejected() {
    let harness = harness(None, false);

    let response = harness.server.get(ROUTE).await;
    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);

    let response = harness.server.delete(ROUTE).await;
    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);

    assert_eq!(harness.handler_calls.load(Ordering::SeqCst), 0);
}
