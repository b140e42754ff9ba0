//! Signature header parsing and verification.
//!
//! The provider signs each delivery with HMAC-SHA256 over
//! `"{timestamp}.{payload}"` and sends the result in a header of the form
//! `t=<unix>,v1=<hex>[,v1=<hex>...]`. Multiple `v1` entries appear during
//! secret rotation; any single match accepts. Unknown keys are ignored.

use std::time::Duration;

use payfold_core::Event;

use crate::crypto::{constant_time_eq, hmac_sha256_hex};
use crate::error::WebhookError;

/// Signature verification failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// The header has no `t=` element.
    #[error("signature header missing timestamp")]
    MissingTimestamp,

    /// The header has no `v1=` element.
    #[error("signature header missing v1 signature")]
    MissingSignature,

    /// The `t=` element is not a Unix timestamp.
    #[error("signature header timestamp is not an integer")]
    InvalidTimestamp,

    /// The timestamp is too far from the current time.
    #[error("signature timestamp outside tolerance: age {age_seconds}s, tolerance {tolerance_seconds}s")]
    TimestampOutOfTolerance {
        /// Absolute difference between now and the signed timestamp.
        age_seconds: i64,
        /// The configured tolerance.
        tolerance_seconds: i64,
    },

    /// No `v1` entry matches the expected digest.
    #[error("signature mismatch")]
    Mismatch,
}

/// Verify a signature header against a raw payload.
///
/// Pure and synchronous: a CPU-only HMAC comparison, no I/O. When `tolerance`
/// is `Some`, deliveries whose signed timestamp differs from the current time
/// by more than the tolerance are rejected, bounding the replay window.
///
/// # Errors
///
/// Returns a [`SignatureError`] describing the first check that failed.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance: Option<Duration>,
) -> Result<(), SignatureError> {
    let mut timestamp: Option<&str> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in header.split(',') {
        let mut kv = part.splitn(2, '=');
        match (kv.next(), kv.next()) {
            (Some("t"), Some(ts)) => timestamp = Some(ts),
            (Some("v1"), Some(sig)) => signatures.push(sig),
            _ => {}
        }
    }

    let timestamp: i64 = timestamp
        .ok_or(SignatureError::MissingTimestamp)?
        .trim()
        .parse()
        .map_err(|_| SignatureError::InvalidTimestamp)?;

    if signatures.is_empty() {
        return Err(SignatureError::MissingSignature);
    }

    if let Some(tolerance) = tolerance {
        let tolerance_seconds = i64::try_from(tolerance.as_secs()).unwrap_or(i64::MAX);
        let age_seconds = (chrono::Utc::now().timestamp() - timestamp).abs();
        if age_seconds > tolerance_seconds {
            return Err(SignatureError::TimestampOutOfTolerance {
                age_seconds,
                tolerance_seconds,
            });
        }
    }

    let expected = hmac_sha256_hex(secret, &signed_payload(timestamp, payload));

    if signatures.iter().any(|sig| constant_time_eq(&expected, sig)) {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Verify a payload and parse it into an [`Event`].
///
/// This is the only way events enter the system: application code never
/// constructs them. A payload that carries a valid signature but is not a
/// well-formed event yields [`WebhookError::Payload`].
///
/// # Errors
///
/// Returns [`WebhookError::Signature`] or [`WebhookError::Payload`].
pub fn construct_event(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance: Option<Duration>,
) -> Result<Event, WebhookError> {
    verify_signature(payload, header, secret, tolerance)?;
    let event: Event = serde_json::from_slice(payload)?;
    Ok(event)
}

/// Produce a valid signature header for a payload.
///
/// Intended for test fixtures: feed the result to
/// [`WebhookDispatcher::dispatch`](crate::WebhookDispatcher::dispatch) to
/// simulate a provider delivery without provider involvement.
#[must_use]
pub fn signature_header(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let digest = hmac_sha256_hex(secret, &signed_payload(timestamp, payload));
    format!("t={timestamp},v1={digest}")
}

fn signed_payload(timestamp: i64, payload: &[u8]) -> Vec<u8> {
    let prefix = format!("{timestamp}.");
    let mut signed = Vec::with_capacity(prefix.len() + payload.len());
    signed.extend_from_slice(prefix.as_bytes());
    signed.extend_from_slice(payload);
    signed
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";
    const PAYLOAD: &[u8] = br#"{"id":"evt_1","type":"ping","data":{"object":{}}}"#;

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    #[test]
    fn signature_header_round_trips() {
        let header = signature_header(SECRET, now(), PAYLOAD);
        verify_signature(PAYLOAD, &header, SECRET, Some(Duration::from_secs(300))).unwrap();
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let header = signature_header(SECRET, now(), PAYLOAD);
        let result = verify_signature(PAYLOAD, &header, "whsec_other", None);
        assert_eq!(result, Err(SignatureError::Mismatch));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let header = signature_header(SECRET, now(), PAYLOAD);
        let result = verify_signature(b"{\"tampered\":true}", &header, SECRET, None);
        assert_eq!(result, Err(SignatureError::Mismatch));
    }

    #[test]
    fn missing_timestamp() {
        let digest = crate::crypto::hmac_sha256_hex(SECRET, PAYLOAD);
        let result = verify_signature(PAYLOAD, &format!("v1={digest}"), SECRET, None);
        assert_eq!(result, Err(SignatureError::MissingTimestamp));
    }

    #[test]
    fn missing_v1_entry() {
        let result = verify_signature(PAYLOAD, "t=1700000000", SECRET, None);
        assert_eq!(result, Err(SignatureError::MissingSignature));
    }

    #[test]
    fn non_numeric_timestamp() {
        let result = verify_signature(PAYLOAD, "t=yesterday,v1=abc", SECRET, None);
        assert_eq!(result, Err(SignatureError::InvalidTimestamp));
    }

    #[test]
    fn garbage_header() {
        let result = verify_signature(PAYLOAD, "not a signature header", SECRET, None);
        assert_eq!(result, Err(SignatureError::MissingTimestamp));
    }

    #[test]
    fn stale_timestamp_rejected_within_tolerance_window() {
        let stale = now() - 3600;
        let header = signature_header(SECRET, stale, PAYLOAD);

        let result = verify_signature(PAYLOAD, &header, SECRET, Some(Duration::from_secs(300)));
        assert!(matches!(
            result,
            Err(SignatureError::TimestampOutOfTolerance { .. })
        ));
    }

    #[test]
    fn stale_timestamp_accepted_without_tolerance() {
        let stale = now() - 3600;
        let header = signature_header(SECRET, stale, PAYLOAD);

        verify_signature(PAYLOAD, &header, SECRET, None).unwrap();
    }

    #[test]
    fn any_matching_v1_accepts() {
        let ts = now();
        let valid = signature_header(SECRET, ts, PAYLOAD);
        let digest = valid.split("v1=").nth(1).unwrap();

        // Rotated-secret shape: stale signature first, current one second.
        let header = format!("t={ts},v1=deadbeef,v1={digest}");
        verify_signature(PAYLOAD, &header, SECRET, None).unwrap();
    }

    #[test]
    fn unknown_keys_ignored() {
        let ts = now();
        let valid = signature_header(SECRET, ts, PAYLOAD);
        let digest = valid.split("v1=").nth(1).unwrap();

        let header = format!("t={ts},v0=legacy,v1={digest}");
        verify_signature(PAYLOAD, &header, SECRET, None).unwrap();
    }

    #[test]
    fn construct_event_parses_verified_payload() {
        let header = signature_header(SECRET, now(), PAYLOAD);
        let event = construct_event(PAYLOAD, &header, SECRET, None).unwrap();
        assert_eq!(event.id, "evt_1");
        assert_eq!(event.event_type, "ping");
    }

    #[test]
    fn construct_event_rejects_malformed_payload() {
        let payload = b"not json";
        let header = signature_header(SECRET, now(), payload);
        let result = construct_event(payload, &header, SECRET, None);
        assert!(matches!(result, Err(WebhookError::Payload(_))));
    }
}
