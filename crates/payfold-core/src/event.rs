//! Provider event types.

use serde::{Deserialize, Serialize};

/// A provider-issued event delivered to a webhook endpoint.
///
/// Events are constructed exclusively by the signature-verification step in
/// `payfold-webhook` from a raw request body. The payload under
/// [`EventData::object`] is opaque to the dispatcher; interpreting it is the
/// handler's responsibility.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Event {
    /// Event ID (`evt_...`).
    pub id: String,

    /// Event type, used for handler routing (e.g. `payment_intent.succeeded`).
    #[serde(rename = "type")]
    pub event_type: String,

    /// API version the event was rendered with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Created timestamp (Unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,

    /// Whether the event originated in live mode.
    #[serde(default)]
    pub livemode: bool,

    /// Event data container.
    pub data: EventData,
}

/// Event data container.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventData {
    /// The object the event describes, passed through to handlers untouched.
    pub object: serde_json::Value,
}

impl Event {
    /// The `id` of the object under `data.object`, if present.
    ///
    /// Handlers commonly use this as an idempotency key (e.g. `pi_...`,
    /// `cs_...`).
    #[must_use]
    pub fn object_id(&self) -> Option<&str> {
        self.data.object.get("id").and_then(serde_json::Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_deserializes_wire_shape() {
        let event: Event = serde_json::from_str(
            r#"{
                "id": "evt_1",
                "type": "payment_intent.succeeded",
                "created": 1700000000,
                "data": { "object": { "id": "pi_1", "amount": 1000 } }
            }"#,
        )
        .unwrap();

        assert_eq!(event.id, "evt_1");
        assert_eq!(event.event_type, "payment_intent.succeeded");
        assert_eq!(event.created, Some(1_700_000_000));
        assert!(!event.livemode);
        assert_eq!(event.object_id(), Some("pi_1"));
    }

    #[test]
    fn object_id_absent() {
        let event: Event = serde_json::from_str(
            r#"{"id":"evt_2","type":"ping","data":{"object":{}}}"#,
        )
        .unwrap();

        assert_eq!(event.object_id(), None);
    }
}
