//! Messenger webhook payload types and traversal.
//!
//! The platform delivers batched events as `entry[].messaging[]`. Every key
//! is optional here: a payload of any shape must be tolerated, so each field
//! is modeled as `Option` and looked up safely instead of assumed present.

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

/// Top-level webhook payload.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    /// Subscription object type, `"page"` for Messenger.
    #[serde(default)]
    pub object: Option<String>,

    /// Batched entries, one per page.
    #[serde(default)]
    pub entry: Option<Vec<Entry>>,
}

/// One batched entry within a webhook payload.
#[derive(Debug, Default, Deserialize)]
pub struct Entry {
    /// ID of the page the entry belongs to.
    #[serde(default)]
    pub id: Option<String>,

    /// Messaging events delivered in this entry.
    #[serde(default)]
    pub messaging: Option<Vec<Value>>,
}

/// Classification of a messaging event, used only to label the log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// An inbound user message.
    Message,
    /// A message sent by the page itself, echoed back.
    Echo,
    /// A postback from a button or quick reply.
    Postback,
    /// Anything else (read receipts, delivery confirmations, ...).
    Other,
}

impl EventKind {
    /// Classify a raw messaging event by probing its keys.
    pub fn of(event: &Value) -> Self {
        if event.get("postback").is_some() {
            return Self::Postback;
        }

        match event.get("message") {
            Some(message) => {
                let is_echo = message
                    .get("is_echo")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                if is_echo {
                    Self::Echo
                } else {
                    Self::Message
                }
            }
            None => Self::Other,
        }
    }

    /// Human-readable label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Echo => "echo",
            Self::Postback => "postback",
            Self::Other => "other",
        }
    }
}

/// Walk `entry[].messaging[]` and log each messaging event.
///
/// Missing `entry` or `messaging` keys are a no-op, not an error. Returns
/// the number of messaging events seen.
pub fn process_payload(payload: &WebhookPayload) -> usize {
    let mut seen = 0;

    let Some(entries) = &payload.entry else {
        return 0;
    };

    for entry in entries {
        let Some(events) = &entry.messaging else {
            continue;
        };

        for event in events {
            seen += 1;
            info!(
                page = entry.id.as_deref().unwrap_or("unknown"),
                kind = EventKind::of(event).as_str(),
                "Message event: {event}"
            );
        }
    }

    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_message_event() {
        let event = json!({"sender": {"id": "u1"}, "message": {"text": "hi"}});
        assert_eq!(EventKind::of(&event), EventKind::Message);
    }

    #[test]
    fn classifies_echo_event() {
        let event = json!({"message": {"text": "hi", "is_echo": true}});
        assert_eq!(EventKind::of(&event), EventKind::Echo);
    }

    #[test]
    fn classifies_postback_event() {
        let event = json!({"postback": {"payload": "GET_STARTED"}});
        assert_eq!(EventKind::of(&event), EventKind::Postback);
    }

    #[test]
    fn classifies_delivery_receipt_as_other() {
        let event = json!({"delivery": {"watermark": 1234}});
        assert_eq!(EventKind::of(&event), EventKind::Other);
    }

    #[test]
    fn traversal_counts_messaging_events() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "object": "page",
            "entry": [
                {"id": "p1", "messaging": [{"sender": {"id": "u1"}}, {"sender": {"id": "u2"}}]},
                {"id": "p2", "messaging": [{"sender": {"id": "u3"}}]},
            ],
        }))
        .unwrap();

        assert_eq!(process_payload(&payload), 3);
    }

    #[test]
    fn traversal_of_empty_payload_is_noop() {
        let payload: WebhookPayload = serde_json::from_value(json!({})).unwrap();
        assert_eq!(process_payload(&payload), 0);
    }

    #[test]
    fn traversal_skips_entries_without_messaging() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "entry": [
                {"id": "p1", "changes": [{"field": "feed"}]},
                {"id": "p2", "messaging": [{"sender": {"id": "u1"}}]},
            ],
        }))
        .unwrap();

        assert_eq!(process_payload(&payload), 1);
    }
}
