//! Signal Event Logger
//!
//! One structured record per relay or room event, on the `signal_events`
//! target so it can be filtered or routed on its own. Relayed payloads are
//! opaque and never logged; only their encoded size is recorded.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Tracing target for signal events.
pub const SIGNAL_EVENTS_TARGET: &str = "signal_events";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SignalEvent {
    Connected {
        user_id: String,
        connection_id: String,
        superseded: bool,
    },
    Disconnected {
        user_id: String,
        connection_id: String,
    },
    Relayed {
        kind: &'static str,
        from: String,
        target: String,
        delivered: bool,
        payload_bytes: Option<usize>,
    },
    RoomJoined {
        user_id: String,
        room_id: String,
        members: usize,
    },
    RoomLeft {
        user_id: String,
        room_id: String,
        remaining: usize,
    },
}

#[derive(Debug, Serialize)]
pub struct SignalEventEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: SignalEvent,
}

pub struct SignalEventLogger;

impl SignalEventLogger {
    pub fn log(event: SignalEvent) {
        let entry = SignalEventEntry {
            timestamp: Utc::now(),
            event,
        };
        match serde_json::to_string(&entry) {
            Ok(json) => info!(target: SIGNAL_EVENTS_TARGET, event = %json, "Signal event"),
            Err(_) => info!(target: SIGNAL_EVENTS_TARGET, event = ?entry, "Signal event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_flattens_event_tag() {
        let entry = SignalEventEntry {
            timestamp: Utc::now(),
            event: SignalEvent::Relayed {
                kind: "offer",
                from: "alice".into(),
                target: "bob".into(),
                delivered: false,
                payload_bytes: Some(42),
            },
        };
        let v = serde_json::to_value(&entry).unwrap();
        assert_eq!(v["event"], "relayed");
        assert_eq!(v["kind"], "offer");
        assert_eq!(v["delivered"], false);
        assert_eq!(v["payload_bytes"], 42);
        assert!(v.get("timestamp").is_some());
    }

    #[test]
    fn log_without_subscriber_is_harmless() {
        SignalEventLogger::log(SignalEvent::Disconnected {
            user_id: "alice".into(),
            connection_id: "c1".into(),
        });
    }
}
