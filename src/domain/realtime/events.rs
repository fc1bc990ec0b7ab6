//! Real-time event envelopes.
//!
//! Defines the protocol between the gateway and connected clients:
//! - Client → Server: `{"type": ..., "data": ...}` text frames
//! - Server → Client: `{"type": ..., "data"|"message": ..., "timestamp": ...}`

use serde::Serialize;
use serde_json::Value;

use crate::domain::foundation::{ClientId, Timestamp};

use super::RealtimeError;

// ============================================
// Client → Server
// ============================================

/// Declared type of an inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    CrowdUpdate,
    WeatherUpdate,
    /// Unknown type, non-string type, or no type at all.
    Other,
}

impl EventKind {
    fn from_type_field(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("crowd_update") => EventKind::CrowdUpdate,
            Some("weather_update") => EventKind::WeatherUpdate,
            _ => EventKind::Other,
        }
    }
}

/// A decoded inbound frame. Consumed once, never retained.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub kind: EventKind,
    /// Contents of the `data` field, `Null` when absent.
    pub payload: Value,
}

impl InboundEvent {
    /// Decode a text frame.
    ///
    /// Anything that parses as a JSON object is accepted; the `type` field
    /// only selects the kind. Non-JSON text and non-object JSON fail with
    /// [`RealtimeError::DecodeFailure`].
    pub fn decode(frame: &str) -> Result<Self, RealtimeError> {
        let value: Value =
            serde_json::from_str(frame).map_err(|e| RealtimeError::decode(e.to_string()))?;

        let Value::Object(mut fields) = value else {
            return Err(RealtimeError::decode("frame is not a JSON object"));
        };

        Ok(Self {
            kind: EventKind::from_type_field(fields.get("type")),
            payload: fields.remove("data").unwrap_or(Value::Null),
        })
    }
}

// ============================================
// Server → Client
// ============================================

/// All message types the gateway sends to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEvent {
    /// Crowd level change relayed to every connection.
    CrowdUpdate { data: Value, timestamp: String },

    /// Weather change relayed to every connection.
    WeatherUpdate { data: Value, timestamp: String },

    /// Acknowledgement of an unrecognised frame, sent to its sender only.
    Echo {
        message: String,
        client_id: String,
        timestamp: String,
    },
}

impl OutboundEvent {
    /// Build the broadcast counterpart of an inbound event.
    ///
    /// Returns `None` for kinds that are not relayed.
    pub fn relay(event: InboundEvent, at: Timestamp) -> Option<Self> {
        let timestamp = at.to_rfc3339();
        match event.kind {
            EventKind::CrowdUpdate => Some(OutboundEvent::CrowdUpdate {
                data: event.payload,
                timestamp,
            }),
            EventKind::WeatherUpdate => Some(OutboundEvent::WeatherUpdate {
                data: event.payload,
                timestamp,
            }),
            EventKind::Other => None,
        }
    }

    /// Build the echo reply for a raw frame.
    pub fn echo(raw_frame: &str, client_id: &ClientId, at: Timestamp) -> Self {
        OutboundEvent::Echo {
            message: format!("Message received: {}", raw_frame),
            client_id: client_id.to_string(),
            timestamp: at.to_rfc3339(),
        }
    }

    /// Wire name of this event.
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundEvent::CrowdUpdate { .. } => "crowd_update",
            OutboundEvent::WeatherUpdate { .. } => "weather_update",
            OutboundEvent::Echo { .. } => "echo",
        }
    }

    /// Serialize to the JSON text sent on the wire.
    pub fn encode(&self) -> Result<String, RealtimeError> {
        serde_json::to_string(self).map_err(|e| RealtimeError::EncodeFailure(e.to_string()))
    }
}
