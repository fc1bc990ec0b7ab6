//! Errors raised on a single real-time connection.
//!
//! None of these escape the connection they happened on.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RealtimeError {
    /// Send or receive failed on the underlying transport.
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// Inbound frame was not a JSON object.
    #[error("Malformed frame: {0}")]
    DecodeFailure(String),

    /// Outbound event could not be serialized.
    #[error("Failed to encode outbound event: {0}")]
    EncodeFailure(String),
}

impl RealtimeError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportFailure(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::DecodeFailure(message.into())
    }

    /// True when the connection that produced this error can keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RealtimeError::DecodeFailure(_))
    }
}
