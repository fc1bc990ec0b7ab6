//! Message sink port - the write half of a real-time connection.
//!
//! The connection registry only needs to push serialized text to a client.
//! Keeping that behind a trait lets the registry and event router run
//! against the WebSocket adapter in production and in-memory sinks in tests.

use async_trait::async_trait;

use crate::domain::realtime::RealtimeError;

#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Send one text frame.
    ///
    /// Returns `RealtimeError::TransportFailure` when the peer is gone or
    /// the write fails.
    async fn send_text(&self, text: &str) -> Result<(), RealtimeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_sink_is_object_safe_and_send_sync() {
        fn _assert_trait_object(_: &dyn MessageSink) {}
        fn _assert_arc_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_arc_send_sync::<std::sync::Arc<dyn MessageSink>>();
    }
}
