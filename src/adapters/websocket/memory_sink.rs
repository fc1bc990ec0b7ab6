//! In-memory `MessageSink` implementations.
//!
//! `ChannelSink` behaves like a live client: frames land in an unbounded
//! channel, and sending fails once the receiving half is dropped (the
//! in-memory equivalent of the peer hanging up). `FailingSink` never
//! delivers anything.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::realtime::RealtimeError;
use crate::ports::MessageSink;

/// Sink backed by an unbounded channel.
#[derive(Debug)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    /// Creates a sink and the receiver that observes what it sends.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl MessageSink for ChannelSink {
    async fn send_text(&self, text: &str) -> Result<(), RealtimeError> {
        self.sender
            .send(text.to_string())
            .map_err(|_| RealtimeError::transport("receiver dropped"))
    }
}

/// Sink whose every send fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingSink;

#[async_trait]
impl MessageSink for FailingSink {
    async fn send_text(&self, _text: &str) -> Result<(), RealtimeError> {
        Err(RealtimeError::transport("connection reset by peer"))
    }
}
