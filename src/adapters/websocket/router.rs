//! Per-connection event routing.
//!
//! One `EventRouter::run` call drives one connection from registration to
//! removal. Each text frame is decoded and either relayed to every
//! connection (crowd and weather updates) or echoed back to its sender.
//!
//! The loop is transport-agnostic: it consumes a stream of
//! [`InboundFrame`]s, so the WebSocket handler and tests feed it the same
//! way.

use std::sync::Arc;

use futures::{Stream, StreamExt};

use crate::domain::foundation::{StateMachine, Timestamp};
use crate::domain::realtime::{ConnectionState, InboundEvent, OutboundEvent, RealtimeError};

use super::registry::{BroadcastReport, Connection, ConnectionRegistry};

/// A frame received from a client, stripped of transport details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    Text(String),
    /// Binary payload of the given length. Not part of the protocol.
    Binary(usize),
    /// Protocol-level ping or pong.
    Control,
    /// Client asked to close.
    Close,
}

/// What happened to a text frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Relayed to every registered connection.
    Broadcast(BroadcastReport),
    /// Acknowledged to the sender only.
    Echoed,
}

/// Routes inbound frames through the shared connection registry.
#[derive(Clone)]
pub struct EventRouter {
    registry: Arc<ConnectionRegistry>,
}

impl EventRouter {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Handle one text frame received on `connection`.
    ///
    /// Fails with `DecodeFailure` when the frame is not a JSON object, and
    /// with `TransportFailure` when the echo cannot be delivered. Broadcast
    /// send failures are handled by eviction and never returned here.
    pub async fn dispatch(
        &self,
        connection: &Connection,
        frame: &str,
    ) -> Result<Dispatch, RealtimeError> {
        let event = InboundEvent::decode(frame)?;
        let now = Timestamp::now();

        match OutboundEvent::relay(event, now) {
            Some(outbound) => {
                let report = self.registry.broadcast(&outbound).await?;
                Ok(Dispatch::Broadcast(report))
            }
            None => {
                let echo = OutboundEvent::echo(frame, connection.client_id(), now);
                self.registry.unicast(connection, &echo).await?;
                Ok(Dispatch::Echoed)
            }
        }
    }

    /// Drive a connection until it closes.
    ///
    /// Registers the connection, processes frames until the client closes,
    /// the stream ends, or an unrecoverable error occurs, then removes the
    /// connection. Malformed frames are dropped and the loop continues.
    /// Always returns [`ConnectionState::Closed`].
    pub async fn run<S>(&self, connection: Connection, mut frames: S) -> ConnectionState
    where
        S: Stream<Item = Result<InboundFrame, RealtimeError>> + Unpin,
    {
        let id = connection.id();
        let client_id = connection.client_id().clone();

        self.registry.register(connection.clone()).await;
        let mut state = advance(ConnectionState::AwaitingConnect, ConnectionState::Open);

        while state.is_open() {
            let Some(received) = frames.next().await else {
                tracing::debug!(connection_id = %id, client_id = %client_id, "Frame stream ended");
                break;
            };

            let frame = match received {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::debug!(connection_id = %id, client_id = %client_id, "Receive error: {}", e);
                    break;
                }
            };

            match frame {
                InboundFrame::Text(text) => match self.dispatch(&connection, &text).await {
                    Ok(_) => state = advance(state, ConnectionState::Open),
                    Err(e) if e.is_recoverable() => {
                        tracing::warn!(
                            connection_id = %id,
                            client_id = %client_id,
                            "Dropping frame: {}",
                            e
                        );
                    }
                    Err(e) => {
                        tracing::debug!(
                            connection_id = %id,
                            client_id = %client_id,
                            "Closing connection: {}",
                            e
                        );
                        break;
                    }
                },
                InboundFrame::Binary(len) => {
                    tracing::warn!(
                        connection_id = %id,
                        client_id = %client_id,
                        bytes = len,
                        "Received unsupported binary message"
                    );
                }
                InboundFrame::Control => {}
                InboundFrame::Close => {
                    tracing::debug!(connection_id = %id, client_id = %client_id, "Client sent close frame");
                    break;
                }
            }
        }

        self.registry.remove(id).await;
        advance(state, ConnectionState::Closed)
    }
}

fn advance(state: ConnectionState, next: ConnectionState) -> ConnectionState {
    state.transition_to(next).unwrap_or(ConnectionState::Closed)
}
