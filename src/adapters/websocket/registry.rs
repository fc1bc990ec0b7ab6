//! Registry of live real-time connections.
//!
//! Every open client connection is held here from handshake to disconnect.
//! The registry is the only owner of connection handles; other components
//! refer to connections by [`ConnectionId`].
//!
//! # Thread Safety
//!
//! The active set sits behind one `RwLock`. Register, remove and
//! broadcast-eviction take the write lock for a single map operation.
//! Broadcast copies the set under the read lock and sends with no lock
//! held, so a slow client never blocks registration and entries can be
//! removed while a broadcast is in flight.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{ClientId, ConnectionId};
use crate::domain::realtime::{OutboundEvent, RealtimeError};
use crate::ports::MessageSink;

/// A live client connection.
///
/// Cheap to clone: clones share the same underlying sink.
#[derive(Clone)]
pub struct Connection {
    id: ConnectionId,
    client_id: ClientId,
    sink: Arc<dyn MessageSink>,
}

impl Connection {
    /// Wraps a sink in a connection with a freshly allocated ID.
    pub fn new(client_id: ClientId, sink: Arc<dyn MessageSink>) -> Self {
        Self {
            id: ConnectionId::next(),
            client_id,
            sink,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    async fn send_text(&self, text: &str) -> Result<(), RealtimeError> {
        self.sink.send_text(text).await
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// Result of a broadcast pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections that accepted the message.
    pub delivered: usize,
    /// Connections whose send failed; already removed from the registry.
    pub evicted: Vec<ConnectionId>,
}

/// The shared set of currently open connections.
///
/// Entries keep the order in which `register` inserted them, regardless of
/// when each [`Connection`] was created.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: RwLock<IndexMap<ConnectionId, Connection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection whose handshake has completed.
    pub async fn register(&self, connection: Connection) {
        let id = connection.id();
        let client_id = connection.client_id().clone();

        let total = {
            let mut connections = self.connections.write().await;
            connections.insert(id, connection);
            connections.len()
        };

        tracing::info!(
            connection_id = %id,
            client_id = %client_id,
            connections = total,
            "Real-time connection registered"
        );
    }

    /// Remove a connection. Removing an absent connection is a no-op.
    ///
    /// Returns whether an entry was removed.
    pub async fn remove(&self, id: ConnectionId) -> bool {
        let (removed, total) = {
            let mut connections = self.connections.write().await;
            let removed = connections.shift_remove(&id).is_some();
            (removed, connections.len())
        };

        if removed {
            tracing::info!(connection_id = %id, connections = total, "Real-time connection removed");
        }
        removed
    }

    /// Send one event to one connection.
    ///
    /// A failed send does not remove the connection; the caller decides.
    pub async fn unicast(
        &self,
        connection: &Connection,
        event: &OutboundEvent,
    ) -> Result<(), RealtimeError> {
        let text = event.encode()?;
        connection.send_text(&text).await
    }

    /// Send one event to every registered connection.
    ///
    /// The event is serialized once. Every connection registered when the
    /// call starts is attempted, in registration order; connections whose
    /// send fails are evicted before this returns.
    pub async fn broadcast(&self, event: &OutboundEvent) -> Result<BroadcastReport, RealtimeError> {
        let text = event.encode()?;
        let snapshot = self.snapshot().await;

        let mut report = BroadcastReport::default();
        for connection in &snapshot {
            match connection.send_text(&text).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::debug!(
                        connection_id = %connection.id(),
                        client_id = %connection.client_id(),
                        "Broadcast send failed, evicting: {}",
                        e
                    );
                    report.evicted.push(connection.id());
                }
            }
        }

        if !report.evicted.is_empty() {
            let mut connections = self.connections.write().await;
            for id in &report.evicted {
                connections.shift_remove(id);
            }
            tracing::info!(
                evicted = report.evicted.len(),
                connections = connections.len(),
                "Evicted stale real-time connections"
            );
        }

        tracing::debug!(
            kind = event.kind(),
            delivered = report.delivered,
            "Broadcast complete"
        );
        Ok(report)
    }

    /// Number of open connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.connections.read().await.contains_key(&id)
    }

    /// Point-in-time copy of the active set, in registration order.
    pub async fn snapshot(&self) -> Vec<Connection> {
        self.connections.read().await.values().cloned().collect()
    }
}
