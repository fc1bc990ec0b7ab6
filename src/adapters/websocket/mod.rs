//! WebSocket adapters for real-time tourism updates.
//!
//! Connected clients push crowd and weather observations; the gateway
//! relays them to every other open connection.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    ws_handler  (GET /ws/:client_id)                  │
//! │   - Upgrades the socket                                             │
//! │   - Wraps the write half as a MessageSink                           │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ frames
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         EventRouter                                  │
//! │   crowd_update / weather_update ──► broadcast                       │
//! │   anything else                 ──► echo to sender                  │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      ConnectionRegistry                              │
//! │   conn-1 (c1)    conn-2 (c2)    conn-3 (c1)   ...                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`registry`] - Active connection set, unicast and broadcast
//! - [`router`] - Per-connection receive loop and dispatch policy
//! - [`handler`] - Axum WebSocket upgrade handler
//! - [`memory_sink`] - In-memory sinks for tests and embedding

pub mod handler;
pub mod memory_sink;
pub mod registry;
pub mod router;

pub use handler::{websocket_router, ws_handler, WebSocketState, WsSink};
pub use memory_sink::{ChannelSink, FailingSink};
pub use registry::{BroadcastReport, Connection, ConnectionRegistry};
pub use router::{Dispatch, EventRouter, InboundFrame};
