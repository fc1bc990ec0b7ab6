//! WebSocket upgrade handler for real-time tourism updates.
//!
//! Handles the HTTP → WebSocket upgrade and hands the connection to the
//! event router:
//! 1. Validate the client identifier from the path
//! 2. Upgrade to WebSocket
//! 3. Wrap the write half as a `MessageSink`
//! 4. Feed received frames to `EventRouter::run` until disconnect

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::Mutex;

use crate::domain::foundation::ClientId;
use crate::domain::realtime::RealtimeError;
use crate::ports::MessageSink;

use super::registry::{Connection, ConnectionRegistry};
use super::router::{EventRouter, InboundFrame};

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub router: EventRouter,
}

impl WebSocketState {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            router: EventRouter::new(registry),
        }
    }
}

/// Write half of an upgraded socket.
///
/// Broadcasts from other connections' tasks and the echo from this
/// connection's own task may write concurrently, so the sink is locked.
pub struct WsSink {
    sender: Mutex<SplitSink<WebSocket, Message>>,
}

impl WsSink {
    pub fn new(sender: SplitSink<WebSocket, Message>) -> Self {
        Self {
            sender: Mutex::new(sender),
        }
    }
}

#[async_trait]
impl MessageSink for WsSink {
    async fn send_text(&self, text: &str) -> Result<(), RealtimeError> {
        self.sender
            .lock()
            .await
            .send(Message::Text(text.to_string()))
            .await
            .map_err(|e| RealtimeError::transport(e.to_string()))
    }
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /ws/:client_id`
///
/// The client identifier is caller-supplied and not authenticated; several
/// connections may share one.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(client_id): Path<String>,
    State(state): State<WebSocketState>,
) -> Response {
    let client_id = match ClientId::new(client_id) {
        Ok(id) => id,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(socket, client_id, state))
}

async fn handle_socket(socket: WebSocket, client_id: ClientId, state: WebSocketState) {
    let (sender, receiver) = socket.split();
    let connection = Connection::new(client_id, Arc::new(WsSink::new(sender)));

    let frames = receiver.map(|received| {
        received
            .map(inbound_frame)
            .map_err(|e| RealtimeError::transport(e.to_string()))
    });

    state.router.run(connection, frames).await;
}

fn inbound_frame(message: Message) -> InboundFrame {
    match message {
        Message::Text(text) => InboundFrame::Text(text),
        Message::Binary(bytes) => InboundFrame::Binary(bytes.len()),
        // Protocol ping/pong is answered by axum
        Message::Ping(_) | Message::Pong(_) => InboundFrame::Control,
        Message::Close(_) => InboundFrame::Close,
    }
}

/// Create axum router for the WebSocket endpoint.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .merge(websocket_router().with_state(ws_state));
/// ```
pub fn websocket_router() -> axum::Router<WebSocketState> {
    use axum::routing::get;

    axum::Router::new().route("/ws/:client_id", get(ws_handler))
}
