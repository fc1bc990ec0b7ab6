//! Integration tests for the real-time relay.
//!
//! Connections are driven through `EventRouter::run` exactly as the
//! WebSocket handler drives them, with in-memory sinks standing in for
//! sockets and `futures` channels standing in for the receive half.

use std::sync::Arc;
use std::time::Duration;

use futures::channel::mpsc as frames;
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use smart_tour_gateway::adapters::websocket::{
    ChannelSink, Connection, ConnectionRegistry, EventRouter, FailingSink, InboundFrame,
};
use smart_tour_gateway::domain::foundation::{ClientId, ConnectionId};
use smart_tour_gateway::domain::realtime::{ConnectionState, RealtimeError};

// =============================================================================
// Test Infrastructure
// =============================================================================

type FrameSender = frames::UnboundedSender<Result<InboundFrame, RealtimeError>>;

/// A connection running on its own task, as in production.
struct Client {
    id: ConnectionId,
    frames: FrameSender,
    inbox: UnboundedReceiver<String>,
    task: JoinHandle<ConnectionState>,
}

impl Client {
    fn connect(router: &EventRouter, client_id: &str) -> Self {
        let (sink, inbox) = ChannelSink::new();
        let connection = Connection::new(ClientId::new(client_id).unwrap(), Arc::new(sink));
        let id = connection.id();
        let (tx, rx) = frames::unbounded();

        let router = router.clone();
        let task = tokio::spawn(async move { router.run(connection, rx).await });

        Self {
            id,
            frames: tx,
            inbox,
            task,
        }
    }

    fn send(&self, text: &str) {
        self.frames
            .unbounded_send(Ok(InboundFrame::Text(text.to_string())))
            .unwrap();
    }

    async fn recv(&mut self) -> Value {
        let raw = tokio::time::timeout(Duration::from_secs(2), self.inbox.recv())
            .await
            .expect("timed out waiting for a message")
            .expect("connection closed");
        serde_json::from_str(&raw).unwrap()
    }

    async fn disconnect(self) -> ConnectionState {
        drop(self.frames);
        self.task.await.unwrap()
    }
}

fn router() -> EventRouter {
    EventRouter::new(Arc::new(ConnectionRegistry::new()))
}

async fn wait_for_count(router: &EventRouter, expected: usize) {
    for _ in 0..200 {
        if router.registry().connection_count().await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("registry never reached {} connections", expected);
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn unknown_type_is_echoed_back_to_c1() {
    let router = router();
    let mut c1 = Client::connect(&router, "c1");
    wait_for_count(&router, 1).await;

    c1.send(r#"{"type":"echo-test"}"#);
    let reply = c1.recv().await;

    assert_eq!(reply["type"], "echo");
    assert_eq!(reply["client_id"], "c1");
    assert!(reply["message"].as_str().unwrap().contains("echo-test"));
    assert!(reply["timestamp"].is_string());

    assert_eq!(c1.disconnect().await, ConnectionState::Closed);
    assert_eq!(router.registry().connection_count().await, 0);
}

#[tokio::test]
async fn crowd_update_reaches_sender_and_peer() {
    let router = router();
    let mut c1 = Client::connect(&router, "c1");
    let mut c2 = Client::connect(&router, "c2");
    wait_for_count(&router, 2).await;

    c1.send(r#"{"type":"crowd_update","data":{"level":75}}"#);

    for client in [&mut c1, &mut c2] {
        let msg = client.recv().await;
        assert_eq!(msg["type"], "crowd_update");
        assert_eq!(msg["data"], json!({"level": 75}));
        assert!(msg["timestamp"].is_string());
    }

    c1.disconnect().await;
    c2.disconnect().await;
    assert_eq!(router.registry().connection_count().await, 0);
}

#[tokio::test]
async fn weather_update_is_broadcast() {
    let router = router();
    let mut c1 = Client::connect(&router, "c1");
    let mut c2 = Client::connect(&router, "c2");
    wait_for_count(&router, 2).await;

    c2.send(r#"{"type":"weather_update","data":{"temp":31,"sky":"clear"}}"#);

    assert_eq!(c1.recv().await["data"]["sky"], "clear");
    assert_eq!(c2.recv().await["type"], "weather_update");

    c1.disconnect().await;
    c2.disconnect().await;
}

#[tokio::test]
async fn echo_goes_to_sender_only() {
    let router = router();
    let mut a = Client::connect(&router, "a");
    let mut b = Client::connect(&router, "b");
    wait_for_count(&router, 2).await;

    a.send(r#"{"type":"ping-ish","data":1}"#);
    assert_eq!(a.recv().await["type"], "echo");

    // A later broadcast must be the first thing b sees.
    a.send(r#"{"type":"crowd_update","data":{"level":1}}"#);
    assert_eq!(b.recv().await["type"], "crowd_update");
    assert_eq!(a.recv().await["type"], "crowd_update");

    a.disconnect().await;
    b.disconnect().await;
}

#[tokio::test]
async fn failing_peer_is_evicted_while_others_receive() {
    let router = router();
    let broken = Connection::new(ClientId::new("broken").unwrap(), Arc::new(FailingSink));
    let broken_id = broken.id();
    router.registry().register(broken).await;

    let mut healthy = Client::connect(&router, "healthy");
    wait_for_count(&router, 2).await;

    healthy.send(r#"{"type":"crowd_update","data":{"level":40}}"#);

    assert_eq!(healthy.recv().await["data"]["level"], 40);
    assert!(!router.registry().contains(broken_id).await);
    assert!(router.registry().contains(healthy.id).await);

    healthy.disconnect().await;
}

#[tokio::test]
async fn malformed_frames_do_not_close_the_connection() {
    let router = router();
    let mut c1 = Client::connect(&router, "c1");
    wait_for_count(&router, 1).await;

    c1.send("definitely not json");
    c1.send("42");
    c1.send(r#"{"type":"still-here"}"#);

    let reply = c1.recv().await;
    assert!(reply["message"].as_str().unwrap().contains("still-here"));
    assert!(router.registry().contains(c1.id).await);

    c1.disconnect().await;
}

#[tokio::test]
async fn disconnect_removes_exactly_that_connection() {
    let router = router();
    let c1 = Client::connect(&router, "c1");
    let c2 = Client::connect(&router, "c2");
    wait_for_count(&router, 2).await;
    let c1_id = c1.id;
    let c2_id = c2.id;

    c1.disconnect().await;

    assert_eq!(router.registry().connection_count().await, 1);
    assert!(router.registry().contains(c2_id).await);
    // The loop already removed c1; a second removal is a no-op
    assert!(!router.registry().remove(c1_id).await);
    assert_eq!(router.registry().connection_count().await, 1);

    c2.disconnect().await;
    assert_eq!(router.registry().connection_count().await, 0);
}
