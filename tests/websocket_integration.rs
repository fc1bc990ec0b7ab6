//! End-to-end tests for `/ws/:client_id` over a real socket.
//!
//! The full application is served on an ephemeral port and driven with a
//! `tokio-tungstenite` client, so the upgrade, the shared write half and
//! registry cleanup after close or TCP drop are all exercised.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use smart_tour_gateway::adapters::auth::MockSessionValidator;
use smart_tour_gateway::adapters::http::{build_app, AppState};
use smart_tour_gateway::adapters::websocket::ConnectionRegistry;
use smart_tour_gateway::config::ServerConfig;

const TIMEOUT: Duration = Duration::from_secs(5);

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Serve the app on 127.0.0.1:0 and return its address and registry.
async fn boot_server() -> (SocketAddr, Arc<ConnectionRegistry>) {
    let registry = Arc::new(ConnectionRegistry::new());
    let state = AppState {
        registry: registry.clone(),
        validator: Arc::new(MockSessionValidator::new()),
        provider: None,
    };
    let app = build_app(state, &ServerConfig::default());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, registry)
}

async fn connect(addr: SocketAddr, client_id: &str) -> WsStream {
    let url = format!("ws://{}/ws/{}", addr, client_id);
    let (ws, _) = timeout(TIMEOUT, connect_async(url))
        .await
        .expect("connect timed out")
        .expect("websocket handshake failed");
    ws
}

async fn send_json(ws: &mut WsStream, value: Value) {
    ws.send(Message::text(value.to_string())).await.unwrap();
}

async fn recv_json(ws: &mut WsStream) -> Value {
    loop {
        let msg = timeout(TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for a message")
            .expect("stream ended")
            .expect("websocket error");
        if msg.is_text() {
            return serde_json::from_str(msg.to_text().unwrap()).unwrap();
        }
    }
}

async fn wait_for_count(registry: &ConnectionRegistry, expected: usize) {
    for _ in 0..400 {
        if registry.connection_count().await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!(
        "registry has {} connections, expected {}",
        registry.connection_count().await,
        expected
    );
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn echo_over_real_socket() {
    let (addr, registry) = boot_server().await;
    let mut c1 = connect(addr, "c1").await;
    wait_for_count(&registry, 1).await;

    send_json(&mut c1, json!({"type": "echo-test"})).await;
    let reply = recv_json(&mut c1).await;

    assert_eq!(reply["type"], "echo");
    assert_eq!(reply["client_id"], "c1");
    assert!(reply["message"].as_str().unwrap().contains("echo-test"));
    assert!(reply["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn crowd_update_reaches_both_sockets() {
    let (addr, registry) = boot_server().await;
    let mut c1 = connect(addr, "c1").await;
    let mut c2 = connect(addr, "c2").await;
    wait_for_count(&registry, 2).await;

    send_json(&mut c1, json!({"type": "crowd_update", "data": {"level": 75}})).await;

    for ws in [&mut c1, &mut c2] {
        let msg = recv_json(ws).await;
        assert_eq!(msg["type"], "crowd_update");
        assert_eq!(msg["data"], json!({"level": 75}));
    }
}

#[tokio::test]
async fn close_frame_and_tcp_drop_both_unregister() {
    let (addr, registry) = boot_server().await;
    let mut c1 = connect(addr, "c1").await;
    let c2 = connect(addr, "c2").await;
    wait_for_count(&registry, 2).await;

    c1.close(None).await.unwrap();
    wait_for_count(&registry, 1).await;

    drop(c2);
    wait_for_count(&registry, 0).await;
}

#[tokio::test]
async fn concurrent_broadcasts_are_all_delivered() {
    const CLIENTS: usize = 3;
    const PER_CLIENT: usize = 5;

    let (addr, registry) = boot_server().await;
    let mut sockets = Vec::new();
    for i in 0..CLIENTS {
        sockets.push(connect(addr, &format!("c{}", i)).await);
    }
    wait_for_count(&registry, CLIENTS).await;

    let (mut writers, mut readers): (Vec<SplitSink<WsStream, Message>>, Vec<SplitStream<WsStream>>) =
        sockets.into_iter().map(|ws| ws.split()).unzip();

    let senders: Vec<_> = writers
        .drain(..)
        .enumerate()
        .map(|(i, mut writer)| {
            tokio::spawn(async move {
                for n in 0..PER_CLIENT {
                    let frame = json!({"type": "weather_update", "data": {"from": i, "n": n}});
                    writer.send(Message::text(frame.to_string())).await.unwrap();
                }
                writer
            })
        })
        .collect();

    for reader in readers.iter_mut() {
        let mut received = 0;
        while received < CLIENTS * PER_CLIENT {
            let msg = timeout(TIMEOUT, reader.next())
                .await
                .expect("timed out waiting for broadcasts")
                .expect("stream ended")
                .unwrap();
            if msg.is_text() {
                let value: Value = serde_json::from_str(msg.to_text().unwrap()).unwrap();
                assert_eq!(value["type"], "weather_update");
                received += 1;
            }
        }
    }

    for sender in senders {
        sender.await.unwrap();
    }
    assert_eq!(registry.connection_count().await, CLIENTS);
}

#[tokio::test]
async fn missing_client_id_is_not_upgraded() {
    let (addr, registry) = boot_server().await;

    let result = connect_async(format!("ws://{}/ws/", addr)).await;

    assert!(result.is_err());
    assert_eq!(registry.connection_count().await, 0);
}
