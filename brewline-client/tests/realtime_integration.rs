// brewline-client/tests/realtime_integration.rs
// Realtime order feed against an in-process WebSocket server

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::get;
use brewline_client::{OrderEvent, RealtimeClient, RealtimeConfig};
use serde_json::json;
use shared::reconcile::{EventOutcome, VersionedStore, apply_event};
use tokio::net::TcpListener;
use tokio::time::timeout;

#[derive(Default)]
struct WsState {
    /// Authorization headers of accepted upgrades
    auth: Mutex<Vec<Option<String>>>,
}

fn order_json(id: &str, branch: &str, version: u64, name: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "customerName": name,
        "items": [],
        "branchId": branch,
        "version": version,
        "createdAt": "2024-05-01T09:00:00Z"
    })
}

fn frames() -> Vec<String> {
    vec![
        json!({"event": "order:created", "data": order_json("o1", "b1", 1, "Ana"), "branchId": "b1"}).to_string(),
        json!({"event": "order:updated", "data": order_json("o2", "b2", 4, "Ben")}).to_string(),
        "not json at all".to_string(),
        json!({"event": "menu:updated", "data": {}}).to_string(),
        json!({"event": "order:updated", "data": order_json("o1", "b1", 2, "Ana Cruz"), "branchId": "b1"}).to_string(),
        json!({"event": "order:deleted", "data": {"_id": "o1", "version": 3}, "branchId": "b1"}).to_string(),
    ]
}

async fn ws_handler(
    State(state): State<Arc<WsState>>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.auth.lock().unwrap().push(auth);
    ws.on_upgrade(serve_socket)
}

async fn serve_socket(mut socket: WebSocket) {
    for frame in frames() {
        if socket.send(Message::Text(frame.into())).await.is_err() {
            return;
        }
    }
    // Hold the connection open until the client leaves
    while let Some(Ok(msg)) = socket.recv().await {
        if matches!(msg, Message::Close(_)) {
            break;
        }
    }
}

async fn spawn_ws_server() -> (String, Arc<WsState>) {
    let state = Arc::new(WsState::default());
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("ws://{addr}/ws"), state)
}

/// Server that drops the first `drops` connections right after one frame
struct FlakyState {
    connections: AtomicUsize,
    drops: usize,
}

async fn flaky_handler(State(state): State<Arc<FlakyState>>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let n = state.connections.fetch_add(1, Ordering::SeqCst);
    let hold = n >= state.drops;
    ws.on_upgrade(move |mut socket| async move {
        let frame = json!({"event": "order:created", "data": order_json(&format!("o{n}"), "b1", 1, "Ana"), "branchId": "b1"});
        if socket.send(Message::Text(frame.to_string().into())).await.is_err() {
            return;
        }
        if !hold {
            let _ = socket.send(Message::Close(None)).await;
            return;
        }
        while let Some(Ok(msg)) = socket.recv().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    })
}

async fn spawn_flaky_server(drops: usize) -> (String, Arc<FlakyState>) {
    let state = Arc::new(FlakyState { connections: AtomicUsize::new(0), drops });
    let app = Router::new()
        .route("/ws", get(flaky_handler))
        .with_state(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("ws://{addr}/ws"), state)
}

async fn next(sub: &mut brewline_client::Subscription) -> OrderEvent {
    timeout(Duration::from_secs(5), sub.recv())
        .await
        .expect("timed out waiting for event")
        .expect("feed closed")
}

#[tokio::test]
async fn test_feed_delivers_decoded_events() -> anyhow::Result<()> {
    let (url, server) = spawn_ws_server().await;
    let client = RealtimeClient::spawn(RealtimeConfig::new(&url).with_token("tok-123"));
    let mut sub = client.subscribe();

    let mut store = VersionedStore::new();
    let mut outcomes = Vec::new();
    for _ in 0..4 {
        let event = next(&mut sub).await;
        outcomes.push((event.order_id().to_string(), apply_event(&mut store, event, "b1")));
    }

    // Garbage and unknown events are skipped; the other branch never lands
    assert_eq!(
        outcomes,
        vec![
            ("o1".to_string(), EventOutcome::Applied),
            ("o2".to_string(), EventOutcome::OtherBranch),
            ("o1".to_string(), EventOutcome::Applied),
            ("o1".to_string(), EventOutcome::Applied),
        ]
    );
    assert!(store.is_empty());
    assert!(store.is_tombstoned("o1"));
    assert!(client.is_connected());

    let auth = server.auth.lock().unwrap().clone();
    assert_eq!(auth, vec![Some("Bearer tok-123".to_string())]);

    client.shutdown().await;
    assert!(!client.is_connected());
    assert!(client.is_finished());
    Ok(())
}

#[tokio::test]
async fn test_gives_up_after_reconnect_attempts() {
    // Bind then drop to get a port with nothing listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RealtimeClient::spawn(
        RealtimeConfig::new(format!("ws://{addr}/ws"))
            .with_reconnect_attempts(2)
            .with_reconnect_delay(Duration::from_millis(10)),
    );
    let mut state = client.connection_state();

    timeout(Duration::from_secs(5), async {
        while !client.is_finished() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("client kept retrying");
    assert!(!*state.borrow_and_update());
}

#[tokio::test]
async fn test_reconnects_after_server_close() -> anyhow::Result<()> {
    // Two drops with a single allowed retry: only works if a successful
    // connect resets the failure count
    let (url, server) = spawn_flaky_server(2).await;
    let client = RealtimeClient::spawn(
        RealtimeConfig::new(&url)
            .with_reconnect_attempts(1)
            .with_reconnect_delay(Duration::from_millis(20)),
    );
    let mut sub = client.subscribe();

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(next(&mut sub).await.order_id().to_string());
    }
    assert_eq!(ids, ["o0", "o1", "o2"]);
    assert_eq!(server.connections.load(Ordering::SeqCst), 3);

    let mut state = client.connection_state();
    timeout(Duration::from_secs(5), state.wait_for(|up| *up)).await??;
    assert!(client.is_connected());
    assert!(!client.is_finished());

    client.shutdown().await;
    assert!(!client.is_connected());
    Ok(())
}

#[tokio::test]
async fn test_subscription_drop() {
    let (url, _) = spawn_ws_server().await;
    let client = RealtimeClient::spawn(RealtimeConfig::new(&url));
    let sub = client.subscribe();
    assert_eq!(client.subscriber_count(), 1);
    sub.unsubscribe();
    assert_eq!(client.subscriber_count(), 0);
    client.shutdown().await;
}
