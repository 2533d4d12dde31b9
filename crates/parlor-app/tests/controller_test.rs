//! End-to-end tests for the room sync controller against in-process
//! HTTP and WebSocket servers.
//!
//! # Oracle Pattern
//!
//! Each test drives `process_cycle` until the observable `RoomView`
//! reaches the expected shape, then asserts on the view (and on the
//! frames the server actually received, for the outbound path).

#![allow(clippy::unwrap_used)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use futures_util::{SinkExt, StreamExt};
use parlor_app::{
    ConnectionStatus, Endpoints, RoomId, RoomSyncController, RoomView, TimelineItem, Username,
};
use parlor_core::ServerFrame;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};
use tokio_tungstenite::{accept_async, tungstenite::Message};

/// Route table entry: (path fragment, response body).
type Route = (&'static str, String);

/// Serve canned JSON; the first route whose fragment occurs in the request
/// line wins, anything else gets an empty array.
async fn spawn_history_server(routes: Vec<Route>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else { break };
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    match socket.read(&mut buf).await {
                        Ok(0) => break,
                        Ok(n) => {
                            request.extend_from_slice(&buf[..n]);
                            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        },
                        Err(_) => return,
                    }
                }
                let request = String::from_utf8_lossy(&request);
                let request_line = request.lines().next().unwrap_or_default();
                let body = routes
                    .iter()
                    .find(|(path, _)| request_line.contains(path))
                    .map_or_else(|| "[]".to_owned(), |(_, body)| body.clone());
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len(),
                );
                let _ = socket.write_all(response.as_bytes()).await;
            });
        }
    });
    format!("http://{addr}")
}

/// Accept WebSocket connections, push `outbound` frames to each client,
/// and record every text frame the client sends into `inbound_log`.
async fn spawn_ws_server(
    outbound: Vec<ServerFrame>,
    inbound_log: Arc<Mutex<Vec<String>>>,
) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else { break };
            let outbound = outbound.clone();
            let inbound_log = Arc::clone(&inbound_log);
            tokio::spawn(async move {
                let Ok(mut ws) = accept_async(socket).await else { return };
                for frame in outbound {
                    let text = serde_json::to_string(&frame).unwrap();
                    if ws.send(Message::Text(text.into())).await.is_err() {
                        return;
                    }
                }
                while let Some(Ok(message)) = ws.next().await {
                    if let Message::Text(text) = message {
                        inbound_log.lock().unwrap().push(text.to_string());
                    }
                }
            });
        }
    });
    format!("ws://{addr}")
}

/// Bind a port that never completes a WebSocket handshake, so the
/// connection stays in `Connecting`.
async fn spawn_silent_ws_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _listener = listener;
        std::future::pending::<()>().await;
    });
    format!("ws://{addr}")
}

fn alice() -> Username {
    Username::new("alice").unwrap()
}

fn room(id: &str) -> RoomId {
    RoomId::new(id).unwrap()
}

fn history_json(entries: &[(u64, &str, &str)]) -> String {
    let items: Vec<String> = entries
        .iter()
        .map(|(id, content, created_at)| {
            format!(
                r#"{{"id":{id},"username":"bob","content":"{content}","created_at":"{created_at}"}}"#
            )
        })
        .collect();
    format!("[{}]", items.join(","))
}

/// Drive the controller until the view satisfies the predicate, bounded
/// by a wall-clock deadline.
async fn pump_until(
    controller: &mut RoomSyncController,
    predicate: impl Fn(&RoomView) -> bool,
) -> RoomView {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let view = controller.view();
        if predicate(&view) || tokio::time::Instant::now() >= deadline {
            return view;
        }
        let _ = tokio::time::timeout(Duration::from_millis(100), controller.process_cycle()).await;
    }
}

#[tokio::test]
async fn history_across_two_days_renders_one_later_day_separator() {
    let body = history_json(&[
        (2, "evening", "2024-03-01T18:00:00Z"),
        (1, "morning", "2024-03-01T09:00:00Z"),
        (3, "next day", "2024-03-02T08:00:00Z"),
    ]);
    let http = spawn_history_server(vec![("/chat/rooms/general/messages", body)]).await;
    let ws = spawn_ws_server(Vec::new(), Arc::new(Mutex::new(Vec::new()))).await;

    let mut controller = RoomSyncController::new(Endpoints::new(http, ws), alice());
    controller.activate_room(room("general"));

    let view = pump_until(&mut controller, |v| v.can_send && !v.loading_history).await;
    assert_eq!(view.connection, ConnectionStatus::Open);
    let ids: Vec<u64> = view.messages.iter().map(|m| m.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3], "normalized to ascending timestamps");

    let items = controller.timeline();
    let separators: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| matches!(item, TimelineItem::DateSeparator(_)))
        .map(|(i, _)| i)
        .collect();
    // The leading separator plus exactly one before the later day.
    assert_eq!(separators, vec![0, 3]);
}

#[tokio::test]
async fn join_notice_appears_and_expires_in_order() {
    let http = spawn_history_server(Vec::new()).await;
    let ws = spawn_ws_server(
        vec![
            ServerFrame::Join { username: "bob".into() },
            ServerFrame::Join { username: "alice".into() },
        ],
        Arc::new(Mutex::new(Vec::new())),
    )
    .await;

    let mut controller = RoomSyncController::with_limits(
        Endpoints::new(http, ws),
        alice(),
        10,
        Duration::from_millis(300),
    );
    controller.activate_room(room("general"));

    let view = pump_until(&mut controller, |v| !v.notices.is_empty()).await;
    // The local user's own join is suppressed.
    assert_eq!(view.notices, vec!["bob joined the room"]);

    let view = pump_until(&mut controller, |v| v.notices.is_empty()).await;
    assert!(view.notices.is_empty(), "notice expired after its delay");
}

#[tokio::test]
async fn live_messages_append_and_duplicates_are_dropped() {
    let msg = |id: u64, content: &str| ServerFrame::Message {
        message: parlor_core::ChatMessage {
            id: parlor_core::MessageId(id),
            username: "bob".into(),
            content: content.into(),
            created_at: "2024-03-01T10:00:00Z".parse().unwrap(),
        },
    };
    let http = spawn_history_server(Vec::new()).await;
    let ws = spawn_ws_server(
        vec![msg(5, "first"), msg(5, "echo of first"), msg(6, "second")],
        Arc::new(Mutex::new(Vec::new())),
    )
    .await;

    let mut controller = RoomSyncController::new(Endpoints::new(http, ws), alice());
    controller.activate_room(room("general"));

    let view = pump_until(&mut controller, |v| v.messages.len() >= 2 && !v.loading_history).await;
    let ids: Vec<u64> = view.messages.iter().map(|m| m.id.0).collect();
    assert_eq!(ids, vec![5, 6]);
}

#[tokio::test]
async fn stale_history_has_no_effect_after_room_switch() {
    let http = spawn_history_server(vec![
        (
            "/chat/rooms/room-a/messages",
            history_json(&[(1, "from room-a", "2024-03-01T09:00:00Z")]),
        ),
        (
            "/chat/rooms/room-b/messages",
            history_json(&[(2, "from room-b", "2024-03-01T10:00:00Z")]),
        ),
    ])
    .await;
    let ws = spawn_ws_server(Vec::new(), Arc::new(Mutex::new(Vec::new()))).await;

    let mut controller = RoomSyncController::new(Endpoints::new(http, ws), alice());
    controller.activate_room(room("room-a"));
    controller.activate_room(room("room-b"));

    let view = pump_until(&mut controller, |v| !v.loading_history && !v.messages.is_empty()).await;
    let contents: Vec<&str> = view.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["from room-b"]);

    // Give room-a's fetch every chance to land, then re-check.
    let _ = tokio::time::timeout(Duration::from_millis(200), controller.process_cycle()).await;
    let view = controller.view();
    assert!(view.messages.iter().all(|m| m.content == "from room-b"));
}

#[tokio::test]
async fn send_while_connecting_transmits_nothing() {
    let http = spawn_history_server(Vec::new()).await;
    let ws = spawn_silent_ws_server().await;

    let mut controller = RoomSyncController::new(Endpoints::new(http, ws), alice());
    controller.activate_room(room("general"));

    assert!(!controller.view().can_send);
    controller.send_message("hi");

    let _ = tokio::time::timeout(Duration::from_millis(200), controller.process_cycle()).await;
    let view = controller.view();
    assert_eq!(view.connection, ConnectionStatus::Connecting);
    assert!(!view.can_send);
}

#[tokio::test]
async fn sent_messages_reach_the_server_trimmed() {
    let inbound_log = Arc::new(Mutex::new(Vec::new()));
    let http = spawn_history_server(Vec::new()).await;
    let ws = spawn_ws_server(Vec::new(), Arc::clone(&inbound_log)).await;

    let mut controller = RoomSyncController::new(Endpoints::new(http, ws), alice());
    controller.activate_room(room("general"));

    pump_until(&mut controller, |v| v.can_send).await;
    controller.send_message("  hi  ");
    controller.send_message("   ");

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while inbound_log.lock().unwrap().is_empty() && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    let frames = inbound_log.lock().unwrap().clone();
    assert_eq!(frames, vec![r#"{"event":"message","content":"hi","sender":"alice"}"#.to_owned()]);
}

#[tokio::test]
async fn deactivation_returns_to_idle_and_clears_view() {
    let http = spawn_history_server(Vec::new()).await;
    let ws = spawn_ws_server(
        vec![ServerFrame::Join { username: "bob".into() }],
        Arc::new(Mutex::new(Vec::new())),
    )
    .await;

    let mut controller = RoomSyncController::new(Endpoints::new(http, ws), alice());
    controller.activate_room(room("general"));
    pump_until(&mut controller, |v| !v.notices.is_empty()).await;

    controller.deactivate_room();
    let view = controller.view();
    assert!(view.room.is_none());
    assert!(view.messages.is_empty());
    assert!(view.notices.is_empty(), "pending notice expiries cancelled");
    assert_eq!(view.connection, ConnectionStatus::Closed);
    assert!(!view.can_send);

    // Idempotent, like the underlying close.
    controller.deactivate_room();
    assert_eq!(controller.view().connection, ConnectionStatus::Closed);
}
