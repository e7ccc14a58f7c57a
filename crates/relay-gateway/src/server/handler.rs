//! WebSocket handler
//!
//! Owns the lifecycle of one client connection: registration, the read and
//! write tasks, keepalive, and cleanup.

use super::pages;
use super::AppState;
use crate::connection::Frame;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::interval;

/// Root handler
///
/// The same route serves the landing page to plain GET requests and upgrades
/// WebSocket requests into relay connections.
pub async fn relay_handler(
    State(state): State<AppState>,
    ws: Option<WebSocketUpgrade>,
) -> Response {
    match ws {
        Some(upgrade) => upgrade.on_upgrade(move |socket| handle_socket(state, socket)),
        None => pages::serve_page(&state.config().static_pages.dir, "index.html").await,
    }
}

/// Alternate client page
///
/// The relay has no p2p semantics; this route only serves a different asset.
pub async fn p2p_handler(State(state): State<AppState>) -> Response {
    pages::serve_page(&state.config().static_pages.dir, "p2p.html").await
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: AppState, socket: WebSocket) {
    let session_id = uuid::Uuid::new_v4().to_string();
    let relay_config = state.config().relay.clone();

    // Bounded queue between the hub and this connection's socket writer
    let (tx, mut rx) = mpsc::channel::<Frame>(relay_config.message_buffer);

    let connection = state.registry().register(session_id.clone(), tx);

    tracing::info!(session_id = %session_id, "websocket connection established");

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Clone state for tasks
    let state_recv = state.clone();
    let session_id_recv = session_id.clone();
    let connection_recv = connection.clone();

    // Receive task: every inbound payload is handed to the hub
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    connection_recv.touch();
                    state_recv
                        .hub()
                        .broadcast_from(&session_id_recv, &Frame::Text(text));
                }
                Ok(Message::Binary(data)) => {
                    connection_recv.touch();
                    state_recv
                        .hub()
                        .broadcast_from(&session_id_recv, &Frame::Binary(data));
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // Pong replies are handled by axum; both directions count
                    // as liveness
                    connection_recv.touch();
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(session_id = %session_id_recv, "client closed connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_id_recv,
                        error = %e,
                        "websocket read error"
                    );
                    break;
                }
            }
        }
    });

    // Clone for send task
    let session_id_send = session_id.clone();

    // Send task: drain the outbound queue into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let msg = match frame {
                Frame::Text(text) => Message::Text(text),
                Frame::Binary(data) => Message::Binary(data),
                Frame::Ping => Message::Ping(Vec::new()),
            };

            if ws_sink.send(msg).await.is_err() {
                tracing::debug!(session_id = %session_id_send, "websocket write failed");
                break;
            }
        }

        // Close the socket when the queue is closed
        let _ = ws_sink.close().await;
    });

    // Clone for keepalive task
    let session_id_ka = session_id.clone();
    let connection_ka = connection.clone();

    // Keepalive task: ping the peer and prune it once it has been silent
    // past the idle timeout
    let mut keepalive_task = tokio::spawn(async move {
        let mut ticker = interval(relay_config.ping_interval());
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let idle = connection_ka.idle_for();
            if idle > relay_config.idle_timeout() {
                tracing::warn!(
                    session_id = %session_id_ka,
                    idle_ms = idle.as_millis(),
                    "connection idle past timeout"
                );
                break;
            }

            match connection_ka.try_send(Frame::Ping) {
                Ok(()) | Err(TrySendError::Full(_)) => {
                    // A full queue means a stalled peer; the idle check above
                    // decides its fate
                }
                Err(TrySendError::Closed(_)) => break,
            }
        }
    });

    // Whichever task ends first tears the connection down
    tokio::select! {
        _ = &mut recv_task => {
            tracing::debug!(session_id = %session_id, "receive task ended");
        }
        _ = &mut send_task => {
            tracing::debug!(session_id = %session_id, "send task ended");
        }
        _ = &mut keepalive_task => {
            tracing::debug!(session_id = %session_id, "keepalive task ended");
        }
    }

    recv_task.abort();
    send_task.abort();
    keepalive_task.abort();

    // Clean up; unregister is idempotent, the hub may already have pruned us
    state.registry().unregister(&session_id);
    tracing::info!(
        session_id = %session_id,
        age_ms = connection.age().as_millis(),
        "connection cleaned up"
    );
}
