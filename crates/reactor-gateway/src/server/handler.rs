//! WebSocket handler
//!
//! Dashboard clients only listen. Anything they send is read and
//! discarded; the socket stays open until either side closes it.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};

use crate::server::GatewayState;

/// GET /ws
pub async fn ws_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let (session_id, mut rx) = state.broadcast().connect().await;
    let (mut ws_sink, mut ws_stream) = socket.split();
    let shutdown = state.services().shutdown().clone();

    let session_id_send = session_id.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                () = shutdown.wait() => {
                    let _ = ws_sink.send(Message::Close(None)).await;
                    break;
                }
                next = rx.recv() => {
                    // Channel closes when the registry drops this subscriber
                    let Some(message) = next else { break };
                    let json = match message.to_json() {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::warn!(session_id = %session_id_send, error = %e, "Failed to serialize push");
                            continue;
                        }
                    };
                    if ws_sink.send(Message::Text(json)).await.is_err() {
                        tracing::debug!(session_id = %session_id_send, "Socket send failed");
                        break;
                    }
                }
            }
        }
    });

    let session_id_recv = session_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    tracing::trace!(session_id = %session_id_recv, "Ignoring client message");
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Ok(Message::Close(_)) => {
                    tracing::debug!(session_id = %session_id_recv, "Client closed connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!(session_id = %session_id_recv, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.broadcast().disconnect(&session_id);
}
