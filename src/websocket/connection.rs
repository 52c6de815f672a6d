use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::server::{RegisterClientError, RelayServer};

const OUTBOUND_QUEUE_CAPACITY: usize = 64;

pub(super) async fn handle_socket(socket: WebSocket, server: Arc<RelayServer>, addr: SocketAddr) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Arc<ServerMessage>>(OUTBOUND_QUEUE_CAPACITY);

    // Register client with server; the `connected` handshake, matchmaking,
    // and the presence broadcast all happen inside.
    let player_id = match server.register_client(tx, addr) {
        Ok(player_id) => {
            tracing::info!(%player_id, client_addr = %addr, "WebSocket connection established");
            player_id
        }
        Err(RegisterClientError::IpLimitExceeded { current, limit }) => {
            tracing::warn!(
                client_addr = %addr,
                current,
                limit,
                "Rejecting connection over per-IP limit"
            );
            let _ = sender.close().await;
            return;
        }
    };

    // Outgoing messages: drain the per-client channel onto the socket.
    // Channel order is socket order, which preserves relay ordering.
    let send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let text = match serde_json::to_string(message.as_ref()) {
                Ok(text) => text,
                Err(err) => {
                    tracing::error!(error = %err, "Failed to serialize server message");
                    continue;
                }
            };
            if sender
                .send(Message::Text(Utf8Bytes::from(text)))
                .await
                .is_err()
            {
                break;
            }
        }
    });

    // Incoming messages: parse and dispatch one discrete event per frame.
    let server_clone = server.clone();
    let receive_task = tokio::spawn(async move {
        let max_size = server_clone.config().max_message_size;
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(err) => {
                    tracing::warn!(%player_id, "WebSocket error: {}", err);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    if text.len() > max_size {
                        tracing::warn!(
                            %player_id,
                            size = text.len(),
                            max = max_size,
                            "Message exceeds size limit, dropped"
                        );
                        server_clone.metrics().increment_oversized_messages();
                        continue;
                    }

                    // Malformed payloads are dropped, never propagated; the
                    // connection stays alive.
                    match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(client_message) => {
                            server_clone.handle_client_message(&player_id, client_message);
                        }
                        Err(err) => {
                            tracing::warn!(%player_id, error = %err, "Unparseable client frame, dropped");
                            server_clone.metrics().increment_malformed_messages();
                        }
                    }
                }
                Message::Close(_) => {
                    tracing::info!(%player_id, "WebSocket connection closed");
                    break;
                }
                Message::Binary(_) => {
                    tracing::debug!(%player_id, "Binary frame on text-only protocol, ignored");
                }
                _ => {
                    // Ping/Pong handled by axum
                }
            }
        }
    });

    // Whichever task exits first ends the connection.
    tokio::select! {
        _ = send_task => {
            tracing::debug!(%player_id, "Send task completed");
        }
        _ = receive_task => {
            tracing::debug!(%player_id, "Receive task completed");
        }
    }

    // Cleanup runs before any further event for this connection is processed.
    server.unregister_client(&player_id);
}
