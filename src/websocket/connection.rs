use crate::protocol::{parse_client_message, ConnectionId, ErrorCode, ServerMessage};
use crate::server::SignalingServer;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use super::sending::{send_immediate_server_message, send_ping, send_text_message};

pub(super) async fn handle_socket(socket: WebSocket, server: Arc<SignalingServer>, addr: SocketAddr) {
    let (mut sender, mut receiver) = socket.split();
    let queue_capacity = server.config().outbound_queue_capacity.max(1);
    let (tx, mut rx) = mpsc::channel::<Arc<ServerMessage>>(queue_capacity);

    let connection_id = match server.register_client(tx, addr) {
        Ok(connection_id) => {
            tracing::info!(%connection_id, client_addr = %addr, "WebSocket connection established");
            connection_id
        }
        Err(err) => {
            let error_message = ServerMessage::error(err.error_code(), err.to_string());
            if let Err(send_err) = send_immediate_server_message(&mut sender, &error_message).await
            {
                tracing::debug!(
                    client_addr = %addr,
                    error = %send_err,
                    "Failed to send connection limit error frame"
                );
            }
            let _ = sender.close().await;
            return;
        }
    };

    let websocket_config = server.config().websocket_config.clone();
    let ping_interval = Duration::from_secs(websocket_config.ping_interval_secs.max(1));
    let idle_timeout = Duration::from_secs(websocket_config.idle_timeout_secs);

    // Outbound: drain the queue and keep the socket alive with pings
    let mut send_task = tokio::spawn(async move {
        let mut keepalive = tokio::time::interval(ping_interval);
        keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);
        keepalive.tick().await;

        loop {
            tokio::select! {
                message_opt = rx.recv() => {
                    let Some(message) = message_opt else {
                        break;
                    };
                    if send_text_message(&mut sender, &message, &connection_id).await.is_err() {
                        break;
                    }
                }
                _ = keepalive.tick() => {
                    if send_ping(&mut sender, &connection_id).await.is_err() {
                        break;
                    }
                }
            }
        }

        let _ = sender.close().await;
    });

    // Inbound: any frame counts as liveness
    let server_clone = server.clone();
    let mut receive_task = tokio::spawn(async move {
        loop {
            let msg = match tokio::time::timeout(idle_timeout, receiver.next()).await {
                Ok(Some(Ok(msg))) => msg,
                Ok(Some(Err(e))) => {
                    tracing::warn!(%connection_id, "WebSocket error: {}", e);
                    break;
                }
                Ok(None) => break,
                Err(_) => {
                    tracing::info!(
                        %connection_id,
                        idle_timeout_secs = idle_timeout.as_secs(),
                        "Connection idle past timeout, terminating"
                    );
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    process_text_frame(&server_clone, &connection_id, text.as_str());
                }
                Message::Binary(payload) => {
                    tracing::debug!(%connection_id, len = payload.len(), "Ignoring binary frame");
                }
                Message::Close(_) => {
                    tracing::info!(%connection_id, "WebSocket connection closed");
                    break;
                }
                Message::Ping(_) | Message::Pong(_) => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            tracing::debug!(%connection_id, "Send task completed");
            receive_task.abort();
        }
        _ = &mut receive_task => {
            tracing::debug!(%connection_id, "Receive task completed");
        }
    }

    // Implicit leave; dropping the registry's queue sender also ends the send task
    server.unregister_client(&connection_id);
}

/// Size check, parse and dispatch of one inbound text frame.
pub(super) fn process_text_frame(server: &SignalingServer, connection_id: &ConnectionId, text: &str) {
    let max_size = server.config().max_message_size;
    if text.len() > max_size {
        tracing::warn!(
            %connection_id,
            size = text.len(),
            max = max_size,
            "Message exceeds size limit"
        );
        server.send_error_to_connection(
            connection_id,
            ErrorCode::MessageTooLarge,
            format!("Message too large ({} bytes, max {} bytes)", text.len(), max_size),
        );
        return;
    }

    match parse_client_message(text, server.protocol_config()) {
        Ok(message) => server.handle_client_message(connection_id, message),
        Err(err) => {
            server.metrics().increment_invalid_messages();
            if err.should_reply() {
                tracing::warn!(%connection_id, error = %err, "Rejected client WebSocket frame");
                server.send_error_to_connection(connection_id, err.error_code(), err.user_message());
            } else {
                tracing::debug!(%connection_id, error = %err, "Ignoring unrecognized frame");
            }
        }
    }
}
