//! WebSocket handler
//!
//! Drives one transport: sends `hello`, attaches an observer, dispatches
//! inbound events, and on any kind of disconnect removes the connection.

use crate::broadcast::Observer;
use crate::connection::ClientConnection;
use crate::handlers::{HandlerError, MessageDispatcher};
use crate::protocol::{HelloPayload, PresenceMessage};
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use presence_core::ConnectionId;

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let connection = ClientConnection::new();
    let connection_id = connection.id();

    tracing::info!(connection_id = %connection_id, "WebSocket connection established");

    // Split the WebSocket
    let (mut ws_sink, mut ws_stream) = socket.split();

    // Send Hello before any broadcast can be queued
    let policy = &state.config().presence;
    let hello = PresenceMessage::hello(HelloPayload::new(
        policy.client_heartbeat_interval(),
        policy.heartbeat_timeout,
    ));
    if let Some(frame) = encode_frame(&hello, connection_id) {
        if ws_sink.send(frame).await.is_err() {
            tracing::warn!(connection_id = %connection_id, "Failed to send Hello message");
            return;
        }
    }

    // Outbound queue; the broadcaster holds the only sender
    let (observer, mut rx) = Observer::channel(connection_id, policy.observer_buffer);
    state.broadcaster().attach(observer);

    // Receive task
    let state_recv = state.clone();
    let connection_recv = connection.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    handle_text_message(&state_recv, &connection_recv, &text);
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        connection_id = %connection_recv.id(),
                        "Binary messages not supported"
                    );
                }
                Ok(Message::Ping(_)) => {
                    tracing::trace!(connection_id = %connection_recv.id(), "Ping received");
                    // Pong is handled automatically by axum
                }
                Ok(Message::Pong(_)) => {
                    tracing::trace!(connection_id = %connection_recv.id(), "Pong received");
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(connection_id = %connection_recv.id(), "Client closed connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        connection_id = %connection_recv.id(),
                        error = %e,
                        "WebSocket error"
                    );
                    break;
                }
            }
        }
    });

    // Send task
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let Some(frame) = encode_frame(&msg, connection_id) else {
                continue;
            };
            if ws_sink.send(frame).await.is_err() {
                tracing::warn!(
                    connection_id = %connection_id,
                    "Failed to send message to WebSocket"
                );
                break;
            }
        }

        // Queue closed: observer detached or the connection is shutting down
        let _ = ws_sink.close().await;
    });

    // Wait for either task to complete, then stop the other
    tokio::select! {
        _ = &mut recv_task => {
            tracing::debug!(connection_id = %connection_id, "Receive task ended");
        }
        _ = &mut send_task => {
            tracing::debug!(connection_id = %connection_id, "Send task ended");
        }
    }
    recv_task.abort();
    send_task.abort();

    cleanup_connection(&state, &connection);
}

/// Encode an outbound message as a text frame, logging encoder failures
fn encode_frame(message: &PresenceMessage, connection_id: ConnectionId) -> Option<Message> {
    match message.to_json() {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            tracing::error!(
                connection_id = %connection_id,
                event = %message.event,
                error = %e,
                "Failed to encode message"
            );
            None
        }
    }
}

/// Handle a text message from the client
///
/// Undecodable frames and handler errors are logged and dropped.
fn handle_text_message(state: &GatewayState, connection: &ClientConnection, text: &str) {
    let message = match PresenceMessage::from_json(text) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(
                connection_id = %connection.id(),
                error = %e,
                "Failed to parse message"
            );
            return;
        }
    };

    tracing::trace!(
        connection_id = %connection.id(),
        event = %message.event,
        "Received message"
    );

    if let Err(e) = MessageDispatcher::dispatch(state, connection, message) {
        if matches!(e, HandlerError::UserMismatch { .. }) {
            tracing::warn!(
                connection_id = %connection.id(),
                code = e.code(),
                error = %e,
                "Event discarded"
            );
        } else {
            tracing::debug!(
                connection_id = %connection.id(),
                code = e.code(),
                error = %e,
                "Event discarded"
            );
        }
    }
}

/// Clean up a connection on disconnect
///
/// Same effect as an explicit `userOffline` for this transport.
fn cleanup_connection(state: &GatewayState, connection: &ClientConnection) {
    state.broadcaster().detach(connection.id());
    connection.forget();

    if let Some(user_id) = state.store().remove(connection.id(), Utc::now()) {
        tracing::info!(user_id = %user_id, "User offline");
    }

    tracing::info!(
        connection_id = %connection.id(),
        age_ms = connection.age().as_millis() as u64,
        "Connection closed"
    );
}
