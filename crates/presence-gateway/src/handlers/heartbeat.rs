//! userHeartbeat handler

use super::{HandlerError, HandlerResult, OnlineHandler};
use crate::connection::ClientConnection;
use crate::protocol::UserHeartbeatPayload;
use crate::server::GatewayState;
use chrono::Utc;
use presence_core::DomainError;

/// Handles userHeartbeat messages
pub struct HeartbeatHandler;

impl HeartbeatHandler {
    /// Refresh liveness of this transport.
    ///
    /// A connection the store no longer knows (expired, or never registered)
    /// is re-registered from the last `userOnline` seen on this transport;
    /// without one the heartbeat is ignored.
    pub fn handle(
        state: &GatewayState,
        connection: &ClientConnection,
        payload: UserHeartbeatPayload,
    ) -> HandlerResult<()> {
        if let Some(expected) = connection.user_id() {
            if expected != payload.user_id {
                return Err(HandlerError::UserMismatch {
                    expected,
                    got: payload.user_id,
                });
            }
        }

        let now = Utc::now();
        match state.store().heartbeat(connection.id(), now) {
            Ok(()) => {
                tracing::trace!(connection_id = %connection.id(), "Heartbeat received");
            }
            Err(DomainError::ConnectionNotFound(_)) => match connection.registration() {
                Some(registration) => {
                    tracing::info!(
                        connection_id = %connection.id(),
                        user_id = %registration.user_id,
                        "Heartbeat from expired connection, re-registering"
                    );
                    OnlineHandler::register(state, connection, registration, now);
                }
                None => {
                    tracing::debug!(
                        connection_id = %connection.id(),
                        user_id = %payload.user_id,
                        "Heartbeat from unregistered connection ignored"
                    );
                }
            },
        }

        Ok(())
    }
}
