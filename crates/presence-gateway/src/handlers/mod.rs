//! Event handlers
//!
//! Handles incoming WebSocket messages based on their event name.

mod error;
mod heartbeat;
mod offline;
mod online;
mod query;

pub use error::{HandlerError, HandlerResult};
pub use heartbeat::HeartbeatHandler;
pub use offline::OfflineHandler;
pub use online::OnlineHandler;
pub use query::OnlineUsersQueryHandler;

use crate::connection::ClientConnection;
use crate::protocol::{EventName, PresenceMessage};
use crate::server::GatewayState;

/// Dispatch incoming client messages to the appropriate handler
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Handle an incoming client message
    pub fn dispatch(
        state: &GatewayState,
        connection: &ClientConnection,
        message: PresenceMessage,
    ) -> HandlerResult<()> {
        if !message.event.is_client_event() {
            return Err(HandlerError::UnexpectedEvent(message.event));
        }

        match message.event {
            EventName::UserOnline => {
                let payload = message.as_user_online().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid userOnline payload".to_string())
                })?;

                OnlineHandler::handle(state, connection, payload)
            }
            EventName::UserHeartbeat => {
                let payload = message.as_user_heartbeat().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid userHeartbeat payload".to_string())
                })?;

                HeartbeatHandler::handle(state, connection, payload)
            }
            EventName::UserOffline => {
                let payload = message.as_user_offline().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid userOffline payload".to_string())
                })?;

                OfflineHandler::handle(state, connection, payload)
            }
            EventName::GetOnlineUsers => OnlineUsersQueryHandler::handle(state, connection),
            // Server events are rejected above
            other => Err(HandlerError::UnexpectedEvent(other)),
        }
    }
}
