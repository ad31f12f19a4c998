//! userOnline handler

use super::HandlerResult;
use crate::connection::ClientConnection;
use crate::protocol::UserOnlinePayload;
use crate::server::GatewayState;
use chrono::{DateTime, Utc};
use presence_core::Registration;

/// Handles userOnline messages
pub struct OnlineHandler;

impl OnlineHandler {
    /// Register the transport under the payload's user
    pub fn handle(
        state: &GatewayState,
        connection: &ClientConnection,
        payload: UserOnlinePayload,
    ) -> HandlerResult<()> {
        Self::register(state, connection, payload.into(), Utc::now());
        Ok(())
    }

    /// Register `connection`; the store broadcasts any resulting transitions.
    ///
    /// Shared with the heartbeat handler's implicit re-registration.
    pub(super) fn register(
        state: &GatewayState,
        connection: &ClientConnection,
        registration: Registration,
        now: DateTime<Utc>,
    ) {
        let user_id = registration.user_id;
        let outcome = state
            .store()
            .register(connection.id(), registration.clone(), now);
        connection.remember(registration);

        tracing::debug!(
            connection_id = %connection.id(),
            user_id = %user_id,
            came_online = outcome.came_online,
            "Connection registered"
        );

        if let Some(previous) = outcome.displaced {
            tracing::info!(
                connection_id = %connection.id(),
                user_id = %previous,
                "Connection rebound to another user, previous user offline"
            );
        }

        if outcome.came_online {
            tracing::info!(user_id = %user_id, "User online");
        }
    }
}
