//! getOnlineUsers handler

use super::HandlerResult;
use crate::connection::ClientConnection;
use crate::server::GatewayState;

/// Handles getOnlineUsers messages
pub struct OnlineUsersQueryHandler;

impl OnlineUsersQueryHandler {
    /// Reply to the requesting transport only
    pub fn handle(state: &GatewayState, connection: &ClientConnection) -> HandlerResult<()> {
        let users = state.store().snapshot();

        if !state
            .broadcaster()
            .notify_online_users_list(connection.id(), &users)
        {
            tracing::debug!(
                connection_id = %connection.id(),
                "Online users list not delivered"
            );
        }

        Ok(())
    }
}
