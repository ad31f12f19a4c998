//! userOffline handler

use super::{HandlerError, HandlerResult};
use crate::connection::ClientConnection;
use crate::protocol::UserOfflinePayload;
use crate::server::GatewayState;
use chrono::Utc;

/// Handles userOffline messages
pub struct OfflineHandler;

impl OfflineHandler {
    /// Remove this transport from the store and forget its registration.
    ///
    /// Only the sender's own connection is affected; other tabs of the same
    /// user stay online.
    pub fn handle(
        state: &GatewayState,
        connection: &ClientConnection,
        payload: UserOfflinePayload,
    ) -> HandlerResult<()> {
        if let Some(expected) = connection.user_id() {
            if expected != payload.user_id {
                return Err(HandlerError::UserMismatch {
                    expected,
                    got: payload.user_id,
                });
            }
        }

        connection.forget();

        if let Some(user_id) = state.store().remove(connection.id(), Utc::now()) {
            tracing::info!(user_id = %user_id, "User offline");
        } else {
            tracing::debug!(
                connection_id = %connection.id(),
                user_id = %payload.user_id,
                "Offline without status change"
            );
        }

        Ok(())
    }
}
