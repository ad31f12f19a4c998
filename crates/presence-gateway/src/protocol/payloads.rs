//! Payload definitions
//!
//! `userId` must be a JSON integer everywhere; anything else fails to decode
//! and the frame is discarded before it reaches the store.

use presence_core::{Registration, UserId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Payload for `hello`
///
/// Sent by the server immediately after connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloPayload {
    /// Recommended client heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
    /// Silence after which the server expires a connection, in milliseconds
    pub heartbeat_timeout: u64,
}

impl HelloPayload {
    /// Create a Hello payload from the server's liveness policy
    #[must_use]
    pub fn new(heartbeat_interval: Duration, heartbeat_timeout: Duration) -> Self {
        Self {
            heartbeat_interval: heartbeat_interval.as_millis() as u64,
            heartbeat_timeout: heartbeat_timeout.as_millis() as u64,
        }
    }
}

/// Payload for `userOnline`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOnlinePayload {
    pub user_id: UserId,
    #[serde(default)]
    pub user_type: String,
    #[serde(default)]
    pub user_name: String,
}

impl From<UserOnlinePayload> for Registration {
    fn from(payload: UserOnlinePayload) -> Self {
        Registration::new(payload.user_id, payload.user_type, payload.user_name)
    }
}

/// Payload for `userHeartbeat`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserHeartbeatPayload {
    pub user_id: UserId,
}

/// Payload for `userOffline`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOfflinePayload {
    pub user_id: UserId,
}
