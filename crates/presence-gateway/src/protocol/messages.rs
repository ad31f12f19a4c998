//! Gateway message format
//!
//! Every WebSocket text frame is one `PresenceMessage`.

use super::{EventName, HelloPayload, UserHeartbeatPayload, UserOfflinePayload, UserOnlinePayload};
use presence_core::{OnlineUser, StatusChange};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gateway message envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceMessage {
    /// Event name
    pub event: EventName,

    /// Event data payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl PresenceMessage {
    // === Server Messages ===

    /// Create a `hello` message
    #[must_use]
    pub fn hello(payload: HelloPayload) -> Self {
        Self {
            event: EventName::Hello,
            data: Some(serde_json::to_value(payload).unwrap_or_default()),
        }
    }

    /// Create a `userStatusChanged` message
    #[must_use]
    pub fn user_status_changed(change: &StatusChange) -> Self {
        Self {
            event: EventName::UserStatusChanged,
            data: Some(serde_json::to_value(change).unwrap_or_default()),
        }
    }

    /// Create an `onlineUsersList` message
    #[must_use]
    pub fn online_users_list(users: &[OnlineUser]) -> Self {
        Self {
            event: EventName::OnlineUsersList,
            data: Some(serde_json::to_value(users).unwrap_or_default()),
        }
    }

    // === Parsing Client Messages ===

    /// Try to parse as a `userOnline` payload
    pub fn as_user_online(&self) -> Option<UserOnlinePayload> {
        self.payload_for(EventName::UserOnline)
    }

    /// Try to parse as a `userHeartbeat` payload
    pub fn as_user_heartbeat(&self) -> Option<UserHeartbeatPayload> {
        self.payload_for(EventName::UserHeartbeat)
    }

    /// Try to parse as a `userOffline` payload
    pub fn as_user_offline(&self) -> Option<UserOfflinePayload> {
        self.payload_for(EventName::UserOffline)
    }

    fn payload_for<T: DeserializeOwned>(&self, event: EventName) -> Option<T> {
        if self.event != event {
            return None;
        }
        self.data
            .as_ref()
            .and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    // === Utilities ===

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for PresenceMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PresenceMessage(event={})", self.event)
    }
}
