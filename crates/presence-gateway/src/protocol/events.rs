//! Gateway event names
//!
//! Every frame carries one of these names in its `event` field.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Presence event names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    /// Client announces a user online (client only)
    UserOnline,
    /// Client liveness signal (client only)
    UserHeartbeat,
    /// Client announces a user offline (client only)
    UserOffline,
    /// Client asks for the online users list (client only)
    GetOnlineUsers,
    /// Liveness policy, sent on connect (server only)
    Hello,
    /// A user went online or offline (server only)
    UserStatusChanged,
    /// Reply to `getOnlineUsers` (server only)
    OnlineUsersList,
}

impl EventName {
    /// Parse an event name
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "userOnline" => Some(Self::UserOnline),
            "userHeartbeat" => Some(Self::UserHeartbeat),
            "userOffline" => Some(Self::UserOffline),
            "getOnlineUsers" => Some(Self::GetOnlineUsers),
            "hello" => Some(Self::Hello),
            "userStatusChanged" => Some(Self::UserStatusChanged),
            "onlineUsersList" => Some(Self::OnlineUsersList),
            _ => None,
        }
    }

    /// Get the wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserOnline => "userOnline",
            Self::UserHeartbeat => "userHeartbeat",
            Self::UserOffline => "userOffline",
            Self::GetOnlineUsers => "getOnlineUsers",
            Self::Hello => "hello",
            Self::UserStatusChanged => "userStatusChanged",
            Self::OnlineUsersList => "onlineUsersList",
        }
    }

    /// Check if this event can be sent by the client
    #[must_use]
    pub const fn is_client_event(self) -> bool {
        matches!(
            self,
            Self::UserOnline | Self::UserHeartbeat | Self::UserOffline | Self::GetOnlineUsers
        )
    }
}

impl Serialize for EventName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown event: {value}")))
    }
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
