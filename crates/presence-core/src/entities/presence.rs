//! Presence status and the shapes published to observers

use crate::value_objects::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Effective status of a user
///
/// A user is online while at least one of its connections is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Online,
    #[default]
    Offline,
}

impl UserStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }

    #[must_use]
    pub const fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            _ => Err(format!("Invalid status: {s}")),
        }
    }
}

/// One entry of an online-users snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUser {
    pub user_id: UserId,
    pub user_name: String,
    pub status: UserStatus,
}

/// An online/offline transition of a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub user_id: UserId,
    pub status: UserStatus,
    pub last_seen: DateTime<Utc>,
}

impl StatusChange {
    #[must_use]
    pub fn online(user_id: UserId, last_seen: DateTime<Utc>) -> Self {
        Self {
            user_id,
            status: UserStatus::Online,
            last_seen,
        }
    }

    #[must_use]
    pub fn offline(user_id: UserId, last_seen: DateTime<Utc>) -> Self {
        Self {
            user_id,
            status: UserStatus::Offline,
            last_seen,
        }
    }
}
