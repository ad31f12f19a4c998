//! Connection entity
//!
//! One registered transport session and the metadata it was registered with.

use crate::value_objects::{ConnectionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata a client supplies when it announces itself online
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub user_id: UserId,
    pub user_type: String,
    pub user_name: String,
}

impl Registration {
    /// Create a new registration
    #[must_use]
    pub fn new(user_id: UserId, user_type: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            user_id,
            user_type: user_type.into(),
            user_name: user_name.into(),
        }
    }
}

/// A live, registered connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    pub user_id: UserId,
    pub user_type: String,
    pub user_name: String,
    pub connected_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl Connection {
    /// Create a connection from a registration accepted at `now`
    #[must_use]
    pub fn new(id: ConnectionId, registration: Registration, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: registration.user_id,
            user_type: registration.user_type,
            user_name: registration.user_name,
            connected_at: now,
            last_seen: now,
        }
    }

    /// Overwrite metadata from a repeated registration.
    ///
    /// `connected_at` is kept; `last_seen` is refreshed.
    pub fn reregister(&mut self, registration: Registration, now: DateTime<Utc>) {
        self.user_id = registration.user_id;
        self.user_type = registration.user_type;
        self.user_name = registration.user_name;
        self.touch(now);
    }

    /// Refresh `last_seen`. Never moves it backwards.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_seen {
            self.last_seen = now;
        }
    }

    /// Whether this connection was last seen strictly before `cutoff`
    #[must_use]
    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_seen < cutoff
    }

    /// The metadata this connection is registered with
    #[must_use]
    pub fn registration(&self) -> Registration {
        Registration {
            user_id: self.user_id,
            user_type: self.user_type.clone(),
            user_name: self.user_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_connection_creation() {
        let id = ConnectionId::generate();
        let conn = Connection::new(id, Registration::new(UserId::new(7), "agent", "Alice"), t0());

        assert_eq!(conn.id, id);
        assert_eq!(conn.user_id, UserId::new(7));
        assert_eq!(conn.user_type, "agent");
        assert_eq!(conn.user_name, "Alice");
        assert_eq!(conn.connected_at, t0());
        assert_eq!(conn.last_seen, t0());
    }

    #[test]
    fn test_touch_is_monotonic() {
        let mut conn = Connection::new(
            ConnectionId::generate(),
            Registration::new(UserId::new(1), "agent", "A"),
            t0(),
        );

        conn.touch(t0() + Duration::seconds(10));
        assert_eq!(conn.last_seen, t0() + Duration::seconds(10));

        conn.touch(t0() + Duration::seconds(5));
        assert_eq!(conn.last_seen, t0() + Duration::seconds(10));
    }

    #[test]
    fn test_reregister_keeps_connected_at() {
        let mut conn = Connection::new(
            ConnectionId::generate(),
            Registration::new(UserId::new(1), "agent", "Old"),
            t0(),
        );

        conn.reregister(
            Registration::new(UserId::new(1), "admin", "New"),
            t0() + Duration::seconds(3),
        );

        assert_eq!(conn.user_type, "admin");
        assert_eq!(conn.user_name, "New");
        assert_eq!(conn.connected_at, t0());
        assert_eq!(conn.last_seen, t0() + Duration::seconds(3));
    }

    #[test]
    fn test_is_stale() {
        let conn = Connection::new(
            ConnectionId::generate(),
            Registration::new(UserId::new(1), "agent", "A"),
            t0(),
        );

        assert!(conn.is_stale(t0() + Duration::seconds(1)));
        assert!(!conn.is_stale(t0()));
        assert!(!conn.is_stale(t0() - Duration::seconds(1)));
    }
}
