//! In-memory presence store
//!
//! Authoritative table of live connections, indexed both by connection ID and
//! by owning user. A user's status is derived from its connection set: online
//! while the set is non-empty.
//!
//! Both indexes live behind one `RwLock` so every mutation updates them
//! together and readers never observe a half-applied change. Status
//! transitions are reported to the attached `StatusListener` before that
//! lock is released, so listeners see them in the order they happened.

use crate::entities::{Connection, OnlineUser, Registration, StatusChange, UserStatus};
use crate::error::{DomainError, DomainResult};
use crate::value_objects::{ConnectionId, UserId};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Receives every online/offline transition made by a `PresenceStore`.
///
/// Called with the store's write lock held: implementations must not block
/// and must not call back into the store.
pub trait StatusListener: Send + Sync {
    fn status_changed(&self, change: &StatusChange);
}

/// Result of a `register` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegisterOutcome {
    /// The registering user had no live connection before this call
    pub came_online: bool,
    /// The connection was previously bound to another user, who has now lost
    /// its last connection
    pub displaced: Option<UserId>,
}

struct Entry {
    connection: Connection,
    /// Store-wide counter value of the last register/heartbeat on this entry
    revision: u64,
}

#[derive(Default)]
struct StoreInner {
    connections: HashMap<ConnectionId, Entry>,
    users: BTreeMap<UserId, HashSet<ConnectionId>>,
    revision: u64,
}

impl StoreInner {
    fn next_revision(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }

    /// Drop `connection_id` from `user_id`'s set. Returns true if the set became empty.
    fn unlink(&mut self, user_id: UserId, connection_id: &ConnectionId) -> bool {
        let Some(sessions) = self.users.get_mut(&user_id) else {
            return false;
        };
        sessions.remove(connection_id);
        if sessions.is_empty() {
            self.users.remove(&user_id);
            true
        } else {
            false
        }
    }

    fn take(&mut self, connection_id: &ConnectionId) -> Option<UserId> {
        let entry = self.connections.remove(connection_id)?;
        let user_id = entry.connection.user_id;
        self.unlink(user_id, connection_id).then_some(user_id)
    }
}

/// Thread-safe registry of live connections
#[derive(Default)]
pub struct PresenceStore {
    inner: RwLock<StoreInner>,
    listener: Option<Arc<dyn StatusListener>>,
}

impl PresenceStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store reporting transitions to `listener`
    #[must_use]
    pub fn with_listener(listener: Arc<dyn StatusListener>) -> Self {
        Self {
            inner: RwLock::default(),
            listener: Some(listener),
        }
    }

    fn emit(&self, change: &StatusChange) {
        if let Some(listener) = &self.listener {
            listener.status_changed(change);
        }
    }

    /// Register (or re-register) a connection.
    ///
    /// Re-registering an existing `connection_id` overwrites its metadata and
    /// refreshes `last_seen` without changing `connected_at`. A displaced user
    /// is reported offline before the registering user is reported online.
    pub fn register(
        &self,
        connection_id: ConnectionId,
        registration: Registration,
        now: DateTime<Utc>,
    ) -> RegisterOutcome {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let revision = inner.next_revision();
        let user_id = registration.user_id;

        let mut displaced = None;
        let previous_user = inner
            .connections
            .get(&connection_id)
            .map(|entry| entry.connection.user_id);

        if let Some(previous) = previous_user.filter(|previous| *previous != user_id) {
            if inner.unlink(previous, &connection_id) {
                displaced = Some(previous);
            }
        }

        match inner.connections.get_mut(&connection_id) {
            Some(entry) => {
                entry.connection.reregister(registration, now);
                entry.revision = revision;
            }
            None => {
                let connection = Connection::new(connection_id, registration, now);
                inner
                    .connections
                    .insert(connection_id, Entry { connection, revision });
            }
        }

        let sessions = inner.users.entry(user_id).or_default();
        let came_online = sessions.is_empty();
        sessions.insert(connection_id);

        if let Some(previous) = displaced {
            self.emit(&StatusChange::offline(previous, now));
        }
        if came_online {
            self.emit(&StatusChange::online(user_id, now));
        }

        RegisterOutcome {
            came_online,
            displaced,
        }
    }

    /// Refresh the liveness of a registered connection
    pub fn heartbeat(&self, connection_id: ConnectionId, now: DateTime<Utc>) -> DomainResult<()> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let revision = inner.next_revision();

        let entry = inner
            .connections
            .get_mut(&connection_id)
            .ok_or(DomainError::ConnectionNotFound(connection_id))?;
        entry.connection.touch(now);
        entry.revision = revision;

        Ok(())
    }

    /// Remove a connection.
    ///
    /// Returns the owning user only when this removal took that user offline;
    /// that transition is stamped with `now`. Removing an unknown connection
    /// is a no-op.
    pub fn remove(&self, connection_id: ConnectionId, now: DateTime<Utc>) -> Option<UserId> {
        let mut inner = self.inner.write();
        let offline = inner.take(&connection_id);
        if let Some(user_id) = offline {
            self.emit(&StatusChange::offline(user_id, now));
        }
        offline
    }

    /// Remove a connection only if it is still stale at `cutoff`.
    ///
    /// A heartbeat that lands between `expired_before` and this call keeps the
    /// connection alive. Returns the owning user on an offline transition.
    pub fn expire(
        &self,
        connection_id: ConnectionId,
        cutoff: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Option<UserId> {
        let mut inner = self.inner.write();
        let stale = inner
            .connections
            .get(&connection_id)
            .is_some_and(|entry| entry.connection.is_stale(cutoff));
        if !stale {
            return None;
        }

        let offline = inner.take(&connection_id);
        if let Some(user_id) = offline {
            self.emit(&StatusChange::offline(user_id, now));
        }
        offline
    }

    /// Currently online users, ascending by user ID.
    ///
    /// The display name comes from the user's most recently updated connection.
    pub fn snapshot(&self) -> Vec<OnlineUser> {
        let inner = self.inner.read();

        inner
            .users
            .iter()
            .filter_map(|(user_id, sessions)| {
                let latest = sessions
                    .iter()
                    .filter_map(|id| inner.connections.get(id))
                    .max_by_key(|entry| entry.revision)?;

                Some(OnlineUser {
                    user_id: *user_id,
                    user_name: latest.connection.user_name.clone(),
                    status: UserStatus::Online,
                })
            })
            .collect()
    }

    /// Connections whose `last_seen` is strictly before `cutoff`
    pub fn expired_before(&self, cutoff: DateTime<Utc>) -> Vec<ConnectionId> {
        self.inner
            .read()
            .connections
            .values()
            .filter(|entry| entry.connection.is_stale(cutoff))
            .map(|entry| entry.connection.id)
            .collect()
    }

    /// Get a copy of a registered connection
    pub fn get(&self, connection_id: ConnectionId) -> Option<Connection> {
        self.inner
            .read()
            .connections
            .get(&connection_id)
            .map(|entry| entry.connection.clone())
    }

    /// Derived status of a user
    pub fn status(&self, user_id: UserId) -> UserStatus {
        if self.is_online(user_id) {
            UserStatus::Online
        } else {
            UserStatus::Offline
        }
    }

    /// Whether the user has at least one live connection
    pub fn is_online(&self, user_id: UserId) -> bool {
        self.inner.read().users.contains_key(&user_id)
    }

    /// Number of live connections owned by a user
    pub fn connections_of(&self, user_id: UserId) -> usize {
        self.inner.read().users.get(&user_id).map_or(0, HashSet::len)
    }

    /// Total number of live connections
    pub fn connection_count(&self) -> usize {
        self.inner.read().connections.len()
    }

    /// Number of online users
    pub fn user_count(&self) -> usize {
        self.inner.read().users.len()
    }
}

impl std::fmt::Debug for PresenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("PresenceStore")
            .field("connections", &inner.connections.len())
            .field("users", &inner.users.len())
            .field("listener", &self.listener.is_some())
            .finish()
    }
}
