//! Presence broadcaster
//!
//! Owns the sending half of every attached observer. Delivery is
//! non-blocking: an observer whose queue is full or whose receiver is gone is
//! detached, which drops its sender and lets the connection's send task end.
//!
//! The broadcaster is the presence store's `StatusListener`, so status
//! changes are queued while the store still holds its write lock.

use super::Observer;
use crate::protocol::PresenceMessage;
use dashmap::DashMap;
use presence_core::{ConnectionId, OnlineUser, StatusChange, StatusListener};
use tokio::sync::mpsc::error::TrySendError;

/// Fan-out registry of attached observers
pub struct PresenceBroadcaster {
    /// Observers by connection ID
    observers: DashMap<ConnectionId, Observer>,
}

impl PresenceBroadcaster {
    /// Create an empty broadcaster
    #[must_use]
    pub fn new() -> Self {
        Self {
            observers: DashMap::new(),
        }
    }

    /// Attach an observer, replacing any previous one for the same connection
    pub fn attach(&self, observer: Observer) {
        let id = observer.id();
        self.observers.insert(id, observer);
        tracing::debug!(connection_id = %id, "Observer attached");
    }

    /// Detach an observer. Returns false if it was not attached.
    pub fn detach(&self, id: ConnectionId) -> bool {
        let removed = self.observers.remove(&id).is_some();
        if removed {
            tracing::debug!(connection_id = %id, "Observer detached");
        }
        removed
    }

    /// Whether an observer is attached for the connection
    pub fn is_attached(&self, id: ConnectionId) -> bool {
        self.observers.contains_key(&id)
    }

    /// Number of attached observers
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Send a `userStatusChanged` event to every observer.
    ///
    /// Returns the number of observers the event was queued for.
    pub fn notify_status_changed(&self, change: &StatusChange) -> usize {
        let message = PresenceMessage::user_status_changed(change);
        let mut delivered = 0;
        let mut dropped = Vec::new();

        for observer in &self.observers {
            match observer.try_send(message.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => dropped.push((observer.id(), matches!(e, TrySendError::Full(_)))),
            }
        }

        // Removal must happen after iteration releases the shard locks
        for (id, full) in dropped {
            self.observers.remove(&id);
            if full {
                tracing::warn!(connection_id = %id, "Observer queue full, dropping observer");
            } else {
                tracing::debug!(connection_id = %id, "Observer closed, dropping observer");
            }
        }

        tracing::debug!(
            user_id = %change.user_id,
            status = %change.status,
            delivered,
            "Status change broadcast"
        );

        delivered
    }

    /// Send an `onlineUsersList` event to a single observer.
    ///
    /// Returns false if the observer is unknown or could not accept the event.
    pub fn notify_online_users_list(&self, id: ConnectionId, users: &[OnlineUser]) -> bool {
        let result = match self.observers.get(&id) {
            Some(observer) => observer.try_send(PresenceMessage::online_users_list(users)),
            None => return false,
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                self.observers.remove(&id);
                if matches!(e, TrySendError::Full(_)) {
                    tracing::warn!(connection_id = %id, "Observer queue full, dropping observer");
                }
                false
            }
        }
    }
}

impl StatusListener for PresenceBroadcaster {
    fn status_changed(&self, change: &StatusChange) {
        self.notify_status_changed(change);
    }
}

impl Default for PresenceBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PresenceBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceBroadcaster")
            .field("observers", &self.observers.len())
            .finish()
    }
}
