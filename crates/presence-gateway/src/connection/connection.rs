//! Individual WebSocket connection
//!
//! Holds the last `userOnline` registration seen on this transport so a
//! heartbeat arriving after an expiry can re-register the connection.

use parking_lot::RwLock;
use presence_core::{ConnectionId, Registration, UserId};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A single WebSocket transport
pub struct ClientConnection {
    /// Identifier assigned at upgrade time
    id: ConnectionId,

    /// Last registration received on this transport (None until `userOnline`,
    /// and again after an explicit `userOffline`)
    registration: RwLock<Option<Registration>>,

    /// Connection creation time
    created_at: Instant,
}

impl ClientConnection {
    /// Create a new connection with a fresh identifier
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: ConnectionId::generate(),
            registration: RwLock::new(None),
            created_at: Instant::now(),
        })
    }

    /// Get the connection ID
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Remember the latest registration
    pub fn remember(&self, registration: Registration) {
        *self.registration.write() = Some(registration);
    }

    /// Forget the stored registration
    pub fn forget(&self) -> Option<Registration> {
        self.registration.write().take()
    }

    /// Last registration, if any
    pub fn registration(&self) -> Option<Registration> {
        self.registration.read().clone()
    }

    /// User this transport last registered as
    pub fn user_id(&self) -> Option<UserId> {
        self.registration.read().as_ref().map(|r| r.user_id)
    }

    /// Time since the transport was opened
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

impl std::fmt::Debug for ClientConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConnection")
            .field("id", &self.id)
            .field("user_id", &self.user_id())
            .field("age", &self.age())
            .finish()
    }
}
