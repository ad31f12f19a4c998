//! Connection identifier
//!
//! Assigned when a transport connection is accepted. Random v4 UUIDs keep ids
//! unique for the lifetime of the process.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque, process-unique identifier of one transport session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh connection ID
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    #[inline]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Result<Self, ConnectionIdParseError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ConnectionIdParseError::InvalidFormat)
    }
}

/// Error when parsing a ConnectionId from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionIdParseError {
    #[error("invalid connection id format")]
    InvalidFormat,
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ConnectionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for ConnectionId {
    type Err = ConnectionIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConnectionId::parse(s)
    }
}
