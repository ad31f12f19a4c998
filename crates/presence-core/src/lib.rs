//! # presence-core
//!
//! Domain layer for presence tracking: identifiers, connection entities,
//! status transitions, and the in-memory `PresenceStore`.
//! This crate has zero dependencies on infrastructure (web framework, runtime, etc.).

pub mod entities;
pub mod error;
pub mod store;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Connection, OnlineUser, Registration, StatusChange, UserStatus};
pub use error::{DomainError, DomainResult};
pub use store::{PresenceStore, RegisterOutcome, StatusListener};
pub use value_objects::{ConnectionId, ConnectionIdParseError, UserId};
