//! Handler error types

use crate::protocol::EventName;
use presence_core::{DomainError, UserId};
use thiserror::Error;

/// Handler error type
///
/// None of these close the socket; the connection loop logs and discards them.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Invalid payload received
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Server-only event sent by a client
    #[error("Unexpected event from client: {0}")]
    UnexpectedEvent(EventName),

    /// Event names a different user than the one registered on this transport
    #[error("User mismatch: connection registered as {expected}, event names {got}")]
    UserMismatch { expected: UserId, got: UserId },

    /// Domain error (from the presence store)
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl HandlerError {
    /// Short code for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "INVALID_PAYLOAD",
            Self::UnexpectedEvent(_) => "UNEXPECTED_EVENT",
            Self::UserMismatch { .. } => "USER_MISMATCH",
            Self::Domain(e) => e.code(),
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
