//! Domain errors - error types for the presence domain

use thiserror::Error;

use crate::value_objects::ConnectionId;

/// Domain layer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The connection was never registered or has already been removed
    #[error("Connection not found: {0}")]
    ConnectionNotFound(ConnectionId),
}

impl DomainError {
    /// Get an error code string for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConnectionNotFound(_) => "UNKNOWN_CONNECTION",
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ConnectionNotFound(_))
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
