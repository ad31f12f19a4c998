//! Application error types
//!
//! Failures that can stop the gateway process. Presence operations themselves
//! never produce these; they are confined to startup and serving.

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Network errors
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[source] std::io::Error),
}

impl AppError {
    /// Get error code for logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Bind { .. } => "BIND_ERROR",
            Self::Server(_) => "SERVER_ERROR",
        }
    }

    /// Create a bind error for an address
    pub fn bind(addr: impl std::fmt::Display, source: std::io::Error) -> Self {
        Self::Bind {
            addr: addr.to_string(),
            source,
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let config = AppError::from(ConfigError::InvalidValue("GATEWAY_PORT", "x".to_string()));
        assert_eq!(config.error_code(), "CONFIG_ERROR");

        let bind = AppError::bind(
            "127.0.0.1:80",
            std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        );
        assert_eq!(bind.error_code(), "BIND_ERROR");

        let server = AppError::Server(std::io::Error::other("reset"));
        assert_eq!(server.error_code(), "SERVER_ERROR");
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::from(ConfigError::InvalidValue("GATEWAY_PORT", "x".to_string()));
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid value for GATEWAY_PORT: x"
        );

        let bind = AppError::bind(
            "127.0.0.1:80",
            std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        );
        assert_eq!(bind.to_string(), "Failed to bind to 127.0.0.1:80: in use");
    }
}
