//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub gateway: ServerConfig,
    pub presence: PresenceConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Server bind configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Liveness policy for presence tracking
///
/// The default timeout (45s) sits above the client's reconnection envelope of
/// 5 attempts at 1-second spacing, so a transient reconnect does not expire
/// the user. Both values are tunable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceConfig {
    /// How often the heartbeat monitor sweeps for stale connections
    pub sweep_interval: Duration,
    /// How long a connection may go without a heartbeat before it expires
    pub heartbeat_timeout: Duration,
    /// Outbound queue bound per observer; a full queue drops the observer
    pub observer_buffer: usize,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(default_sweep_interval_secs()),
            heartbeat_timeout: Duration::from_secs(default_heartbeat_timeout_secs()),
            observer_buffer: default_observer_buffer(),
        }
    }
}

impl PresenceConfig {
    /// Check the policy is internally consistent.
    ///
    /// The sweep interval must be strictly below the timeout so an expired
    /// connection is detected at most one interval late.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep_interval.is_zero() {
            return Err(ConfigError::InvalidValue(
                "PRESENCE_SWEEP_INTERVAL_SECS",
                "must be greater than zero".to_string(),
            ));
        }
        if self.heartbeat_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "PRESENCE_HEARTBEAT_TIMEOUT_SECS",
                "must be greater than zero".to_string(),
            ));
        }
        if self.sweep_interval >= self.heartbeat_timeout {
            return Err(ConfigError::InvalidValue(
                "PRESENCE_SWEEP_INTERVAL_SECS",
                format!(
                    "sweep interval ({}s) must be smaller than heartbeat timeout ({}s)",
                    self.sweep_interval.as_secs_f64(),
                    self.heartbeat_timeout.as_secs_f64()
                ),
            ));
        }
        if self.observer_buffer == 0 {
            return Err(ConfigError::InvalidValue(
                "PRESENCE_OBSERVER_BUFFER",
                "must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Heartbeat interval advertised to clients: a third of the timeout,
    /// so two heartbeats may be lost before expiry.
    #[must_use]
    pub fn client_heartbeat_interval(&self) -> Duration {
        self.heartbeat_timeout / 3
    }
}

// Default value functions
fn default_app_name() -> String {
    "presence-gateway".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_sweep_interval_secs() -> u64 {
    15
}

fn default_heartbeat_timeout_secs() -> u64 {
    45
}

fn default_observer_buffer() -> usize {
    64
}

/// Parse an optional variable, failing on values that are present but malformed
fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is malformed or the presence policy is inconsistent
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let presence = PresenceConfig {
            sweep_interval: Duration::from_secs(
                parse_var(&lookup, "PRESENCE_SWEEP_INTERVAL_SECS")?
                    .unwrap_or_else(default_sweep_interval_secs),
            ),
            heartbeat_timeout: Duration::from_secs(
                parse_var(&lookup, "PRESENCE_HEARTBEAT_TIMEOUT_SECS")?
                    .unwrap_or_else(default_heartbeat_timeout_secs),
            ),
            observer_buffer: parse_var(&lookup, "PRESENCE_OBSERVER_BUFFER")?
                .unwrap_or_else(default_observer_buffer),
        };
        presence.validate()?;

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .as_deref()
                    .and_then(Environment::parse)
                    .unwrap_or_default(),
            },
            gateway: ServerConfig {
                host: lookup("GATEWAY_HOST").unwrap_or_else(default_host),
                port: parse_var(&lookup, "GATEWAY_PORT")?.unwrap_or_else(default_port),
            },
            presence,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::default(),
            },
            gateway: ServerConfig::default(),
            presence: PresenceConfig::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
