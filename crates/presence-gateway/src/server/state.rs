//! Gateway state
//!
//! Application state for the gateway server.

use crate::broadcast::PresenceBroadcaster;
use crate::monitor::HeartbeatMonitor;
use presence_common::AppConfig;
use presence_core::PresenceStore;
use std::sync::Arc;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// Live connection registry; reports transitions to `broadcaster`
    store: Arc<PresenceStore>,
    /// Status-change fan-out
    broadcaster: Arc<PresenceBroadcaster>,
    /// Stale-connection sweeper (not started here)
    monitor: Arc<HeartbeatMonitor>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state with an empty store
    pub fn new(config: AppConfig) -> Self {
        let broadcaster = Arc::new(PresenceBroadcaster::new());
        let store = Arc::new(PresenceStore::with_listener(broadcaster.clone()));
        let monitor = Arc::new(HeartbeatMonitor::new(
            store.clone(),
            config.presence.sweep_interval,
            config.presence.heartbeat_timeout,
        ));

        Self {
            store,
            broadcaster,
            monitor,
            config: Arc::new(config),
        }
    }

    /// Get the presence store
    pub fn store(&self) -> &PresenceStore {
        &self.store
    }

    /// Get the broadcaster
    pub fn broadcaster(&self) -> &PresenceBroadcaster {
        &self.broadcaster
    }

    /// Get the heartbeat monitor
    pub fn monitor(&self) -> &Arc<HeartbeatMonitor> {
        &self.monitor
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("store", &self.store)
            .field("broadcaster", &self.broadcaster)
            .field("monitor", &self.monitor)
            .field("config", &"AppConfig")
            .finish()
    }
}
