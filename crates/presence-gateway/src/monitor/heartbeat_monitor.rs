//! Heartbeat monitor
//!
//! A background task that sweeps the presence store every `sweep_interval`
//! and removes connections silent for longer than `heartbeat_timeout`. The
//! store reports each resulting offline transition to its listener.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use presence_core::{PresenceStore, UserId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Periodic stale-connection sweeper
pub struct HeartbeatMonitor {
    store: Arc<PresenceStore>,
    sweep_interval: Duration,
    heartbeat_timeout: Duration,
    /// Shutdown handle of the current run; each `start` gets a fresh one
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
}

impl HeartbeatMonitor {
    /// Create a monitor; it does nothing until `start` is called
    pub fn new(
        store: Arc<PresenceStore>,
        sweep_interval: Duration,
        heartbeat_timeout: Duration,
    ) -> Self {
        Self {
            store,
            sweep_interval,
            heartbeat_timeout,
            shutdown: Mutex::new(None),
        }
    }

    /// Run one sweep at `now`.
    ///
    /// Returns the users that went offline, in the order they were expired.
    pub fn sweep(&self, now: DateTime<Utc>) -> Vec<UserId> {
        let timeout = chrono::Duration::milliseconds(
            i64::try_from(self.heartbeat_timeout.as_millis()).unwrap_or(i64::MAX),
        );
        let Some(cutoff) = now.checked_sub_signed(timeout) else {
            return Vec::new();
        };

        let mut offline = Vec::new();
        for connection_id in self.store.expired_before(cutoff) {
            // Re-checked under the store lock; a heartbeat since the scan wins
            if let Some(user_id) = self.store.expire(connection_id, cutoff, now) {
                tracing::info!(
                    connection_id = %connection_id,
                    user_id = %user_id,
                    "Connection expired, user offline"
                );
                offline.push(user_id);
            } else {
                tracing::debug!(connection_id = %connection_id, "Stale connection expired");
            }
        }

        offline
    }

    /// Start the periodic sweep.
    ///
    /// Returns `None` if the monitor is already running. A stopped monitor
    /// can be started again.
    pub fn start(self: Arc<Self>) -> Option<JoinHandle<()>> {
        let mut shutdown = self.shutdown.lock();
        if shutdown.as_ref().is_some_and(|tx| !tx.is_closed()) {
            tracing::warn!("Heartbeat monitor is already running");
            return None;
        }

        let (tx, rx) = oneshot::channel();
        *shutdown = Some(tx);

        let monitor = self.clone();
        let handle = tokio::spawn(async move {
            monitor.run(rx).await;
        });

        tracing::info!(
            sweep_interval_ms = self.sweep_interval.as_millis() as u64,
            heartbeat_timeout_ms = self.heartbeat_timeout.as_millis() as u64,
            "Heartbeat monitor started"
        );

        Some(handle)
    }

    async fn run(&self, mut shutdown: oneshot::Receiver<()>) {
        let mut ticker = interval(self.sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep(Utc::now());
                }
                _ = &mut shutdown => break,
            }
        }

        tracing::info!("Heartbeat monitor stopped");
    }

    /// Stop the periodic sweep
    pub fn stop(&self) {
        // Dropping the sender ends the run it belongs to
        self.shutdown.lock().take();
    }

    /// Whether the sweep task is running
    pub fn is_running(&self) -> bool {
        self.shutdown
            .lock()
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }
}

impl Drop for HeartbeatMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for HeartbeatMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeartbeatMonitor")
            .field("sweep_interval", &self.sweep_interval)
            .field("heartbeat_timeout", &self.heartbeat_timeout)
            .field("running", &self.is_running())
            .finish()
    }
}
