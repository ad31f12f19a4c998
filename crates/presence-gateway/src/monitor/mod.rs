//! Heartbeat-based liveness
//!
//! Periodically expires connections that stopped sending heartbeats.

mod heartbeat_monitor;

pub use heartbeat_monitor::HeartbeatMonitor;
