//! # presence-gateway
//!
//! WebSocket gateway for real-time presence: connection registration,
//! heartbeat-based liveness, and status-change fan-out.

pub mod broadcast;
pub mod connection;
pub mod handlers;
pub mod monitor;
pub mod protocol;
pub mod server;

pub use server::{create_app, create_gateway_state, run, run_server, GatewayState};
