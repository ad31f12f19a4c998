//! Per-transport session state
//!
//! Tracks what the gateway knows about one WebSocket beyond the presence store.

mod connection;

pub use connection::ClientConnection;
