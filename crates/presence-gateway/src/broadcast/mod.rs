//! Status-change fan-out
//!
//! Delivers presence events to every attached WebSocket without letting a
//! slow client stall the others.

mod broadcaster;
mod observer;

pub use broadcaster::PresenceBroadcaster;
pub use observer::Observer;
