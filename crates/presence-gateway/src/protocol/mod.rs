//! Gateway protocol definitions
//!
//! Defines the event names, the JSON envelope, and the payload shapes
//! exchanged over the presence WebSocket.

mod events;
mod messages;
mod payloads;

pub use events::EventName;
pub use messages::PresenceMessage;
pub use payloads::{HelloPayload, UserHeartbeatPayload, UserOfflinePayload, UserOnlinePayload};
