//! Presence storage

mod presence_store;

pub use presence_store::{PresenceStore, RegisterOutcome, StatusListener};
