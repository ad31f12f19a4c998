//! Domain entities

mod connection;
mod presence;

pub use connection::{Connection, Registration};
pub use presence::{OnlineUser, StatusChange, UserStatus};
