//! Outbound queue of one WebSocket

use crate::protocol::PresenceMessage;
use presence_core::ConnectionId;
use tokio::sync::mpsc;

/// Sending half of a connection's bounded outbound queue
#[derive(Debug, Clone)]
pub struct Observer {
    id: ConnectionId,
    sender: mpsc::Sender<PresenceMessage>,
}

impl Observer {
    /// Create an observer and the receiver its send task drains
    pub fn channel(id: ConnectionId, buffer: usize) -> (Self, mpsc::Receiver<PresenceMessage>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (Self { id, sender }, receiver)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Enqueue without waiting
    pub fn try_send(
        &self,
        message: PresenceMessage,
    ) -> Result<(), mpsc::error::TrySendError<PresenceMessage>> {
        self.sender.try_send(message)
    }
}
