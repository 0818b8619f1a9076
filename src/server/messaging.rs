use super::{RoomError, SignalingServer};
use crate::protocol::{ConnectionId, ErrorCode, ServerMessage};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;

impl SignalingServer {
    /// Queue an event for one connection without waiting.
    ///
    /// Returns whether the event was queued. A full or closed queue drops the
    /// event; the failure is never surfaced to whoever triggered it.
    pub(crate) fn send_to_connection(
        &self,
        connection_id: &ConnectionId,
        message: Arc<ServerMessage>,
    ) -> bool {
        let Some(sender) = self.connection_manager.sender(connection_id) else {
            tracing::debug!(%connection_id, "Connection not registered, event not sent");
            return false;
        };

        match sender.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.metrics.increment_messages_dropped();
                tracing::warn!(%connection_id, "Outbound queue full, dropping event");
                false
            }
            Err(TrySendError::Closed(_)) => {
                self.metrics.increment_messages_dropped();
                tracing::debug!(%connection_id, "Outbound queue closed, dropping event");
                false
            }
        }
    }

    /// Send an error event to a specific connection.
    pub fn send_error_to_connection(
        &self,
        connection_id: &ConnectionId,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> bool {
        self.send_to_connection(connection_id, Arc::new(ServerMessage::error(code, message)))
    }

    pub(crate) fn send_room_error(&self, connection_id: &ConnectionId, error: RoomError) -> bool {
        self.send_to_connection(connection_id, Arc::new(error.to_server_message()))
    }
}
