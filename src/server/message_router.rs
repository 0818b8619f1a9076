use crate::protocol::{ClientMessage, ConnectionId, RelayKind};

use super::SignalingServer;

impl SignalingServer {
    /// Dispatch one validated client event.
    pub fn handle_client_message(&self, connection_id: &ConnectionId, message: ClientMessage) {
        tracing::trace!(%connection_id, event = message.event_name(), "Handling client event");

        match message {
            ClientMessage::CreateRoom(room_id) => {
                self.handle_create_room(connection_id, room_id);
            }
            ClientMessage::JoinRoom(room_id) => {
                self.handle_join_room(connection_id, room_id);
            }
            ClientMessage::LeaveRoom(room_id) => {
                self.handle_leave_room(connection_id, room_id);
            }
            ClientMessage::Offer { room_id, offer } => {
                self.handle_relay(connection_id, room_id, RelayKind::Offer, offer);
            }
            ClientMessage::Answer { room_id, answer } => {
                self.handle_relay(connection_id, room_id, RelayKind::Answer, answer);
            }
            ClientMessage::IceCandidate { room_id, candidate } => {
                self.handle_relay(connection_id, room_id, RelayKind::IceCandidate, candidate);
            }
        }
    }
}
