use super::room_table::RelayRoute;
use super::SignalingServer;
use crate::protocol::{ConnectionId, RelayKind, RoomId, ServerMessage};
use serde_json::Value;
use std::sync::Arc;

impl SignalingServer {
    /// Forward a negotiation payload, unmodified, to every other member of
    /// `room_id`. Best effort: nothing is reported back to the sender.
    pub fn handle_relay(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        kind: RelayKind,
        payload: Value,
    ) {
        let route = self.room_table.relay_route(
            &room_id,
            *connection_id,
            self.config.enforce_relay_membership,
        );

        match route {
            RelayRoute::Forward(targets) if !targets.is_empty() => {
                let message = Arc::new(ServerMessage::relayed(kind, payload));
                for target in &targets {
                    if self.send_to_connection(target, Arc::clone(&message)) {
                        self.metrics.increment_relays_forwarded();
                    }
                }
                tracing::trace!(%connection_id, %room_id, %kind, targets = targets.len(), "Relayed");
            }
            RelayRoute::Forward(_) | RelayRoute::NoRoom => {
                self.metrics.increment_relays_without_peer();
                tracing::debug!(%connection_id, %room_id, %kind, "No peer to relay to, dropping");
            }
            RelayRoute::NotMember => {
                self.metrics.increment_relays_rejected_non_member();
                tracing::warn!(
                    %connection_id,
                    %room_id,
                    %kind,
                    "Relay from a connection outside the room, dropping"
                );
            }
        }
    }
}
