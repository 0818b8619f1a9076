use super::room_table::JoinOutcome;
use super::{RoomError, SignalingServer};
use crate::protocol::{ConnectionId, RoomId, ServerMessage};
use std::sync::Arc;

impl SignalingServer {
    /// Create `room_id` with the requester as its only member.
    pub fn handle_create_room(&self, connection_id: &ConnectionId, room_id: RoomId) {
        let room_create_span = tracing::info_span!(
            "room.create",
            connection_id = %connection_id,
            room_id = %room_id
        );
        let _span_guard = room_create_span.enter();

        let created = self.room_table.create(&room_id, *connection_id, || {
            let previous = self.associate_connection(connection_id, &room_id)?;
            self.metrics.increment_rooms_created();
            self.send_to_connection(
                connection_id,
                Arc::new(ServerMessage::RoomCreated(room_id.clone())),
            );
            Some(previous)
        });

        match created {
            Ok(Some(previous)) => {
                tracing::info!("Room created");
                self.leave_previous_room(connection_id, previous, &room_id);
            }
            Ok(None) => {
                tracing::debug!("Connection unregistered before room creation completed");
            }
            Err(error) => {
                self.metrics.increment_room_create_conflicts();
                tracing::info!(%error, "Room creation rejected");
                self.send_room_error(connection_id, error);
            }
        }
    }

    /// Join an existing room as its second member.
    ///
    /// The requester gets `room-joined`; the member already present gets
    /// `user-connected`. Re-joining a room the requester is already in only
    /// repeats the acknowledgment.
    pub fn handle_join_room(&self, connection_id: &ConnectionId, room_id: RoomId) {
        let room_join_span = tracing::info_span!(
            "room.join",
            connection_id = %connection_id,
            room_id = %room_id
        );
        let _span_guard = room_join_span.enter();

        let joined = self.room_table.join(&room_id, *connection_id, |outcome| {
            let previous = self.associate_connection(connection_id, &room_id)?;
            self.send_to_connection(
                connection_id,
                Arc::new(ServerMessage::RoomJoined(room_id.clone())),
            );
            if let JoinOutcome::Joined { peers } = outcome {
                self.metrics.increment_rooms_joined();
                let notice = Arc::new(ServerMessage::UserConnected);
                for peer in peers {
                    self.send_to_connection(peer, Arc::clone(&notice));
                }
            }
            Some(previous)
        });

        match joined {
            Ok(Some(previous)) => {
                tracing::info!("Room joined");
                self.leave_previous_room(connection_id, previous, &room_id);
            }
            Ok(None) => {
                tracing::debug!("Connection unregistered before room join completed");
            }
            Err(error) => {
                match error {
                    RoomError::Full => self.metrics.increment_room_join_full(),
                    RoomError::NotFound => self.metrics.increment_room_join_not_found(),
                    RoomError::AlreadyExists => {}
                }
                tracing::info!(%error, "Room join rejected");
                self.send_room_error(connection_id, error);
            }
        }
    }

    /// Explicit leave. Naming a room the connection is not in changes nothing.
    pub fn handle_leave_room(&self, connection_id: &ConnectionId, room_id: RoomId) {
        if !self.depart_room(connection_id, &room_id) {
            tracing::debug!(%connection_id, %room_id, "Leave ignored, connection is not a member");
        }
        self.connection_manager
            .clear_association_if(connection_id, &room_id);
    }

    /// Remove the connection from `room_id` and tell the remaining member.
    /// Returns whether the connection was a member.
    pub(crate) fn depart_room(&self, connection_id: &ConnectionId, room_id: &RoomId) -> bool {
        let outcome = self.room_table.leave(room_id, *connection_id, |outcome| {
            self.metrics.increment_peers_left();
            if outcome.room_deleted {
                self.metrics.increment_rooms_deleted();
            }
            let notice = Arc::new(ServerMessage::UserDisconnected);
            for peer in &outcome.remaining {
                self.send_to_connection(peer, Arc::clone(&notice));
            }
        });

        match outcome {
            Some(outcome) => {
                tracing::info!(
                    %connection_id,
                    %room_id,
                    room_deleted = outcome.room_deleted,
                    "Connection left room"
                );
                true
            }
            None => false,
        }
    }

    /// Association step shared by create and join. `None` means the
    /// connection is already gone and the membership must not stick.
    fn associate_connection(
        &self,
        connection_id: &ConnectionId,
        room_id: &RoomId,
    ) -> Option<Option<RoomId>> {
        match self.connection_manager.associate(connection_id, room_id.clone()) {
            Ok(previous) => Some(previous),
            Err(err) => {
                tracing::debug!(%err, "Rolling back room membership");
                None
            }
        }
    }

    fn leave_previous_room(
        &self,
        connection_id: &ConnectionId,
        previous: Option<RoomId>,
        current: &RoomId,
    ) {
        if let Some(previous) = previous.filter(|previous| previous != current) {
            tracing::info!(
                %connection_id,
                previous_room_id = %previous,
                "Leaving previous room after switching"
            );
            self.depart_room(connection_id, &previous);
        }
    }
}
