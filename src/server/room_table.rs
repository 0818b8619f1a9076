use std::time::Instant;

use arrayvec::ArrayVec;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::protocol::{ConnectionId, RoomId, ROOM_CAPACITY};

use super::RoomError;

/// Members of one room in join order. The first entry is the creator.
pub(crate) type Members = ArrayVec<ConnectionId, ROOM_CAPACITY>;

#[derive(Debug)]
pub(crate) struct Room {
    members: Members,
    created_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum JoinOutcome {
    /// Joiner appended; `peers` were already in the room.
    Joined { peers: Members },
    /// Joiner was already a member; nothing changed.
    AlreadyMember,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct LeaveOutcome {
    pub remaining: Members,
    pub room_deleted: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum RelayRoute {
    Forward(Members),
    NotMember,
    NoRoom,
}

/// Room identifier to members.
///
/// Every check-and-mutate runs under the shard lock of its room, so two
/// operations on the same room serialize while distinct rooms proceed in
/// parallel. A room never exists with zero members.
///
/// The `admit`/`notify` callbacks run while that lock is held, which keeps the
/// events they enqueue in the same order as the membership changes. They must
/// not touch the room table.
pub(crate) struct RoomTable {
    rooms: DashMap<RoomId, Room>,
}

impl RoomTable {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// Insert a room whose only member is `creator`.
    ///
    /// Returns `Ok(None)` when `admit` refuses, in which case nothing is inserted.
    pub fn create<T>(
        &self,
        room_id: &RoomId,
        creator: ConnectionId,
        admit: impl FnOnce() -> Option<T>,
    ) -> Result<Option<T>, RoomError> {
        match self.rooms.entry(room_id.clone()) {
            Entry::Occupied(_) => Err(RoomError::AlreadyExists),
            Entry::Vacant(entry) => {
                let Some(admitted) = admit() else {
                    return Ok(None);
                };
                let mut members = Members::new();
                members.push(creator);
                entry.insert(Room {
                    members,
                    created_at: Instant::now(),
                });
                Ok(Some(admitted))
            }
        }
    }

    /// Append `joiner` to an existing room.
    ///
    /// Returns `Ok(None)` when `admit` refuses, in which case the append is undone.
    pub fn join<T>(
        &self,
        room_id: &RoomId,
        joiner: ConnectionId,
        admit: impl FnOnce(&JoinOutcome) -> Option<T>,
    ) -> Result<Option<T>, RoomError> {
        let Some(mut room) = self.rooms.get_mut(room_id) else {
            return Err(RoomError::NotFound);
        };

        if room.members.contains(&joiner) {
            return Ok(admit(&JoinOutcome::AlreadyMember));
        }

        let peers = room.members.clone();
        room.members
            .try_push(joiner)
            .map_err(|_| RoomError::Full)?;

        let admitted = admit(&JoinOutcome::Joined { peers });
        if admitted.is_none() {
            room.members.pop();
        }
        Ok(admitted)
    }

    /// Remove `member` from `room_id`, deleting the room once it is empty.
    /// Returns `None` when the room is absent or `member` is not in it.
    pub fn leave(
        &self,
        room_id: &RoomId,
        member: ConnectionId,
        notify: impl FnOnce(&LeaveOutcome),
    ) -> Option<LeaveOutcome> {
        let Entry::Occupied(mut entry) = self.rooms.entry(room_id.clone()) else {
            return None;
        };

        let remaining = {
            let room = entry.get_mut();
            let position = room.members.iter().position(|id| *id == member)?;
            room.members.remove(position);
            room.members.clone()
        };

        let outcome = LeaveOutcome {
            room_deleted: remaining.is_empty(),
            remaining,
        };
        notify(&outcome);

        if outcome.room_deleted {
            let room = entry.remove();
            tracing::debug!(
                %room_id,
                lifetime_ms = room.created_at.elapsed().as_millis() as u64,
                "Room deleted"
            );
        }

        Some(outcome)
    }

    /// Members that should receive a relay from `sender`.
    pub fn relay_route(
        &self,
        room_id: &RoomId,
        sender: ConnectionId,
        require_membership: bool,
    ) -> RelayRoute {
        let Some(room) = self.rooms.get(room_id) else {
            return RelayRoute::NoRoom;
        };
        if require_membership && !room.members.contains(&sender) {
            return RelayRoute::NotMember;
        }
        RelayRoute::Forward(
            room.members
                .iter()
                .copied()
                .filter(|id| *id != sender)
                .collect(),
        )
    }

    pub fn members(&self, room_id: &RoomId) -> Option<Members> {
        self.rooms.get(room_id).map(|room| room.members.clone())
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> Vec<(RoomId, Members)> {
        self.rooms
            .iter()
            .map(|entry| (entry.key().clone(), entry.members.clone()))
            .collect()
    }
}
