use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error_codes::ErrorCode;
use super::types::{RelayKind, RoomId};

/// Events sent from a browser peer to the relay.
///
/// Wire form is `{"type": "<event>", "data": <payload>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Create a room under a client-chosen identifier and become its first member
    CreateRoom(RoomId),
    /// Join an existing room as its second member
    JoinRoom(RoomId),
    /// Leave a room explicitly
    LeaveRoom(RoomId),
    /// Session description offer for the other peer
    Offer {
        #[serde(rename = "roomId")]
        room_id: RoomId,
        offer: Value,
    },
    /// Session description answer for the other peer
    Answer {
        #[serde(rename = "roomId")]
        room_id: RoomId,
        answer: Value,
    },
    /// Network candidate for the other peer
    IceCandidate {
        #[serde(rename = "roomId")]
        room_id: RoomId,
        candidate: Value,
    },
}

impl ClientMessage {
    /// Every inbound event name the relay understands.
    pub const EVENT_NAMES: [&'static str; 6] = [
        "create-room",
        "join-room",
        "leave-room",
        "offer",
        "answer",
        "ice-candidate",
    ];

    pub fn event_name(&self) -> &'static str {
        match self {
            Self::CreateRoom(_) => "create-room",
            Self::JoinRoom(_) => "join-room",
            Self::LeaveRoom(_) => "leave-room",
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::IceCandidate { .. } => "ice-candidate",
        }
    }

    /// Room the event targets.
    pub fn room_id(&self) -> &RoomId {
        match self {
            Self::CreateRoom(room_id) | Self::JoinRoom(room_id) | Self::LeaveRoom(room_id) => {
                room_id
            }
            Self::Offer { room_id, .. }
            | Self::Answer { room_id, .. }
            | Self::IceCandidate { room_id, .. } => room_id,
        }
    }
}

/// Events pushed from the relay to a browser peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Room created; the requester is its first member
    RoomCreated(RoomId),
    /// Room joined; the requester is its second member
    RoomJoined(RoomId),
    /// A second peer joined your room and expects an offer
    UserConnected,
    /// The other peer left or its transport terminated
    UserDisconnected,
    /// Join rejected because the room already holds two peers
    RoomFull,
    /// Create/join rejected or the event could not be understood
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<ErrorCode>,
    },
    /// Offer relayed verbatim from the other peer
    Offer(Value),
    /// Answer relayed verbatim from the other peer
    Answer(Value),
    /// Candidate relayed verbatim from the other peer
    IceCandidate(Value),
}

impl ServerMessage {
    /// Wraps a forwarded payload in the event matching its kind.
    pub fn relayed(kind: RelayKind, payload: Value) -> Self {
        match kind {
            RelayKind::Offer => Self::Offer(payload),
            RelayKind::Answer => Self::Answer(payload),
            RelayKind::IceCandidate => Self::IceCandidate(payload),
        }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            code: Some(code),
        }
    }
}
