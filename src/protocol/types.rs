use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Default upper bound for client-supplied room identifiers (bytes).
pub const DEFAULT_MAX_ROOM_ID_LENGTH: usize = 64;

/// Maximum number of peers a room can hold.
pub const ROOM_CAPACITY: usize = 2;

/// Server-assigned identifier for one live transport session.
pub type ConnectionId = Uuid;

/// Client-supplied room token. Opaque and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Kind of negotiation payload forwarded between the two peers of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelayKind {
    Offer,
    Answer,
    IceCandidate,
}

impl RelayKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::Answer => "answer",
            Self::IceCandidate => "ice-candidate",
        }
    }
}

impl fmt::Display for RelayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of an `RTCConfiguration.iceServers` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServer {
    pub urls: Vec<String>,
}

/// Pass-through STUN configuration handed to browser clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceServersPayload {
    pub ice_servers: Vec<IceServer>,
}

impl IceServersPayload {
    /// Builds one `IceServer` entry per configured URL, matching what browsers
    /// expect when the list is passed straight into `RTCPeerConnection`.
    pub fn from_urls(urls: &[String]) -> Self {
        Self {
            ice_servers: urls
                .iter()
                .map(|url| IceServer {
                    urls: vec![url.clone()],
                })
                .collect(),
        }
    }
}
