use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes attached to `error` events so clients can branch without
/// parsing the human-readable message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Room lifecycle
    RoomAlreadyExists,
    RoomNotFound,
    RoomFull,

    // Validation
    InvalidRoomId,
    InvalidMessage,
    MessageTooLarge,

    // Transport limits
    TooManyConnections,
}

impl ErrorCode {
    /// Returns a human-readable description of this error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::RoomAlreadyExists => {
                "A room with this identifier already exists. Pick another identifier or join it."
            }
            Self::RoomNotFound => "No room exists with this identifier. Check the code or create it.",
            Self::RoomFull => "The room already has two participants.",
            Self::InvalidRoomId => "The room identifier is empty or too long.",
            Self::InvalidMessage => "The event payload does not match the expected shape.",
            Self::MessageTooLarge => "The message exceeds the maximum allowed size.",
            Self::TooManyConnections => "Too many simultaneous connections from this address.",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RoomAlreadyExists => "ROOM_ALREADY_EXISTS",
            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::RoomFull => "ROOM_FULL",
            Self::InvalidRoomId => "INVALID_ROOM_ID",
            Self::InvalidMessage => "INVALID_MESSAGE",
            Self::MessageTooLarge => "MESSAGE_TOO_LARGE",
            Self::TooManyConnections => "TOO_MANY_CONNECTIONS",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
