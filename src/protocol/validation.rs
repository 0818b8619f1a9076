use crate::config::ProtocolConfig;
use serde_json::Value;
use thiserror::Error;

use super::error_codes::ErrorCode;
use super::messages::ClientMessage;
use super::types::RoomId;

/// Reasons an inbound text frame did not become a [`ClientMessage`].
#[derive(Debug, Error)]
pub enum MessageParseError {
    #[error("frame is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("frame has no string `type` field")]
    MissingEventType,
    #[error("unknown event `{0}`")]
    UnknownEvent(String),
    #[error("malformed `{event}` payload: {source}")]
    MalformedPayload {
        event: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid room identifier: {0}")]
    InvalidRoomId(String),
}

impl MessageParseError {
    /// Frames that match no recognized event are dropped without a reply.
    pub fn should_reply(&self) -> bool {
        matches!(
            self,
            Self::MalformedPayload { .. } | Self::InvalidRoomId(_)
        )
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidRoomId(_) => ErrorCode::InvalidRoomId,
            _ => ErrorCode::InvalidMessage,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidRoomId(reason) => reason.clone(),
            Self::MalformedPayload { event, .. } => format!("Malformed `{event}` event"),
            other => other.to_string(),
        }
    }
}

/// Parses and validates one inbound frame.
pub fn parse_client_message(
    raw_text: &str,
    config: &ProtocolConfig,
) -> Result<ClientMessage, MessageParseError> {
    let value: Value = serde_json::from_str(raw_text).map_err(MessageParseError::InvalidJson)?;
    let event = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(MessageParseError::MissingEventType)?;

    if !ClientMessage::EVENT_NAMES.contains(&event) {
        return Err(MessageParseError::UnknownEvent(event.to_string()));
    }
    let event = event.to_string();

    let message: ClientMessage = serde_json::from_value(value)
        .map_err(|source| MessageParseError::MalformedPayload { event, source })?;

    validate_room_id_with_config(message.room_id(), config)
        .map_err(MessageParseError::InvalidRoomId)?;

    Ok(message)
}

pub fn validate_room_id_with_config(room_id: &RoomId, config: &ProtocolConfig) -> Result<(), String> {
    if room_id.is_empty() {
        return Err("Room ID cannot be empty".to_string());
    }
    if room_id.len() > config.max_room_id_length {
        return Err(format!(
            "Room ID too long (max {} bytes)",
            config.max_room_id_length
        ));
    }
    Ok(())
}
