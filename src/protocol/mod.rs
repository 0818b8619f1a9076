// Protocol module: wire events, error codes, and inbound validation

pub mod error_codes;
pub mod messages;
pub mod types;
pub mod validation;

pub use error_codes::ErrorCode;

pub use types::{
    ConnectionId, IceServer, IceServersPayload, RelayKind, RoomId, DEFAULT_MAX_ROOM_ID_LENGTH,
    ROOM_CAPACITY,
};

pub use messages::{ClientMessage, ServerMessage};

pub use validation::{parse_client_message, validate_room_id_with_config, MessageParseError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ice_servers_payload_matches_rtc_configuration_shape() {
        let payload = IceServersPayload::from_urls(&[
            "stun:stun.l.google.com:19302".to_string(),
            "stun:stun1.l.google.com:19302".to_string(),
        ]);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "iceServers": [
                    {"urls": ["stun:stun.l.google.com:19302"]},
                    {"urls": ["stun:stun1.l.google.com:19302"]}
                ]
            })
        );
    }

    #[test]
    fn room_id_round_trips_as_plain_string() {
        let room_id = RoomId::from("ABC123");
        assert_eq!(serde_json::to_string(&room_id).unwrap(), "\"ABC123\"");
        assert_eq!(room_id.to_string(), "ABC123");
    }

    #[test]
    fn relay_kind_names_match_event_names() {
        for kind in [RelayKind::Offer, RelayKind::Answer, RelayKind::IceCandidate] {
            assert!(ClientMessage::EVENT_NAMES.contains(&kind.as_str()));
        }
    }
}
