//! Default value functions for configuration fields.
//!
//! Used by serde's `#[serde(default = ...)]` attributes across the config types.

use super::logging::LogFormat;

// =============================================================================
// Root Config
// =============================================================================

pub const fn default_port() -> u16 {
    3000
}

pub fn default_environment() -> String {
    "development".to_string()
}

pub fn default_stun_servers() -> Vec<String> {
    vec![
        "stun:stun.l.google.com:19302".to_string(),
        "stun:stun1.l.google.com:19302".to_string(),
    ]
}

// =============================================================================
// Server Defaults
// =============================================================================

pub const fn default_enforce_relay_membership() -> bool {
    true
}

pub const fn default_outbound_queue_capacity() -> usize {
    64
}

pub fn default_static_dir() -> Option<String> {
    Some("public".to_string())
}

// =============================================================================
// Protocol Defaults
// =============================================================================

pub const fn default_max_room_id_length() -> usize {
    crate::protocol::DEFAULT_MAX_ROOM_ID_LENGTH
}

// =============================================================================
// Security Defaults
// =============================================================================

pub fn default_cors_origins() -> String {
    "*".to_string()
}

pub const fn default_max_message_size() -> usize {
    65536 // 64KB; SDP blobs are a few KB
}

pub const fn default_max_connections_per_ip() -> usize {
    32
}

// =============================================================================
// WebSocket Defaults
// =============================================================================

pub const fn default_ping_interval_secs() -> u64 {
    25
}

pub const fn default_idle_timeout_secs() -> u64 {
    60
}

// =============================================================================
// Logging Defaults
// =============================================================================

pub fn default_log_dir() -> String {
    "logs".to_string()
}

pub fn default_log_filename() -> String {
    "relay.log".to_string()
}

pub fn default_rotation() -> String {
    "daily".to_string()
}

pub const fn default_enable_file_logging() -> bool {
    false
}

pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}
