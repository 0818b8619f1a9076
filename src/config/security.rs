//! Transport-facing limits and CORS policy.

use super::defaults::{
    default_cors_origins, default_max_connections_per_ip, default_max_message_size,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SecurityConfig {
    /// Allowed CORS origins: "*" or a comma-separated list
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
    /// Largest accepted inbound text frame (bytes)
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
    /// Simultaneous WebSocket connections allowed per client IP
    #[serde(default = "default_max_connections_per_ip")]
    pub max_connections_per_ip: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            cors_origins: default_cors_origins(),
            max_message_size: default_max_message_size(),
            max_connections_per_ip: default_max_connections_per_ip(),
        }
    }
}
