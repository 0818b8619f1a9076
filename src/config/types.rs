//! Root configuration types.

use super::defaults::{default_environment, default_port, default_stun_servers};
use super::logging::LoggingConfig;
use super::protocol::ProtocolConfig;
use super::security::SecurityConfig;
use super::server::ServerConfig;
use super::websocket::WebSocketConfig;
use serde::{Deserialize, Serialize};

/// Root configuration struct for the relay.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Deployment designation, e.g. "development" or "production"
    #[serde(default = "default_environment")]
    pub environment: String,
    /// STUN URLs handed to clients; never interpreted by the relay itself
    #[serde(default = "default_stun_servers")]
    pub stun_servers: Vec<String>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub protocol: ProtocolConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub websocket: WebSocketConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            environment: default_environment(),
            stun_servers: default_stun_servers(),
            server: ServerConfig::default(),
            protocol: ProtocolConfig::default(),
            security: SecurityConfig::default(),
            websocket: WebSocketConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    pub fn is_production(&self) -> bool {
        matches!(
            self.environment.trim().to_ascii_lowercase().as_str(),
            "production" | "prod"
        )
    }
}
