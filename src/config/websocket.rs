//! WebSocket configuration types.

use super::defaults::{default_idle_timeout_secs, default_ping_interval_secs};
use serde::{Deserialize, Serialize};

/// WebSocket keepalive configuration.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebSocketConfig {
    /// Interval between server-initiated pings (seconds)
    #[serde(default = "default_ping_interval_secs")]
    pub ping_interval_secs: u64,
    /// Silence after which a connection is treated as terminated (seconds)
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            ping_interval_secs: default_ping_interval_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

impl WebSocketConfig {
    /// Validate WebSocket configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.ping_interval_secs == 0 {
            anyhow::bail!("websocket.ping_interval_secs must be at least 1 second");
        }
        if self.idle_timeout_secs <= self.ping_interval_secs {
            anyhow::bail!(
                "websocket.idle_timeout_secs ({}) must exceed websocket.ping_interval_secs ({})",
                self.idle_timeout_secs,
                self.ping_interval_secs
            );
        }
        Ok(())
    }
}
