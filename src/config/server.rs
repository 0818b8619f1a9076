//! Server behavior configuration types.

use super::defaults::{
    default_enforce_relay_membership, default_outbound_queue_capacity, default_static_dir,
};
use serde::{Deserialize, Serialize};

/// Coordinator and HTTP surface behavior.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Drop relays whose sender is not a member of the room it names.
    /// `false` restores the looser forward-to-everyone-else behavior.
    #[serde(default = "default_enforce_relay_membership")]
    pub enforce_relay_membership: bool,
    /// Per-connection outbound queue depth before events are dropped
    #[serde(default = "default_outbound_queue_capacity")]
    pub outbound_queue_capacity: usize,
    /// Directory holding the browser client bundle; `null` disables static serving
    #[serde(default = "default_static_dir")]
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enforce_relay_membership: default_enforce_relay_membership(),
            outbound_queue_capacity: default_outbound_queue_capacity(),
            static_dir: default_static_dir(),
        }
    }
}
