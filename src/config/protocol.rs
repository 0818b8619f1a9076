//! Protocol limits applied to inbound events.

use super::defaults::default_max_room_id_length;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// Longest accepted room identifier, in bytes
    #[serde(default = "default_max_room_id_length")]
    pub max_room_id_length: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            max_room_id_length: default_max_room_id_length(),
        }
    }
}
