//! Configuration module for the relay.
//!
//! Configuration is assembled from:
//! - Compiled-in defaults
//! - JSON configuration files
//! - Environment variable overrides
//!
//! # Module Structure
//!
//! - [`crate::config::types`]: Root `Config` struct
//! - [`server`]: Coordinator behavior (relay membership policy, queues, static bundle)
//! - [`protocol`]: Inbound event limits
//! - [`security`]: CORS and transport limits
//! - [`websocket`]: Keepalive settings
//! - [`logging`]: Logging configuration
//! - [`crate::config::loader`]: Configuration loading functions
//! - [`crate::config::validation`]: Configuration validation functions
//! - [`crate::config::defaults`]: Default value functions

pub mod defaults;
pub mod loader;
pub mod logging;
pub mod protocol;
pub mod security;
pub mod server;
pub mod types;
pub mod validation;
pub mod websocket;

pub use loader::load;

pub use logging::{LogFormat, LogLevel, LoggingConfig};

pub use protocol::ProtocolConfig;

pub use security::SecurityConfig;

pub use server::ServerConfig;

pub use types::Config;

pub use validation::validate_config;

pub use websocket::WebSocketConfig;
