#![cfg_attr(not(test), deny(clippy::panic))]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

//! # WebRTC Signal Relay
//!
//! An in-memory WebSocket relay that pairs two browser peers under a shared
//! room identifier and forwards their session offers, answers and network
//! candidates. Media never passes through the relay.
//!
//! No persistence: every room lives only as long as the process and its
//! members do.

/// Server configuration and environment variables
pub mod config;

/// Structured logging configuration
pub mod logging;

/// Metrics collection and reporting
pub mod metrics;

/// WebSocket message protocol definitions
pub mod protocol;

/// Room coordinator: connection registry, room table and signaling router
pub mod server;

/// WebSocket transport and HTTP endpoints
pub mod websocket;
