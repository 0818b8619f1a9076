// WebSocket module - transport for the signaling coordinator
//
// - handler: WebSocket upgrade handler (entry point)
// - connection: per-connection send/receive loops, keepalive and frame intake
// - sending: event serialization onto the socket
// - routes: HTTP route setup (socket, health, metrics, ICE servers, static bundle)
// - metrics: JSON metrics and ICE server endpoints

mod connection;
mod handler;
mod metrics;
mod routes;
mod sending;

pub use handler::websocket_handler;
pub use metrics::{ice_servers_handler, metrics_handler, MetricsResponse};
pub use routes::create_router;
