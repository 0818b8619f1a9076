use crate::metrics::MetricsSnapshot;
use crate::protocol::IceServersPayload;
use crate::server::SignalingServer;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub rooms: usize,
    pub connections: usize,
    #[serde(flatten)]
    pub counters: MetricsSnapshot,
}

/// Counter snapshot plus live table sizes
pub async fn metrics_handler(State(server): State<Arc<SignalingServer>>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        timestamp: chrono::Utc::now(),
        rooms: server.room_count(),
        connections: server.connection_count(),
        counters: server.metrics().snapshot(),
    })
}

/// RTCConfiguration for browser peers, built from the configured STUN servers
pub async fn ice_servers_handler(
    State(server): State<Arc<SignalingServer>>,
) -> Json<IceServersPayload> {
    Json(server.ice_servers().clone())
}
