use crate::config::{Config, ProtocolConfig, WebSocketConfig};
use crate::metrics::ServerMetrics;
use crate::protocol::{ConnectionId, ErrorCode, IceServersPayload, RoomId, ServerMessage};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

mod connection_manager;
mod message_router;
mod messaging;
mod relay;
mod room_service;
#[cfg(test)]
mod room_service_tests;
mod room_table;

use connection_manager::ConnectionManager;
use room_table::RoomTable;

/// In-memory signaling coordinator: Connection Registry, Room Table and the
/// router that mutates them.
pub struct SignalingServer {
    /// Live connections and their room association
    connection_manager: ConnectionManager,
    /// Room identifier to up-to-two members
    room_table: RoomTable,
    /// Runtime behavior
    config: ServerConfig,
    /// Limits applied to inbound events
    protocol_config: ProtocolConfig,
    /// RTCConfiguration handed to browser peers
    ice_servers: IceServersPayload,
    pub(crate) metrics: Arc<ServerMetrics>,
}

#[derive(Debug, Error)]
pub enum RegisterClientError {
    #[error("Too many connections from your IP ({current}/{limit})")]
    IpLimitExceeded { current: usize, limit: usize },
}

impl RegisterClientError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::IpLimitExceeded { .. } => ErrorCode::TooManyConnections,
        }
    }
}

/// Room lifecycle rejections, reported only to the requesting connection.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RoomError {
    #[error("Room already exists")]
    AlreadyExists,
    #[error("Room does not exist")]
    NotFound,
    #[error("Room is full")]
    Full,
}

impl RoomError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::AlreadyExists => ErrorCode::RoomAlreadyExists,
            Self::NotFound => ErrorCode::RoomNotFound,
            Self::Full => ErrorCode::RoomFull,
        }
    }

    /// Outbound event for the requester. A full room has its own event with no
    /// reason attached.
    pub fn to_server_message(&self) -> ServerMessage {
        match self {
            Self::Full => ServerMessage::RoomFull,
            other => ServerMessage::error(other.error_code(), other.to_string()),
        }
    }
}

/// The connection was already unregistered.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("connection {0} is not registered")]
pub struct UnknownConnection(pub ConnectionId);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Drop relays whose sender is not a member of the claimed room.
    pub enforce_relay_membership: bool,
    pub outbound_queue_capacity: usize,
    pub max_message_size: usize,
    pub max_connections_per_ip: usize,
    pub websocket_config: WebSocketConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ServerConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            enforce_relay_membership: config.server.enforce_relay_membership,
            outbound_queue_capacity: config.server.outbound_queue_capacity,
            max_message_size: config.security.max_message_size,
            max_connections_per_ip: config.security.max_connections_per_ip,
            websocket_config: config.websocket.clone(),
        }
    }
}

impl SignalingServer {
    pub fn new(
        config: ServerConfig,
        protocol_config: ProtocolConfig,
        stun_servers: &[String],
    ) -> Arc<Self> {
        let metrics = Arc::new(ServerMetrics::new());
        let connection_manager =
            ConnectionManager::new(config.max_connections_per_ip, metrics.clone());

        Arc::new(Self {
            connection_manager,
            room_table: RoomTable::new(),
            config,
            protocol_config,
            ice_servers: IceServersPayload::from_urls(stun_servers),
            metrics,
        })
    }

    /// Build a coordinator straight from the loaded configuration.
    pub fn from_config(config: &Config) -> Arc<Self> {
        Self::new(
            ServerConfig::from_config(config),
            config.protocol.clone(),
            &config.stun_servers,
        )
    }

    /// Register a new client connection
    pub fn register_client(
        &self,
        sender: mpsc::Sender<Arc<ServerMessage>>,
        client_addr: SocketAddr,
    ) -> Result<ConnectionId, RegisterClientError> {
        self.connection_manager.register_client(sender, client_addr)
    }

    /// Connect a client under a caller-chosen identifier (used for testing)
    pub fn connect_client(
        &self,
        connection_id: ConnectionId,
        sender: mpsc::Sender<Arc<ServerMessage>>,
    ) {
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        self.connection_manager
            .connect_test_client(connection_id, sender, addr);
        tracing::info!(%connection_id, "Client connected");
    }

    /// Alias for [`Self::unregister_client`]
    pub fn disconnect_client(&self, connection_id: &ConnectionId) {
        self.unregister_client(connection_id);
    }

    /// Tear down a connection and perform its implicit leave.
    ///
    /// Safe under duplicate or concurrent termination signals: only the caller
    /// that removes the registry entry runs the leave.
    pub fn unregister_client(&self, connection_id: &ConnectionId) {
        let Some(connection) = self.connection_manager.remove_client(connection_id) else {
            tracing::debug!(%connection_id, "Client already unregistered");
            return;
        };
        self.metrics.decrement_active_connections();

        if let Some(room_id) = connection.room_id {
            tracing::info!(%connection_id, %room_id, "Removing connection from room during unregister");
            self.depart_room(connection_id, &room_id);
        }

        tracing::info!(
            %connection_id,
            client_addr = %connection.client_addr,
            connected_for_ms = connection.connected_at.elapsed().as_millis() as u64,
            "Client unregistered"
        );
    }

    pub fn get_client_room(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        self.connection_manager.get_client_room(connection_id)
    }

    pub fn has_client(&self, connection_id: &ConnectionId) -> bool {
        self.connection_manager.has_client(connection_id)
    }

    pub fn room_exists(&self, room_id: &RoomId) -> bool {
        self.room_table.contains(room_id)
    }

    /// Members currently in `room_id`, in join order.
    pub fn room_members(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.room_table
            .members(room_id)
            .map(|members| members.to_vec())
            .unwrap_or_default()
    }

    pub fn room_member_count(&self, room_id: &RoomId) -> usize {
        self.room_table
            .members(room_id)
            .map_or(0, |members| members.len())
    }

    pub fn room_count(&self) -> usize {
        self.room_table.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connection_manager.connection_count()
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn protocol_config(&self) -> &ProtocolConfig {
        &self.protocol_config
    }

    pub fn ice_servers(&self) -> &IceServersPayload {
        &self.ice_servers
    }

    /// Get server metrics
    pub fn metrics(&self) -> Arc<ServerMetrics> {
        self.metrics.clone()
    }
}
