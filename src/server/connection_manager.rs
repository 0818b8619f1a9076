use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::metrics::ServerMetrics;
use crate::protocol::{ConnectionId, RoomId, ServerMessage};

use super::{RegisterClientError, UnknownConnection};

#[derive(Debug, Clone)]
pub(crate) struct ClientConnection {
    pub room_id: Option<RoomId>,
    pub sender: mpsc::Sender<Arc<ServerMessage>>,
    pub client_addr: SocketAddr,
    pub connected_at: Instant,
}

/// Connection Registry: live connections, their room association and the
/// per-IP connection accounting.
pub(crate) struct ConnectionManager {
    clients: DashMap<ConnectionId, ClientConnection>,
    connections_per_ip: DashMap<IpAddr, usize>,
    metrics: Arc<ServerMetrics>,
    max_connections_per_ip: usize,
}

impl ConnectionManager {
    pub fn new(max_connections_per_ip: usize, metrics: Arc<ServerMetrics>) -> Self {
        Self {
            clients: DashMap::new(),
            connections_per_ip: DashMap::new(),
            metrics,
            max_connections_per_ip,
        }
    }

    pub fn register_client(
        &self,
        sender: mpsc::Sender<Arc<ServerMessage>>,
        client_addr: SocketAddr,
    ) -> Result<ConnectionId, RegisterClientError> {
        let ip = client_addr.ip();
        if let Err(current) = self.try_reserve_ip_slot(ip) {
            warn!(
                %ip,
                current,
                max = self.max_connections_per_ip,
                "IP connection limit exceeded"
            );
            self.metrics.increment_connection_rejections();
            return Err(RegisterClientError::IpLimitExceeded {
                current,
                limit: self.max_connections_per_ip,
            });
        }

        let connection_id = Uuid::new_v4();
        self.clients
            .insert(connection_id, ClientConnection::new(sender, client_addr));
        self.metrics.increment_connections();

        info!(%connection_id, client_addr = %client_addr, "Client registered");
        Ok(connection_id)
    }

    pub fn connect_test_client(
        &self,
        connection_id: ConnectionId,
        sender: mpsc::Sender<Arc<ServerMessage>>,
        client_addr: SocketAddr,
    ) {
        self.increment_ip_slot_unbounded(client_addr.ip());
        self.clients
            .insert(connection_id, ClientConnection::new(sender, client_addr));
        self.metrics.increment_connections();
    }

    /// Record that `connection_id` now belongs to `room_id`, returning the
    /// association it replaces.
    pub fn associate(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
    ) -> Result<Option<RoomId>, UnknownConnection> {
        let mut client = self
            .clients
            .get_mut(connection_id)
            .ok_or(UnknownConnection(*connection_id))?;
        Ok(client.room_id.replace(room_id))
    }

    /// Clear the association only while it still names `room_id`.
    pub fn clear_association_if(&self, connection_id: &ConnectionId, room_id: &RoomId) -> bool {
        match self.clients.get_mut(connection_id) {
            Some(mut client) if client.room_id.as_ref() == Some(room_id) => {
                client.room_id = None;
                true
            }
            _ => false,
        }
    }

    pub fn get_client_room(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        self.clients
            .get(connection_id)
            .and_then(|client| client.room_id.clone())
    }

    pub fn sender(&self, connection_id: &ConnectionId) -> Option<mpsc::Sender<Arc<ServerMessage>>> {
        self.clients
            .get(connection_id)
            .map(|client| client.sender.clone())
    }

    pub fn has_client(&self, connection_id: &ConnectionId) -> bool {
        self.clients.contains_key(connection_id)
    }

    pub fn connection_count(&self) -> usize {
        self.clients.len()
    }

    /// Remove the registry entry. Exactly one caller observes `Some`.
    pub fn remove_client(&self, connection_id: &ConnectionId) -> Option<ClientConnection> {
        self.clients.remove(connection_id).map(|(_, connection)| {
            self.release_ip_slot(connection.client_addr.ip());
            connection
        })
    }

    fn try_reserve_ip_slot(&self, ip: IpAddr) -> Result<usize, usize> {
        match self.connections_per_ip.entry(ip) {
            dashmap::mapref::entry::Entry::Occupied(mut entry) => {
                let current = *entry.get();
                if current >= self.max_connections_per_ip {
                    Err(current)
                } else {
                    let count = entry.get_mut();
                    *count += 1;
                    Ok(*count)
                }
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                if self.max_connections_per_ip == 0 {
                    Err(0)
                } else {
                    entry.insert(1);
                    Ok(1)
                }
            }
        }
    }

    fn increment_ip_slot_unbounded(&self, ip: IpAddr) -> usize {
        let mut count = self.connections_per_ip.entry(ip).or_insert(0);
        *count += 1;
        *count
    }

    fn release_ip_slot(&self, ip: IpAddr) {
        if let Some(mut entry) = self.connections_per_ip.get_mut(&ip) {
            if *entry > 1 {
                *entry -= 1;
                return;
            }
        }
        self.connections_per_ip.remove(&ip);
    }
}

impl ClientConnection {
    fn new(sender: mpsc::Sender<Arc<ServerMessage>>, client_addr: SocketAddr) -> Self {
        Self {
            room_id: None,
            sender,
            client_addr,
            connected_at: Instant::now(),
        }
    }
}
