use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the in-memory relay. All fields are monotonic except
/// `active_connections` and `active_rooms`.
#[derive(Debug)]
pub struct ServerMetrics {
    started_at: DateTime<Utc>,

    // Connection metrics
    pub total_connections: AtomicU64,
    pub active_connections: AtomicU64,
    pub disconnections: AtomicU64,
    pub connection_rejections: AtomicU64,
    pub messages_dropped: AtomicU64,
    pub invalid_messages: AtomicU64,

    // Room lifecycle metrics
    pub active_rooms: AtomicU64,
    pub rooms_created: AtomicU64,
    pub rooms_deleted: AtomicU64,
    pub room_create_conflicts: AtomicU64,
    pub rooms_joined: AtomicU64,
    pub room_join_full: AtomicU64,
    pub room_join_not_found: AtomicU64,
    pub peers_left: AtomicU64,

    // Relay metrics
    pub relays_forwarded: AtomicU64,
    pub relays_without_peer: AtomicU64,
    pub relays_rejected_non_member: AtomicU64,
}

/// Serializable point-in-time view served by the metrics endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub total_connections: u64,
    pub active_connections: u64,
    pub disconnections: u64,
    pub connection_rejections: u64,
    pub messages_dropped: u64,
    pub invalid_messages: u64,
    pub active_rooms: u64,
    pub rooms_created: u64,
    pub rooms_deleted: u64,
    pub room_create_conflicts: u64,
    pub rooms_joined: u64,
    pub room_join_full: u64,
    pub room_join_not_found: u64,
    pub peers_left: u64,
    pub relays_forwarded: u64,
    pub relays_without_peer: u64,
    pub relays_rejected_non_member: u64,
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerMetrics {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            total_connections: AtomicU64::new(0),
            active_connections: AtomicU64::new(0),
            disconnections: AtomicU64::new(0),
            connection_rejections: AtomicU64::new(0),
            messages_dropped: AtomicU64::new(0),
            invalid_messages: AtomicU64::new(0),
            active_rooms: AtomicU64::new(0),
            rooms_created: AtomicU64::new(0),
            rooms_deleted: AtomicU64::new(0),
            room_create_conflicts: AtomicU64::new(0),
            rooms_joined: AtomicU64::new(0),
            room_join_full: AtomicU64::new(0),
            room_join_not_found: AtomicU64::new(0),
            peers_left: AtomicU64::new(0),
            relays_forwarded: AtomicU64::new(0),
            relays_without_peer: AtomicU64::new(0),
            relays_rejected_non_member: AtomicU64::new(0),
        }
    }

    pub fn increment_connections(&self) {
        self.total_connections.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decrement_active_connections(&self) {
        self.disconnections.fetch_add(1, Ordering::Relaxed);
        saturating_decrement(&self.active_connections);
    }

    pub fn increment_connection_rejections(&self) {
        self.connection_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_messages_dropped(&self) {
        self.messages_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_invalid_messages(&self) {
        self.invalid_messages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rooms_created(&self) {
        self.rooms_created.fetch_add(1, Ordering::Relaxed);
        self.active_rooms.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rooms_deleted(&self) {
        self.rooms_deleted.fetch_add(1, Ordering::Relaxed);
        saturating_decrement(&self.active_rooms);
    }

    pub fn increment_room_create_conflicts(&self) {
        self.room_create_conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rooms_joined(&self) {
        self.rooms_joined.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_room_join_full(&self) {
        self.room_join_full.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_room_join_not_found(&self) {
        self.room_join_not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_peers_left(&self) {
        self.peers_left.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_relays_forwarded(&self) {
        self.relays_forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_relays_without_peer(&self) {
        self.relays_without_peer.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_relays_rejected_non_member(&self) {
        self.relays_rejected_non_member
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let now = Utc::now();
        MetricsSnapshot {
            started_at: self.started_at,
            uptime_seconds: now
                .signed_duration_since(self.started_at)
                .num_seconds()
                .max(0) as u64,
            total_connections: self.total_connections.load(Ordering::Relaxed),
            active_connections: self.active_connections.load(Ordering::Relaxed),
            disconnections: self.disconnections.load(Ordering::Relaxed),
            connection_rejections: self.connection_rejections.load(Ordering::Relaxed),
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
            invalid_messages: self.invalid_messages.load(Ordering::Relaxed),
            active_rooms: self.active_rooms.load(Ordering::Relaxed),
            rooms_created: self.rooms_created.load(Ordering::Relaxed),
            rooms_deleted: self.rooms_deleted.load(Ordering::Relaxed),
            room_create_conflicts: self.room_create_conflicts.load(Ordering::Relaxed),
            rooms_joined: self.rooms_joined.load(Ordering::Relaxed),
            room_join_full: self.room_join_full.load(Ordering::Relaxed),
            room_join_not_found: self.room_join_not_found.load(Ordering::Relaxed),
            peers_left: self.peers_left.load(Ordering::Relaxed),
            relays_forwarded: self.relays_forwarded.load(Ordering::Relaxed),
            relays_without_peer: self.relays_without_peer.load(Ordering::Relaxed),
            relays_rejected_non_member: self.relays_rejected_non_member.load(Ordering::Relaxed),
        }
    }
}

fn saturating_decrement(counter: &AtomicU64) {
    let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |value| {
        Some(value.saturating_sub(1))
    });
}
