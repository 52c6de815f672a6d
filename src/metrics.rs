use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter collection for the in-memory relay server.
///
/// Everything is a monotonic `AtomicU64` except `active_connections` and
/// `active_sessions`, which move both ways with churn.
#[derive(Debug, Default)]
pub struct ServerMetrics {
    // Connection metrics
    pub total_connections: AtomicU64,
    pub active_connections: AtomicU64,
    pub disconnections: AtomicU64,
    pub ip_limit_rejections: AtomicU64,

    // Session metrics
    pub sessions_formed: AtomicU64,
    pub sessions_ended: AtomicU64,
    pub active_sessions: AtomicU64,
    pub sessions_concluded: AtomicU64,

    // Relay metrics
    pub messages_relayed: AtomicU64,
    pub relay_drops: AtomicU64,
    pub malformed_messages: AtomicU64,
    pub oversized_messages: AtomicU64,

    // Outbound metrics
    pub presence_broadcasts: AtomicU64,
    pub outbound_messages_dropped: AtomicU64,
}

impl ServerMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_connections(&self) {
        self.total_connections.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decrement_active_connections(&self) {
        self.disconnections.fetch_add(1, Ordering::Relaxed);
        let _ = self
            .active_connections
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
                v.checked_sub(1)
            });
    }

    pub fn increment_ip_limit_rejections(&self) {
        self.ip_limit_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_session_formed(&self) {
        self.sessions_formed.fetch_add(1, Ordering::Relaxed);
        self.active_sessions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_session_ended(&self) {
        self.sessions_ended.fetch_add(1, Ordering::Relaxed);
        let _ = self
            .active_sessions
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
                v.checked_sub(1)
            });
    }

    pub fn increment_sessions_concluded(&self) {
        self.sessions_concluded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_messages_relayed(&self) {
        self.messages_relayed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_relay_drops(&self) {
        self.relay_drops.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_malformed_messages(&self) {
        self.malformed_messages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_oversized_messages(&self) {
        self.oversized_messages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_presence_broadcasts(&self) {
        self.presence_broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_outbound_messages_dropped(&self) {
        self.outbound_messages_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time snapshot for the `/metrics` endpoint.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_connections: self.total_connections.load(Ordering::Relaxed),
            active_connections: self.active_connections.load(Ordering::Relaxed),
            disconnections: self.disconnections.load(Ordering::Relaxed),
            ip_limit_rejections: self.ip_limit_rejections.load(Ordering::Relaxed),
            sessions_formed: self.sessions_formed.load(Ordering::Relaxed),
            sessions_ended: self.sessions_ended.load(Ordering::Relaxed),
            active_sessions: self.active_sessions.load(Ordering::Relaxed),
            sessions_concluded: self.sessions_concluded.load(Ordering::Relaxed),
            messages_relayed: self.messages_relayed.load(Ordering::Relaxed),
            relay_drops: self.relay_drops.load(Ordering::Relaxed),
            malformed_messages: self.malformed_messages.load(Ordering::Relaxed),
            oversized_messages: self.oversized_messages.load(Ordering::Relaxed),
            presence_broadcasts: self.presence_broadcasts.load(Ordering::Relaxed),
            outbound_messages_dropped: self.outbound_messages_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Serializable view of [`ServerMetrics`].
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_connections: u64,
    pub active_connections: u64,
    pub disconnections: u64,
    pub ip_limit_rejections: u64,
    pub sessions_formed: u64,
    pub sessions_ended: u64,
    pub active_sessions: u64,
    pub sessions_concluded: u64,
    pub messages_relayed: u64,
    pub relay_drops: u64,
    pub malformed_messages: u64,
    pub oversized_messages: u64,
    pub presence_broadcasts: u64,
    pub outbound_messages_dropped: u64,
}
