use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::metrics::ServerMetrics;
use crate::protocol::{PlayerId, ServerMessage};

use super::RegisterClientError;

#[derive(Debug, Clone)]
pub(crate) struct ClientConnection {
    pub sender: mpsc::Sender<Arc<ServerMessage>>,
    pub client_addr: SocketAddr,
    #[allow(dead_code)]
    pub connected_at: chrono::DateTime<chrono::Utc>,
}

/// Live connection table: sender handles plus per-IP accounting.
pub(crate) struct ConnectionManager {
    clients: DashMap<PlayerId, ClientConnection>,
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
    ) -> Result<PlayerId, RegisterClientError> {
        let ip = client_addr.ip();
        if let Err(current) = self.try_reserve_ip_slot(ip) {
            warn!(
                %ip,
                current,
                max = self.max_connections_per_ip,
                "IP connection limit exceeded"
            );
            self.metrics.increment_ip_limit_rejections();
            return Err(RegisterClientError::IpLimitExceeded {
                current,
                limit: self.max_connections_per_ip,
            });
        }

        let player_id = Uuid::new_v4();
        let connection = ClientConnection {
            sender,
            client_addr,
            connected_at: chrono::Utc::now(),
        };

        self.clients.insert(player_id, connection);
        self.metrics.increment_connections();

        info!(%player_id, client_addr = %client_addr, "Client registered");
        Ok(player_id)
    }

    pub fn remove_client(&self, player_id: &PlayerId) -> Option<ClientConnection> {
        self.clients.remove(player_id).map(|(_, connection)| {
            self.release_ip_slot(connection.client_addr.ip());
            connection
        })
    }

    pub fn has_client(&self, player_id: &PlayerId) -> bool {
        self.clients.contains_key(player_id)
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Queue a message on one client's outbound channel. Delivery is
    /// fire-and-forget: a full or closed channel drops the message.
    pub fn send_to_player(&self, player_id: &PlayerId, message: Arc<ServerMessage>) {
        if let Some(connection) = self.clients.get(player_id) {
            if connection.sender.try_send(message).is_err() {
                self.metrics.increment_outbound_messages_dropped();
                debug!(%player_id, "Outbound channel full or closed, message dropped");
            }
        } else {
            debug!(%player_id, "Send to unknown client, message dropped");
        }
    }

    /// Fan the same message out to every live connection.
    pub fn broadcast_to_all(&self, message: &Arc<ServerMessage>) {
        for entry in &self.clients {
            if entry.value().sender.try_send(Arc::clone(message)).is_err() {
                self.metrics.increment_outbound_messages_dropped();
                debug!(player_id = %entry.key(), "Broadcast dropped for client");
            }
        }
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
