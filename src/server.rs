use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::metrics::ServerMetrics;
use crate::protocol::{PlayerId, ServerMessage, SessionId};

mod connection_manager;
mod matchmaker;
mod message_router;
mod presence;
mod registry;
mod relay;
mod session;

use connection_manager::ConnectionManager;
use registry::Registry;

pub use registry::{FormedSession, PresenceCounts, RelayRoute, Removal};
pub use session::Session;

/// Relay server orchestration: the connection table, the matchmaking
/// registry, and the relay/presence plumbing between them.
///
/// Every mutation path funnels through [`register_client`],
/// [`unregister_client`], or [`handle_client_message`]
/// (one inbound event at a time per connection), with registry state kept
/// atomic per event.
///
/// [`register_client`]: RelayServer::register_client
/// [`unregister_client`]: RelayServer::unregister_client
/// [`handle_client_message`]: RelayServer::handle_client_message
pub struct RelayServer {
    /// Live connection table (sender handles, IP accounting)
    connection_manager: ConnectionManager,
    /// Queue + session map + membership map
    registry: Registry,
    /// Server configuration
    config: ServerConfig,
    /// Server metrics
    metrics: Arc<ServerMetrics>,
}

#[derive(Debug, Error)]
pub enum RegisterClientError {
    #[error("Too many connections from your IP ({current}/{limit})")]
    IpLimitExceeded { current: usize, limit: usize },
}

/// Runtime server settings, built from the loaded [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub max_connections_per_ip: usize,
    pub max_message_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_connections_per_ip: 16,
            max_message_size: 4096,
        }
    }
}

impl RelayServer {
    #[must_use]
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let metrics = Arc::new(ServerMetrics::new());
        let connection_manager =
            ConnectionManager::new(config.max_connections_per_ip, metrics.clone());

        Arc::new(Self {
            connection_manager,
            registry: Registry::new(),
            config,
            metrics,
        })
    }

    /// Register a new client connection.
    ///
    /// The client receives the `connected` handshake, enters the unassigned
    /// queue, and a matchmaking attempt runs; everyone then gets a fresh
    /// presence count. The `gameStart` for a formed pair is queued before the
    /// presence broadcast, matching the original wire ordering.
    pub fn register_client(
        &self,
        sender: mpsc::Sender<Arc<ServerMessage>>,
        client_addr: SocketAddr,
    ) -> Result<PlayerId, RegisterClientError> {
        let player_id = self
            .connection_manager
            .register_client(sender, client_addr)?;

        self.connection_manager
            .send_to_player(&player_id, Arc::new(ServerMessage::Connected));

        self.registry.enqueue(player_id);
        self.try_form_session();
        self.broadcast_counts();

        Ok(player_id)
    }

    /// Unregister a client connection.
    ///
    /// Idempotent: unregistering an already-removed connection is a no-op.
    /// A session member's departure notifies the remaining peer with exactly
    /// one `playerDisconnected`, after which the peer's relay attempts hit
    /// the no-session drop path.
    pub fn unregister_client(&self, player_id: &PlayerId) {
        let was_connected = self.connection_manager.remove_client(player_id).is_some();
        if was_connected {
            self.metrics.decrement_active_connections();
        }

        match self.registry.remove(player_id) {
            Removal::NotPresent => {
                if !was_connected {
                    return;
                }
            }
            Removal::FromQueue => {
                tracing::info!(%player_id, "Queued client left before pairing");
            }
            Removal::FromSession {
                session_id,
                remaining_peer,
                was_complete,
            } => {
                tracing::info!(%player_id, %session_id, "Session member disconnected");
                if was_complete {
                    self.metrics.record_session_ended();
                }
                if let Some(peer) = remaining_peer {
                    self.connection_manager
                        .send_to_player(&peer, Arc::new(ServerMessage::PlayerDisconnected));
                }
            }
        }

        self.broadcast_counts();
    }

    /// O(1) session lookup by connection identity.
    #[must_use]
    pub fn find_session(&self, player_id: &PlayerId) -> Option<SessionId> {
        self.registry.find_session(player_id)
    }

    #[must_use]
    pub fn has_client(&self, player_id: &PlayerId) -> bool {
        self.connection_manager.has_client(player_id)
    }

    /// Get server configuration
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get server metrics
    #[must_use]
    pub fn metrics(&self) -> Arc<ServerMetrics> {
        self.metrics.clone()
    }
}
