use pong_relay_server::protocol::{PlayerId, ServerMessage};
use pong_relay_server::server::{RelayServer, ServerConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Create a test server with default configuration
#[allow(dead_code)]
pub fn create_test_server() -> Arc<RelayServer> {
    create_test_server_with_config(test_server_config())
}

/// Create a test server with custom configuration
#[allow(dead_code)]
pub fn create_test_server_with_config(config: ServerConfig) -> Arc<RelayServer> {
    RelayServer::new(config)
}

/// Default server configuration optimized for testing
#[allow(dead_code)]
pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        max_connections_per_ip: 64, // All test clients share 127.0.0.1
        max_message_size: 4096,
    }
}

/// A registered test client: its server-assigned id and the outbound channel
/// the server writes to.
#[allow(dead_code)]
pub struct TestClient {
    pub player_id: PlayerId,
    pub rx: mpsc::Receiver<Arc<ServerMessage>>,
}

#[allow(dead_code)]
impl TestClient {
    /// Pop the next queued message, panicking if none is pending.
    pub fn recv(&mut self) -> Arc<ServerMessage> {
        self.rx.try_recv().expect("expected a pending message")
    }

    /// Drain every currently queued message.
    pub fn drain(&mut self) -> Vec<Arc<ServerMessage>> {
        let mut messages = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            messages.push(message);
        }
        messages
    }
}

/// Register a client directly with the server, bypassing the socket layer.
#[allow(dead_code)]
pub fn connect(server: &RelayServer) -> TestClient {
    let (tx, rx) = mpsc::channel(64);
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let player_id = server.register_client(tx, addr).expect("registration succeeds");
    TestClient { player_id, rx }
}
