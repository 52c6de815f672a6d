use std::sync::Arc;

use crate::protocol::ServerMessage;

use super::RelayServer;

impl RelayServer {
    /// Publish aggregate connection counts to every live connection.
    ///
    /// Intentionally a global O(n) fan-out: connection churn is low-frequency
    /// relative to gameplay updates. Runs after every register/unregister and
    /// after session formation/teardown; no ordering is promised between a
    /// count broadcast and the gameplay messages it straddles.
    pub(crate) fn broadcast_counts(&self) {
        let counts = self.registry.counts();
        let total = self.connection_manager.client_count();

        let message = Arc::new(ServerMessage::PlayerCount {
            total,
            active: counts.active,
            waiting: counts.waiting,
        });

        tracing::debug!(
            total,
            active = counts.active,
            waiting = counts.waiting,
            "Broadcasting player count"
        );
        self.connection_manager.broadcast_to_all(&message);
        self.metrics.increment_presence_broadcasts();
    }
}
