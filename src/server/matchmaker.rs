use std::sync::Arc;

use crate::protocol::{PlayerRole, ServerMessage};

use super::registry::FormedSession;
use super::RelayServer;

impl RelayServer {
    /// Pair the two earliest-arrived waiting connections, if any.
    ///
    /// Role assignment is arrival-order-deterministic: the earlier-queued
    /// connection is always the host, because the host owns ball physics and
    /// both peers must be able to infer the assignment independently. Each
    /// member is told its player number, the session id, and its control
    /// scheme.
    pub(crate) fn try_form_session(&self) -> Option<FormedSession> {
        let formed = self.registry.try_form()?;

        tracing::info!(
            session_id = %formed.session_id,
            host = %formed.host,
            guest = %formed.guest,
            "Session formed"
        );
        self.metrics.record_session_formed();

        for (player_id, role) in [
            (formed.host, PlayerRole::Host),
            (formed.guest, PlayerRole::Guest),
        ] {
            self.connection_manager.send_to_player(
                &player_id,
                Arc::new(ServerMessage::GameStart {
                    player_number: role.player_number(),
                    game_id: formed.session_id,
                    controls: role.controls_label().to_string(),
                }),
            );
        }

        Some(formed)
    }
}
