use std::sync::Arc;

use crate::protocol::{PlayerId, ServerMessage};

use super::registry::RelayRoute;
use super::RelayServer;

impl RelayServer {
    /// Forward the sender's paddle position to its peer, stamped with the
    /// sender's player number. Physics relay stops once the session is
    /// concluded.
    pub(crate) fn relay_paddle_move(&self, player_id: &PlayerId, y: f64) {
        let Some(route) = self.physics_route(player_id) else {
            return;
        };
        self.forward(
            &route,
            ServerMessage::PaddleMove {
                player_number: route.role.player_number(),
                y,
            },
        );
    }

    /// Forward a ball position verbatim. Only the host sends these by
    /// construction, but the relay does not enforce it.
    pub(crate) fn relay_ball_update(&self, player_id: &PlayerId, x: f64, y: f64) {
        let Some(route) = self.physics_route(player_id) else {
            return;
        };
        self.forward(&route, ServerMessage::BallUpdate { x, y });
    }

    /// Forward a score change verbatim.
    pub(crate) fn relay_score_update(&self, player_id: &PlayerId, player_number: u8, score: u32) {
        let Some(route) = self.route_or_drop(player_id) else {
            return;
        };
        self.forward(
            &route,
            ServerMessage::ScoreUpdate {
                player_number,
                score,
            },
        );
    }

    /// Forward a match conclusion verbatim and flag the session as concluded.
    ///
    /// The flag is idempotent and stops further physics relay; the session
    /// itself is torn down on the next member disconnect; the server never
    /// force-closes the channel.
    pub(crate) fn relay_game_over(&self, player_id: &PlayerId, winner: u8) {
        let Some(route) = self.route_or_drop(player_id) else {
            return;
        };
        if self.registry.mark_concluded(player_id) {
            tracing::info!(
                session_id = %route.session_id,
                winner,
                "Session concluded"
            );
            self.metrics.increment_sessions_concluded();
        }
        self.forward(&route, ServerMessage::GameOver { winner });
    }

    fn forward(&self, route: &RelayRoute, message: ServerMessage) {
        self.connection_manager
            .send_to_player(&route.peer, Arc::new(message));
        self.metrics.increment_messages_relayed();
    }

    /// Route for physics messages: drops for concluded sessions as well.
    fn physics_route(&self, player_id: &PlayerId) -> Option<RelayRoute> {
        let route = self.route_or_drop(player_id)?;
        if route.concluded {
            tracing::debug!(%player_id, session_id = %route.session_id, "Physics after conclusion, dropped");
            self.metrics.increment_relay_drops();
            return None;
        }
        Some(route)
    }

    /// Resolve the sender's session peer; stray messages arriving after
    /// teardown drop silently; no error is surfaced to the sender.
    fn route_or_drop(&self, player_id: &PlayerId) -> Option<RelayRoute> {
        match self.registry.relay_route(player_id) {
            Some(route) => Some(route),
            None => {
                tracing::debug!(%player_id, "Relay without a session, message dropped");
                self.metrics.increment_relay_drops();
                None
            }
        }
    }
}
