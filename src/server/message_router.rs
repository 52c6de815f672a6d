use crate::protocol::{ClientMessage, PlayerId};

use super::RelayServer;

impl RelayServer {
    /// Handle an inbound client message.
    ///
    /// Every gameplay message is a relay: the server resolves the sender's
    /// session and forwards to the peer without validating coordinates,
    /// speeds, or scores; trust is placed entirely in the sending peer.
    pub fn handle_client_message(&self, player_id: &PlayerId, message: ClientMessage) {
        match message {
            ClientMessage::PaddleMove { y } => {
                self.relay_paddle_move(player_id, y);
            }
            ClientMessage::BallUpdate { x, y } => {
                self.relay_ball_update(player_id, x, y);
            }
            ClientMessage::ScoreUpdate {
                player_number,
                score,
            } => {
                self.relay_score_update(player_id, player_number, score);
            }
            ClientMessage::GameOver { winner } => {
                self.relay_game_over(player_id, winner);
            }
        }
    }
}
