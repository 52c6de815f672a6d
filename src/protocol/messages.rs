use serde::{Deserialize, Serialize};

use super::types::SessionId;

/// Message types sent from client to server.
///
/// The sender never addresses its peer directly; the server resolves the
/// session and forwards. `paddleMove` carries only the paddle position; the
/// server stamps the sender's player number onto the relayed copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Sender's paddle position
    PaddleMove { y: f64 },
    /// Ball position (host only by convention; the relay does not enforce it)
    BallUpdate { x: f64, y: f64 },
    /// A player's score changed
    #[serde(rename_all = "camelCase")]
    ScoreUpdate { player_number: u8, score: u32 },
    /// Match concluded with a named winner
    GameOver { winner: u8 },
}

/// Message types sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Handshake acknowledgment on channel open
    Connected,
    /// Session formed; assigns role and control scheme
    #[serde(rename_all = "camelCase")]
    GameStart {
        player_number: u8,
        game_id: SessionId,
        controls: String,
    },
    /// Presence snapshot, broadcast to all live connections
    PlayerCount {
        total: usize,
        active: usize,
        waiting: usize,
    },
    /// Peer's paddle position, relayed verbatim plus the sender's number
    #[serde(rename_all = "camelCase")]
    PaddleMove { player_number: u8, y: f64 },
    /// Ball position from the host, relayed verbatim
    BallUpdate { x: f64, y: f64 },
    /// Score change, relayed verbatim
    #[serde(rename_all = "camelCase")]
    ScoreUpdate { player_number: u8, score: u32 },
    /// Match conclusion, relayed verbatim
    GameOver { winner: u8 },
    /// Sent to the remaining member when its peer's channel closes
    PlayerDisconnected,
}
