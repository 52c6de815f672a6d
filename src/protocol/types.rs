use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for connected players
pub type PlayerId = Uuid;
/// Unique identifier for sessions (the wire-level `gameId`)
pub type SessionId = Uuid;

/// Role assigned to a session member when a match forms.
///
/// The earlier-queued connection is always the host. The host is the single
/// source of truth for ball physics, so the client infers "am I host" solely
/// from this assignment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlayerRole {
    /// Authoritative peer; owns ball simulation and sends `ballUpdate`
    Host,
    /// Non-authoritative peer; consumes the host's state
    Guest,
}

impl PlayerRole {
    /// Wire-level player number: host is player 1, guest is player 2.
    #[must_use]
    pub fn player_number(self) -> u8 {
        match self {
            Self::Host => 1,
            Self::Guest => 2,
        }
    }

    /// Human-readable control-scheme label sent in `gameStart`.
    #[must_use]
    pub fn controls_label(self) -> &'static str {
        match self {
            Self::Host => "W/S keys",
            Self::Guest => "Arrow Up/Down keys",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_is_player_one_guest_is_player_two() {
        assert_eq!(PlayerRole::Host.player_number(), 1);
        assert_eq!(PlayerRole::Guest.player_number(), 2);
    }

    #[test]
    fn controls_labels_match_roles() {
        assert_eq!(PlayerRole::Host.controls_label(), "W/S keys");
        assert_eq!(PlayerRole::Guest.controls_label(), "Arrow Up/Down keys");
    }
}
