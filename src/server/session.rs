use crate::protocol::{PlayerId, PlayerRole, SessionId};

/// One active match: a pure routing container for exactly two connections.
///
/// Sessions never hold gameplay state; scores and ball position live on the
/// peers. A session has 0, 1 (degraded, awaiting teardown), or 2 members;
/// relay routing is defined only while both members remain.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    host: Option<PlayerId>,
    guest: Option<PlayerId>,
    concluded: bool,
}

impl Session {
    pub fn new(id: SessionId, host: PlayerId, guest: PlayerId) -> Self {
        Self {
            id,
            host: Some(host),
            guest: Some(guest),
            concluded: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Both member references, defined only while exactly two remain.
    pub fn members(&self) -> Option<(PlayerId, PlayerId)> {
        match (self.host, self.guest) {
            (Some(host), Some(guest)) => Some((host, guest)),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.host.is_some() && self.guest.is_some()
    }

    pub fn role_of(&self, player_id: &PlayerId) -> Option<PlayerRole> {
        if self.host == Some(*player_id) {
            Some(PlayerRole::Host)
        } else if self.guest == Some(*player_id) {
            Some(PlayerRole::Guest)
        } else {
            None
        }
    }

    /// The other member, defined only while the session is complete.
    pub fn peer_of(&self, player_id: &PlayerId) -> Option<PlayerId> {
        let (host, guest) = self.members()?;
        if host == *player_id {
            Some(guest)
        } else if guest == *player_id {
            Some(host)
        } else {
            None
        }
    }

    /// Detach the given member. Returns whether the session now has zero
    /// members, in which case the caller deletes it from the registry.
    pub fn remove_member(&mut self, player_id: &PlayerId) -> bool {
        if self.host == Some(*player_id) {
            self.host = None;
        } else if self.guest == Some(*player_id) {
            self.guest = None;
        }
        self.host.is_none() && self.guest.is_none()
    }

    /// The sole remaining member of a degraded session, if any.
    pub fn remaining_member(&self) -> Option<PlayerId> {
        match (self.host, self.guest) {
            (Some(player), None) | (None, Some(player)) => Some(player),
            _ => None,
        }
    }

    /// Idempotent conclusion flag set by a relayed `gameOver`. Returns true
    /// only on the first call.
    pub fn mark_concluded(&mut self) -> bool {
        let newly = !self.concluded;
        self.concluded = true;
        newly
    }

    pub fn is_concluded(&self) -> bool {
        self.concluded
    }
}
