use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use uuid::Uuid;

use crate::protocol::{PlayerId, PlayerRole, SessionId};

use super::session::Session;

/// Where a registered connection currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    Queued,
    InSession(SessionId),
}

#[derive(Debug, Default)]
struct RegistryState {
    /// Connections awaiting pairing, insertion order = arrival order
    queue: VecDeque<PlayerId>,
    /// Sessions owned by the registry, keyed by session id
    sessions: HashMap<SessionId, Session>,
    /// Exclusive connection identity -> location map
    locations: HashMap<PlayerId, Location>,
}

/// The single mutable shared resource: unassigned queue, session map, and
/// connection-to-location map.
///
/// All state lives behind one mutex and every operation completes without
/// suspending, so each register/unregister/try_form/relay mutation is atomic
/// with respect to concurrently handled events. Partial updates (a
/// connection out of the queue but not yet in a session) are never observable.
#[derive(Debug, Default)]
pub struct Registry {
    state: Mutex<RegistryState>,
}

/// Outcome of removing a connection from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// The connection was not registered (idempotent no-op)
    NotPresent,
    /// The connection was waiting in the unassigned queue
    FromQueue,
    /// The connection was a session member
    FromSession {
        session_id: SessionId,
        /// The peer left behind in the now-degraded session, if any
        remaining_peer: Option<PlayerId>,
        /// Whether the session still had both members before this removal
        was_complete: bool,
    },
}

/// A freshly formed pairing, in arrival order: `host` queued before `guest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormedSession {
    pub session_id: SessionId,
    pub host: PlayerId,
    pub guest: PlayerId,
}

/// Resolved relay addressing for a session member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayRoute {
    pub session_id: SessionId,
    pub peer: PlayerId,
    pub role: PlayerRole,
    pub concluded: bool,
}

/// Aggregate membership counts for presence broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceCounts {
    /// Members of complete (two-member) sessions
    pub active: usize,
    /// Connections in the unassigned queue
    pub waiting: usize,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a newly established connection in unassigned state.
    pub fn enqueue(&self, player_id: PlayerId) {
        let mut state = self.lock();
        debug_assert!(!state.locations.contains_key(&player_id));
        state.queue.push_back(player_id);
        state.locations.insert(player_id, Location::Queued);
    }

    /// Remove the connection from whatever structure holds it.
    ///
    /// Idempotent: removing an unknown or already-removed connection returns
    /// [`Removal::NotPresent`]. A session member's departure degrades the
    /// session; the degraded session is deleted once its last member leaves.
    pub fn remove(&self, player_id: &PlayerId) -> Removal {
        let mut state = self.lock();
        match state.locations.remove(player_id) {
            None => Removal::NotPresent,
            Some(Location::Queued) => {
                state.queue.retain(|queued| queued != player_id);
                Removal::FromQueue
            }
            Some(Location::InSession(session_id)) => {
                let Some(session) = state.sessions.get_mut(&session_id) else {
                    return Removal::NotPresent;
                };
                let was_complete = session.is_complete();
                let now_empty = session.remove_member(player_id);
                let remaining_peer = session.remaining_member();
                if now_empty {
                    state.sessions.remove(&session_id);
                }
                Removal::FromSession {
                    session_id,
                    remaining_peer,
                    was_complete,
                }
            }
        }
    }

    /// Pair the two earliest-arrived waiting connections into a new session.
    ///
    /// FIFO tie-break: the earlier arrival becomes the host. Returns `None`
    /// if fewer than two connections are waiting. Queue removal, session
    /// creation, and location updates happen under one lock acquisition, so
    /// invoking this after every arrival can never double-pair.
    pub fn try_form(&self) -> Option<FormedSession> {
        let mut state = self.lock();
        if state.queue.len() < 2 {
            return None;
        }

        let host = state.queue.pop_front()?;
        let guest = state.queue.pop_front()?;
        let session_id = Uuid::new_v4();

        state
            .sessions
            .insert(session_id, Session::new(session_id, host, guest));
        state.locations.insert(host, Location::InSession(session_id));
        state
            .locations
            .insert(guest, Location::InSession(session_id));

        Some(FormedSession {
            session_id,
            host,
            guest,
        })
    }

    /// O(1) session lookup by connection identity.
    pub fn find_session(&self, player_id: &PlayerId) -> Option<SessionId> {
        let state = self.lock();
        match state.locations.get(player_id) {
            Some(Location::InSession(session_id)) => Some(*session_id),
            _ => None,
        }
    }

    /// Resolve relay addressing for a sender.
    ///
    /// Returns `None` when the sender has no session or the session is
    /// degraded. Stray messages arriving after teardown are dropped, not
    /// errors.
    pub fn relay_route(&self, player_id: &PlayerId) -> Option<RelayRoute> {
        let state = self.lock();
        let Some(Location::InSession(session_id)) = state.locations.get(player_id) else {
            return None;
        };
        let session = state.sessions.get(session_id)?;
        let peer = session.peer_of(player_id)?;
        let role = session.role_of(player_id)?;
        Some(RelayRoute {
            session_id: *session_id,
            peer,
            role,
            concluded: session.is_concluded(),
        })
    }

    /// Flag the sender's session as concluded. Returns true only when the
    /// flag was newly set; unknown sessions report false.
    pub fn mark_concluded(&self, player_id: &PlayerId) -> bool {
        let mut state = self.lock();
        let Some(Location::InSession(session_id)) = state.locations.get(player_id).copied() else {
            return false;
        };
        state
            .sessions
            .get_mut(&session_id)
            .is_some_and(Session::mark_concluded)
    }

    /// Membership counts: `active` counts members of complete sessions only,
    /// so a degraded session's remaining peer is neither active nor waiting.
    pub fn counts(&self) -> PresenceCounts {
        let state = self.lock();
        let active = state
            .sessions
            .values()
            .filter(|session| session.is_complete())
            .count()
            * 2;
        PresenceCounts {
            active,
            waiting: state.queue.len(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryState> {
        // Recover from a poisoned lock: registry mutations never panic
        // mid-update, so the state is valid either way.
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
