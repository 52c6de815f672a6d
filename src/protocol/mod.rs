//! WebSocket message protocol for the Pong relay.
//!
//! All frames are JSON text, one discrete event per frame, tagged by a
//! camelCase `type` field. No message carries a sequence number or
//! acknowledgment; delivery is best-effort in channel order.

mod messages;
mod types;

pub use messages::{ClientMessage, ServerMessage};
pub use types::{PlayerId, PlayerRole, SessionId};
