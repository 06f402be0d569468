//! WebSocket wire protocol for live session viewers.
//!
//! The channel is read-only from the server's perspective:
//! - Server → Client: one `session_snapshot` event on open, then every
//!   broadcast event for the session, each as a `{type, payload, ts}` text frame
//! - Client → Server: ignored; the read side only detects disconnects

use crate::domain::event::LiveEvent;

/// Close code sent when the requested session does not exist.
pub const SESSION_NOT_FOUND_CLOSE_CODE: u16 = 4404;

/// Reason sent with [`SESSION_NOT_FOUND_CLOSE_CODE`].
pub const SESSION_NOT_FOUND_REASON: &str = "session not found";

/// Standard "going away" close code, used on server shutdown.
pub const GOING_AWAY_CLOSE_CODE: u16 = 1001;

pub const SERVER_SHUTDOWN_REASON: &str = "server shutting down";

/// "Try again later": the viewer fell behind or its send failed and it
/// was dropped from the session.
pub const LAGGING_CLOSE_CODE: u16 = 1013;

pub const LAGGING_REASON: &str = "viewer fell behind";

/// Encode an event as a text frame body.
pub fn encode_event(event: &LiveEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}
