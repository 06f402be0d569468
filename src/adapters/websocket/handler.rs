//! WebSocket upgrade handler for live session viewers.
//!
//! Connection lifecycle:
//! 1. Upgrade to WebSocket
//! 2. Join the session (snapshot first, then broadcasts)
//! 3. Drain inbound frames until the client goes away
//! 4. Leave the session

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::StreamExt;

use crate::application::LiveContext;
use crate::domain::foundation::SessionId;
use crate::ports::LiveConnection;

use super::connection::WsConnection;
use super::messages::{SESSION_NOT_FOUND_CLOSE_CODE, SESSION_NOT_FOUND_REASON};

/// Handle WebSocket upgrade requests for a session.
///
/// Route: `GET /ws/sessions/:session_id`
///
/// The upgrade is always accepted so that an unknown session can be
/// reported with a close code rather than an HTTP status.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(session_id): Path<String>,
    State(context): State<LiveContext>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, session_id, context))
}

/// Handle an established WebSocket connection for its whole lifetime.
async fn handle_socket(socket: WebSocket, raw_session_id: String, context: LiveContext) {
    let (sink, mut receiver) = socket.split();
    let mut connection = WsConnection::new(sink, context.send_timeout());

    let session_id: SessionId = match raw_session_id.parse() {
        Ok(id) => id,
        Err(_) => {
            tracing::debug!(session_id = %raw_session_id, "malformed session id");
            connection
                .close(SESSION_NOT_FOUND_CLOSE_CODE, SESSION_NOT_FOUND_REASON)
                .await;
            return;
        }
    };

    let connection_id = match context.join(&session_id, Box::new(connection)).await {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!(session_id = %session_id, error = %e, "join failed");
            return;
        }
    };

    // Inbound frames carry nothing; reading only detects the disconnect.
    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Close(_)) => {
                tracing::debug!(connection_id = %connection_id, "client sent close frame");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(connection_id = %connection_id, "receive error: {}", e);
                break;
            }
        }
    }

    context.leave(&session_id, &connection_id).await;
}

/// Create axum router for the WebSocket endpoint.
pub fn websocket_router() -> Router<LiveContext> {
    Router::new().route("/ws/sessions/:session_id", get(ws_handler))
}
