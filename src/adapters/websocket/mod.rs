//! WebSocket adapters for live session viewers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     BroadcastCoordinator                             │
//! │   - Records the event in the session log                             │
//! │   - Hands it to the registry for fan-out                             │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ broadcasts
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    ConnectionRegistry                                │
//! │   Session: 5f3c...     Session: 9a01...     Session: c7e2...         │
//! │   ├── conn-a           ├── conn-d           ├── conn-g               │
//! │   ├── conn-b           └── conn-e           └── conn-h               │
//! │   └── conn-c                                                         │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ try_send (never waits)
//!                                     ▼
//!                  bounded queue + writer task (one per viewer)
//!                                     │
//!                                     ▼
//!                                WsConnection
//! ```
//!
//! # Components
//!
//! - [`messages`] - Wire protocol constants and frame encoding
//! - [`registry`] - Per-session subscriber tracking and fan-out
//! - [`connection`] - `LiveConnection` over an axum WebSocket
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod connection;
pub mod handler;
pub mod messages;
pub mod registry;

pub use connection::WsConnection;
pub use handler::{websocket_router, ws_handler};
pub use messages::{
    encode_event, GOING_AWAY_CLOSE_CODE, LAGGING_CLOSE_CODE, LAGGING_REASON,
    SERVER_SHUTDOWN_REASON, SESSION_NOT_FOUND_CLOSE_CODE, SESSION_NOT_FOUND_REASON,
};
pub use registry::{BroadcastOutcome, ConnectionId, ConnectionRegistry, Mailbox, Subscriber};
