//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - In-memory session store
//! - `websocket` - Connection registry and WebSocket transport
//! - `http` - REST API

pub mod http;
pub mod memory;
pub mod websocket;
