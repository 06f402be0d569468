//! HTTP adapter - REST API over the session store.
//!
//! Handlers validate input, call the store, then publish the resulting
//! event through the broadcast coordinator.

pub mod dto;
pub mod error;
pub mod handlers;
mod routes;

pub use error::{ApiError, ErrorResponse};
pub use routes::api_router;
