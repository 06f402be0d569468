//! HTTP handlers, one module per entity.
//!
//! Every mutating handler runs its store call through
//! `BroadcastCoordinator::commit`, which publishes the matching events in
//! mutation order. Publishing never fails the request.

pub mod polls;
pub mod prompts;
pub mod questions;
pub mod sessions;
pub mod word_clouds;

use axum::Json;

use super::dto::HealthResponse;

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
