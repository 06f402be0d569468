//! Live connection port - one subscriber's outbound channel.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::event::LiveEvent;

/// Why a delivery did not reach the subscriber.
///
/// Never surfaced to a mutating caller; the registry prunes the connection.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("connection closed")]
    Closed,

    #[error("send timed out")]
    TimedOut,

    #[error("outbound queue full")]
    Lagging,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Port for pushing events to one connected viewer.
///
/// Implementations send one frame per call, without retry. Queueing lives
/// in the registry, which drives each connection from its own writer task.
#[async_trait]
pub trait LiveConnection: Send {
    /// Deliver a single event.
    async fn deliver(&mut self, event: &LiveEvent) -> Result<(), DeliveryError>;

    /// Close the connection with an application close code.
    ///
    /// Best effort; errors are swallowed.
    async fn close(&mut self, code: u16, reason: &str);
}
