//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Session code attempts must be between 1 and {max}")]
    InvalidCodeAttempts { max: u32 },

    #[error("Event log capacity must be greater than zero")]
    InvalidEventLogCapacity,

    #[error("Send timeout must be between 1 and {max_ms} milliseconds")]
    InvalidSendTimeout { max_ms: u64 },

    #[error("Outbound buffer must be between 1 and {max} events")]
    InvalidOutboundBuffer { max: usize },

    #[error("Public base URL must start with http:// or https://: {0}")]
    InvalidPublicBaseUrl(String),
}
