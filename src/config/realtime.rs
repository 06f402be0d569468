//! Realtime (WebSocket) configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_SEND_TIMEOUT_MS: u64 = 60_000;
const MAX_OUTBOUND_BUFFER: usize = 4_096;

/// Realtime delivery configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    /// How long one frame may take to send before the subscriber is dropped
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,

    /// Events queued per viewer; a viewer whose queue is full is dropped
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
}

impl RealtimeConfig {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    /// Validate realtime configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.send_timeout_ms == 0 || self.send_timeout_ms > MAX_SEND_TIMEOUT_MS {
            return Err(ValidationError::InvalidSendTimeout {
                max_ms: MAX_SEND_TIMEOUT_MS,
            });
        }
        if self.outbound_buffer == 0 || self.outbound_buffer > MAX_OUTBOUND_BUFFER {
            return Err(ValidationError::InvalidOutboundBuffer {
                max: MAX_OUTBOUND_BUFFER,
            });
        }
        Ok(())
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            send_timeout_ms: default_send_timeout_ms(),
            outbound_buffer: default_outbound_buffer(),
        }
    }
}

fn default_send_timeout_ms() -> u64 {
    5_000
}

fn default_outbound_buffer() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realtime_defaults() {
        let config = RealtimeConfig::default();
        assert_eq!(config.send_timeout(), Duration::from_secs(5));
        assert_eq!(config.outbound_buffer, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_send_timeout_bounds() {
        for send_timeout_ms in [0, 120_000] {
            let config = RealtimeConfig {
                send_timeout_ms,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_outbound_buffer_bounds() {
        for outbound_buffer in [0, 10_000] {
            let config = RealtimeConfig {
                outbound_buffer,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ValidationError::InvalidOutboundBuffer { .. })
            ));
        }
    }
}
