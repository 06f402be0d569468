//! State store configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Upper bound for join-code allocation attempts.
const MAX_CODE_ATTEMPTS: u32 = 1_000;

/// What a single-select poll does when a client votes for a second option.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PollRevotePolicy {
    /// Keep the first vote; the poll is returned unchanged.
    #[default]
    Reject,
    /// Move the vote: the previous option loses one, the new one gains one.
    Switch,
}

/// State store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Single-select re-vote behavior
    #[serde(default)]
    pub poll_revote: PollRevotePolicy,

    /// How many random join codes to try before giving up
    #[serde(default = "default_code_attempts")]
    pub code_attempts: u32,

    /// Per-session event log bound; unset keeps every event
    pub event_log_capacity: Option<usize>,
}

impl StoreConfig {
    /// Validate store configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code_attempts == 0 || self.code_attempts > MAX_CODE_ATTEMPTS {
            return Err(ValidationError::InvalidCodeAttempts {
                max: MAX_CODE_ATTEMPTS,
            });
        }
        if self.event_log_capacity == Some(0) {
            return Err(ValidationError::InvalidEventLogCapacity);
        }
        Ok(())
    }

    /// True when the per-session event log grows without limit.
    pub fn event_log_unbounded(&self) -> bool {
        self.event_log_capacity.is_none()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            poll_revote: PollRevotePolicy::default(),
            code_attempts: default_code_attempts(),
            event_log_capacity: None,
        }
    }
}

fn default_code_attempts() -> u32 {
    16
}
