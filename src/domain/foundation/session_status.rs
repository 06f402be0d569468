//! Lifecycle status enums shared by session entities.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Active,
    Ended,
}

impl SessionStatus {
    /// Returns true if the session can be modified.
    pub fn is_mutable(&self) -> bool {
        matches!(self, SessionStatus::Active)
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (SessionStatus::Active, SessionStatus::Ended))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            SessionStatus::Active => vec![SessionStatus::Ended],
            SessionStatus::Ended => vec![],
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Ended => "ended",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Open/closed gate shared by polls, word clouds and Q&A prompts.
///
/// Items are created closed and toggle freely in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OpenStatus {
    #[default]
    Closed,
    Open,
}

impl OpenStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, OpenStatus::Open)
    }
}

impl StateMachine for OpenStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        self != target
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            OpenStatus::Closed => vec![OpenStatus::Open],
            OpenStatus::Open => vec![OpenStatus::Closed],
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            OpenStatus::Closed => "closed",
            OpenStatus::Open => "open",
        }
    }
}

impl fmt::Display for OpenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_active() {
        assert_eq!(SessionStatus::default(), SessionStatus::Active);
    }

    #[test]
    fn is_mutable_works_correctly() {
        assert!(SessionStatus::Active.is_mutable());
        assert!(!SessionStatus::Ended.is_mutable());
    }

    #[test]
    fn active_can_transition_to_ended() {
        assert!(SessionStatus::Active.can_transition_to(&SessionStatus::Ended));
    }

    #[test]
    fn ended_is_terminal() {
        assert!(SessionStatus::Ended.is_terminal());
        assert!(SessionStatus::Ended
            .transition_to(SessionStatus::Active)
            .is_err());
    }

    #[test]
    fn open_status_toggles_both_ways() {
        assert!(OpenStatus::Closed.can_transition_to(&OpenStatus::Open));
        assert!(OpenStatus::Open.can_transition_to(&OpenStatus::Closed));
        assert!(!OpenStatus::Open.is_terminal());
    }

    #[test]
    fn items_start_closed() {
        assert_eq!(OpenStatus::default(), OpenStatus::Closed);
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Ended).unwrap(),
            "\"ended\""
        );
        assert_eq!(serde_json::to_string(&OpenStatus::Open).unwrap(), "\"open\"");
    }

    #[test]
    fn deserializes_from_snake_case_json() {
        let status: OpenStatus = serde_json::from_str("\"closed\"").unwrap();
        assert_eq!(status, OpenStatus::Closed);
    }
}
