//! Audience questions and their moderation lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{
    required_text, QnaPromptId, QuestionId, SessionId, StateMachine, Timestamp, ValidationError,
};

/// Maximum length of a question.
pub const QUESTION_MAX_LEN: usize = 500;

/// Moderation status of a question.
///
/// Questions start pending; a moderator approves or hides them and may send
/// them back to pending. There is no direct approved/hidden switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    #[default]
    Pending,
    Approved,
    Hidden,
}

impl StateMachine for QuestionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use QuestionStatus::*;
        matches!(
            (self, target),
            (Pending, Approved) | (Approved, Pending) | (Pending, Hidden) | (Hidden, Pending)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use QuestionStatus::*;
        match self {
            Pending => vec![Approved, Hidden],
            Approved | Hidden => vec![Pending],
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            QuestionStatus::Pending => "pending",
            QuestionStatus::Approved => "approved",
            QuestionStatus::Hidden => "hidden",
        }
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A question submitted by the audience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub session_id: SessionId,
    pub prompt_id: Option<QnaPromptId>,
    pub text: String,
    pub status: QuestionStatus,
    pub votes: u32,
    pub created_at: Timestamp,
}

impl Question {
    pub fn new(session_id: SessionId, input: NewQuestion) -> Self {
        Self {
            id: QuestionId::new(),
            session_id,
            prompt_id: input.prompt_id,
            text: input.text,
            status: QuestionStatus::Pending,
            votes: 0,
            created_at: Timestamp::now(),
        }
    }
}

/// Validated input for submitting a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    text: String,
    prompt_id: Option<QnaPromptId>,
}

impl NewQuestion {
    pub fn new(text: &str, prompt_id: Option<QnaPromptId>) -> Result<Self, ValidationError> {
        Ok(Self {
            text: required_text("text", text, QUESTION_MAX_LEN)?,
            prompt_id,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn prompt_id(&self) -> Option<QnaPromptId> {
        self.prompt_id
    }
}
