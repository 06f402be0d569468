//! Q&A prompts: presenter-posed topics the audience answers with questions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    required_text, OpenStatus, QnaPromptId, SessionId, Timestamp, ValidationError,
};

pub const PROMPT_MAX_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QnaPrompt {
    pub id: QnaPromptId,
    pub session_id: SessionId,
    pub prompt: String,
    pub status: OpenStatus,
    pub created_at: Timestamp,
}

impl QnaPrompt {
    pub fn new(session_id: SessionId, input: NewQnaPrompt) -> Self {
        Self {
            id: QnaPromptId::new(),
            session_id,
            prompt: input.prompt,
            status: OpenStatus::Closed,
            created_at: Timestamp::now(),
        }
    }
}

/// Validated input for creating a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQnaPrompt {
    prompt: String,
}

impl NewQnaPrompt {
    pub fn new(prompt: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            prompt: required_text("prompt", prompt, PROMPT_MAX_LEN)?,
        })
    }
}
