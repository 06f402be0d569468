//! Session record - the root every other entity hangs off.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    optional_text, JoinCode, SessionId, SessionStatus, Timestamp, ValidationError,
};

/// Maximum length of a session title.
pub const TITLE_MAX_LEN: usize = 200;

/// Maximum length of the presenter's Q&A prompt.
pub const QNA_PROMPT_MAX_LEN: usize = 200;

/// How the audience Q&A is framed for viewers.
///
/// `Audience` is free-form questions from the room; `Prompt` shows the
/// presenter's `qna_prompt` above the question list. Submission rules are
/// the same in both modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QnaMode {
    #[default]
    Audience,
    Prompt,
}

/// A live presentation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub code: JoinCode,
    pub title: Option<String>,
    pub status: SessionStatus,
    pub qna_open: bool,
    #[serde(default)]
    pub qna_mode: QnaMode,
    #[serde(default)]
    pub qna_prompt: Option<String>,
    /// Public viewer link, filled in when a base URL is configured.
    #[serde(default)]
    pub join_url: Option<String>,
    pub created_at: Timestamp,
}

impl Session {
    /// Creates an active session with Q&A closed.
    pub fn new(code: JoinCode, title: Option<String>) -> Self {
        Self {
            id: SessionId::new(),
            code,
            title,
            status: SessionStatus::Active,
            qna_open: false,
            qna_mode: QnaMode::Audience,
            qna_prompt: None,
            join_url: None,
            created_at: Timestamp::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_mutable()
    }

    /// Sets `join_url` to `{base}/join/{code}`, or clears it without a base.
    pub fn with_join_url(mut self, base: Option<&str>) -> Self {
        self.join_url = base.map(|base| format!("{}/join/{}", base, self.code));
        self
    }
}

/// Normalizes a requested title: blank becomes `None`.
pub fn session_title(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    optional_text("title", raw, TITLE_MAX_LEN)
}

/// Normalizes the presenter's Q&A prompt: blank becomes `None`.
pub fn qna_prompt_text(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    optional_text("qna_prompt", raw, QNA_PROMPT_MAX_LEN)
}
