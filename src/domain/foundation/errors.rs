//! Error types for the domain layer.
//!
//! The store contract has exactly two recoverable outcomes: something was
//! not found, or a business rule refused the operation. Input validation
//! happens before the store is reached and has its own type.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must not exceed {max} characters")]
    TooLong { field: String, max: usize },

    #[error("Field '{field}' must contain between {min} and {max} entries, got {actual}")]
    WrongCount {
        field: String,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates a length limit validation error.
    pub fn too_long(field: impl Into<String>, max: usize) -> Self {
        ValidationError::TooLong {
            field: field.into(),
            max,
        }
    }

    /// Creates a collection size validation error.
    pub fn wrong_count(field: impl Into<String>, min: usize, max: usize, actual: usize) -> Self {
        ValidationError::WrongCount {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Kind of entity a lookup failed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Session,
    Question,
    Poll,
    PollOption,
    WordCloud,
    Word,
    QnaPrompt,
}

impl EntityKind {
    fn code(&self) -> &'static str {
        match self {
            EntityKind::Session => "SESSION_NOT_FOUND",
            EntityKind::Question => "QUESTION_NOT_FOUND",
            EntityKind::Poll => "POLL_NOT_FOUND",
            EntityKind::PollOption => "OPTION_NOT_FOUND",
            EntityKind::WordCloud => "WORD_CLOUD_NOT_FOUND",
            EntityKind::Word => "WORD_NOT_FOUND",
            EntityKind::QnaPrompt => "PROMPT_NOT_FOUND",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Session => "session",
            EntityKind::Question => "question",
            EntityKind::Poll => "poll",
            EntityKind::PollOption => "option",
            EntityKind::WordCloud => "word cloud",
            EntityKind::Word => "word",
            EntityKind::QnaPrompt => "prompt",
        };
        write!(f, "{}", s)
    }
}

/// Business rule that refused a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ConflictReason {
    #[error("q&a is closed")]
    QnaClosed,

    #[error("prompt is closed")]
    PromptClosed,

    #[error("poll is closed")]
    PollClosed,

    #[error("word cloud is closed")]
    WordCloudClosed,

    #[error("session has ended")]
    SessionEnded,

    #[error("cannot move from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("failed to allocate session code")]
    CodeSpaceExhausted,
}

impl ConflictReason {
    fn code(&self) -> &'static str {
        match self {
            ConflictReason::QnaClosed => "QNA_CLOSED",
            ConflictReason::PromptClosed => "PROMPT_CLOSED",
            ConflictReason::PollClosed => "POLL_CLOSED",
            ConflictReason::WordCloudClosed => "WORD_CLOUD_CLOSED",
            ConflictReason::SessionEnded => "SESSION_ENDED",
            ConflictReason::InvalidTransition { .. } => "INVALID_TRANSITION",
            ConflictReason::CodeSpaceExhausted => "CODE_SPACE_EXHAUSTED",
        }
    }
}

/// Recoverable failure of a store operation.
///
/// Both variants propagate unchanged to the boundary; nothing inside the
/// store retries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Missing entity, or an entity that does not belong to the stated session.
    #[error("{0} not found")]
    NotFound(EntityKind),

    /// Business-rule violation.
    #[error(transparent)]
    Conflict(#[from] ConflictReason),
}

impl StoreError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound(kind) => kind.code(),
            StoreError::Conflict(reason) => reason.code(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<EntityKind> for StoreError {
    fn from(kind: EntityKind) -> Self {
        StoreError::NotFound(kind)
    }
}
