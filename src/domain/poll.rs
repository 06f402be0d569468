//! Polls with a fixed list of options.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    label_list, required_text, OpenStatus, OptionId, PollId, SessionId, Timestamp,
    ValidationError,
};

pub const POLL_QUESTION_MAX_LEN: usize = 200;
pub const POLL_OPTION_MAX_LEN: usize = 100;
pub const POLL_MIN_OPTIONS: usize = 2;
pub const POLL_MAX_OPTIONS: usize = 10;

/// A single answer a poll offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub id: OptionId,
    pub label: String,
    pub votes: u32,
}

/// A poll. Votes are accepted only while it is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub id: PollId,
    pub session_id: SessionId,
    pub question: String,
    pub options: Vec<PollOption>,
    pub status: OpenStatus,
    pub allow_multiple: bool,
    pub created_at: Timestamp,
}

impl Poll {
    /// Creates a closed poll with zeroed options in the given order.
    pub fn new(session_id: SessionId, input: NewPoll) -> Self {
        Self {
            id: PollId::new(),
            session_id,
            question: input.question,
            options: input
                .options
                .into_iter()
                .map(|label| PollOption {
                    id: OptionId::new(),
                    label,
                    votes: 0,
                })
                .collect(),
            status: OpenStatus::Closed,
            allow_multiple: input.allow_multiple,
            created_at: Timestamp::now(),
        }
    }

    pub fn option(&self, id: &OptionId) -> Option<&PollOption> {
        self.options.iter().find(|o| &o.id == id)
    }

    pub fn option_mut(&mut self, id: &OptionId) -> Option<&mut PollOption> {
        self.options.iter_mut().find(|o| &o.id == id)
    }

    pub fn total_votes(&self) -> u32 {
        self.options.iter().map(|o| o.votes).sum()
    }
}

/// Validated input for creating a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPoll {
    question: String,
    options: Vec<String>,
    allow_multiple: bool,
}

impl NewPoll {
    pub fn new(
        question: &str,
        options: &[String],
        allow_multiple: bool,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            question: required_text("question", question, POLL_QUESTION_MAX_LEN)?,
            options: label_list(
                "options",
                options,
                POLL_MIN_OPTIONS,
                POLL_MAX_OPTIONS,
                POLL_OPTION_MAX_LEN,
            )?,
            allow_multiple,
        })
    }
}
