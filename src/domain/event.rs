//! Live events - the unit of broadcast and of the per-session event log.
//!
//! # Wire format
//!
//! ```json
//! { "type": "question_submitted", "payload": { "question": { ... } }, "ts": "2026-01-01T00:00:00Z" }
//! ```
//!
//! The payload always wraps the affected entity under a single key
//! (`session`, `question`, `poll`, `word_cloud`, `prompt` or `snapshot`).

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use super::foundation::{OpenStatus, Timestamp};
use super::poll::Poll;
use super::prompt::QnaPrompt;
use super::question::{Question, QuestionStatus};
use super::session::Session;
use super::snapshot::SessionSnapshot;
use super::word_cloud::{WordCloud, WordCloudTransition};

/// Type tag of a live event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SessionSnapshot,
    SessionEnded,
    QnaOpened,
    QnaClosed,
    QnaConfigUpdated,
    QuestionSubmitted,
    QuestionApproved,
    QuestionHidden,
    QuestionPending,
    QuestionVoteUpdated,
    PollCreated,
    PollOpened,
    PollClosed,
    PollVoteUpdated,
    WordCloudCreated,
    WordCloudOpened,
    WordCloudClosed,
    WordCloudVoteUpdated,
    QnaPromptCreated,
    QnaPromptOpened,
    QnaPromptClosed,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::SessionSnapshot => "session_snapshot",
            EventKind::SessionEnded => "session_ended",
            EventKind::QnaOpened => "qna_opened",
            EventKind::QnaClosed => "qna_closed",
            EventKind::QnaConfigUpdated => "qna_config_updated",
            EventKind::QuestionSubmitted => "question_submitted",
            EventKind::QuestionApproved => "question_approved",
            EventKind::QuestionHidden => "question_hidden",
            EventKind::QuestionPending => "question_pending",
            EventKind::QuestionVoteUpdated => "question_vote_updated",
            EventKind::PollCreated => "poll_created",
            EventKind::PollOpened => "poll_opened",
            EventKind::PollClosed => "poll_closed",
            EventKind::PollVoteUpdated => "poll_vote_updated",
            EventKind::WordCloudCreated => "word_cloud_created",
            EventKind::WordCloudOpened => "word_cloud_opened",
            EventKind::WordCloudClosed => "word_cloud_closed",
            EventKind::WordCloudVoteUpdated => "word_cloud_vote_updated",
            EventKind::QnaPromptCreated => "qna_prompt_created",
            EventKind::QnaPromptOpened => "qna_prompt_opened",
            EventKind::QnaPromptClosed => "qna_prompt_closed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One broadcast unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub payload: Value,
    pub ts: Timestamp,
}

impl LiveEvent {
    /// Creates an event stamped with the current time.
    pub fn new(kind: EventKind, payload: Value) -> Self {
        Self {
            kind,
            payload,
            ts: Timestamp::now(),
        }
    }

    pub fn snapshot(snapshot: &SessionSnapshot) -> Self {
        Self::new(EventKind::SessionSnapshot, json!({ "snapshot": snapshot }))
    }

    pub fn session_ended(session: &Session) -> Self {
        Self::new(EventKind::SessionEnded, json!({ "session": session }))
    }

    pub fn qna_toggled(session: &Session) -> Self {
        let kind = if session.qna_open {
            EventKind::QnaOpened
        } else {
            EventKind::QnaClosed
        };
        Self::new(kind, json!({ "session": session }))
    }

    pub fn qna_config_updated(session: &Session) -> Self {
        Self::new(EventKind::QnaConfigUpdated, json!({ "session": session }))
    }

    pub fn question_submitted(question: &Question) -> Self {
        Self::new(EventKind::QuestionSubmitted, json!({ "question": question }))
    }

    /// Event announcing a question's current moderation status.
    pub fn question_status(question: &Question) -> Self {
        let kind = match question.status {
            QuestionStatus::Pending => EventKind::QuestionPending,
            QuestionStatus::Approved => EventKind::QuestionApproved,
            QuestionStatus::Hidden => EventKind::QuestionHidden,
        };
        Self::new(kind, json!({ "question": question }))
    }

    pub fn question_voted(question: &Question) -> Self {
        Self::new(EventKind::QuestionVoteUpdated, json!({ "question": question }))
    }

    pub fn poll_created(poll: &Poll) -> Self {
        Self::new(EventKind::PollCreated, json!({ "poll": poll }))
    }

    pub fn poll_status(poll: &Poll) -> Self {
        let kind = match poll.status {
            OpenStatus::Open => EventKind::PollOpened,
            OpenStatus::Closed => EventKind::PollClosed,
        };
        Self::new(kind, json!({ "poll": poll }))
    }

    pub fn poll_voted(poll: &Poll) -> Self {
        Self::new(EventKind::PollVoteUpdated, json!({ "poll": poll }))
    }

    pub fn word_cloud_created(cloud: &WordCloud) -> Self {
        Self::new(EventKind::WordCloudCreated, json!({ "word_cloud": cloud }))
    }

    pub fn word_cloud_status(cloud: &WordCloud) -> Self {
        let kind = match cloud.status {
            OpenStatus::Open => EventKind::WordCloudOpened,
            OpenStatus::Closed => EventKind::WordCloudClosed,
        };
        Self::new(kind, json!({ "word_cloud": cloud }))
    }

    pub fn word_cloud_voted(cloud: &WordCloud) -> Self {
        Self::new(EventKind::WordCloudVoteUpdated, json!({ "word_cloud": cloud }))
    }

    pub fn prompt_created(prompt: &QnaPrompt) -> Self {
        Self::new(EventKind::QnaPromptCreated, json!({ "prompt": prompt }))
    }

    pub fn prompt_status(prompt: &QnaPrompt) -> Self {
        let kind = match prompt.status {
            OpenStatus::Open => EventKind::QnaPromptOpened,
            OpenStatus::Closed => EventKind::QnaPromptClosed,
        };
        Self::new(kind, json!({ "prompt": prompt }))
    }
}

impl WordCloudTransition {
    /// Events for this transition: auto-closed clouds first, then the target.
    pub fn events(&self) -> Vec<LiveEvent> {
        let mut events: Vec<LiveEvent> =
            self.closed.iter().map(LiveEvent::word_cloud_status).collect();
        events.push(LiveEvent::word_cloud_status(&self.cloud));
        events
    }
}
