//! Session store port.
//!
//! Owns every entity of every session and exposes them through atomic
//! operations. Each call is indivisible with respect to every other call;
//! callers never observe a partial update.
//!
//! # Design
//!
//! - **Two outcomes**: operations fail only with `StoreError::NotFound` or
//!   `StoreError::Conflict`; both reach the boundary unchanged
//! - **Public views**: every operation returns owned copies, never handles
//!   into store state
//! - **No events**: recording an event is a separate call made by the
//!   broadcast coordinator after a mutation succeeds

use async_trait::async_trait;

use crate::domain::event::LiveEvent;
use crate::domain::foundation::{
    ClientId, JoinCode, OpenStatus, OptionId, PollId, QnaPromptId, QuestionId, SessionId,
    StoreError, WordCloudId, WordId,
};
use crate::domain::poll::{NewPoll, Poll};
use crate::domain::prompt::{NewQnaPrompt, QnaPrompt};
use crate::domain::question::{NewQuestion, Question, QuestionStatus};
use crate::domain::session::{QnaMode, Session};
use crate::domain::snapshot::SessionSnapshot;
use crate::domain::word_cloud::{NewWordCloud, WordCloud, WordCloudTransition};

/// Store port for all live session state.
///
/// A child entity addressed under the wrong session is `NotFound`, exactly
/// as if it did not exist. Every mutation on an ended session fails with
/// `Conflict(SessionEnded)`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    // ---- sessions ----

    /// Create an active session with a freshly allocated join code.
    ///
    /// # Errors
    ///
    /// - `Conflict(CodeSpaceExhausted)` if no unused code was found
    async fn create_session(&self, title: Option<String>) -> Result<Session, StoreError>;

    async fn get_session(&self, id: &SessionId) -> Result<Session, StoreError>;

    async fn get_session_by_code(&self, code: &JoinCode) -> Result<Session, StoreError>;

    /// End a session, closing Q&A and every open item in the same step.
    async fn end_session(&self, id: &SessionId) -> Result<Session, StoreError>;

    async fn set_qna_open(&self, id: &SessionId, open: bool) -> Result<Session, StoreError>;

    /// Set how Q&A is framed. `prompt` is stored as given; callers
    /// normalize it first.
    async fn set_qna_config(
        &self,
        id: &SessionId,
        mode: QnaMode,
        prompt: Option<String>,
    ) -> Result<Session, StoreError>;

    // ---- questions ----

    /// Submit a question.
    ///
    /// # Errors
    ///
    /// - `Conflict(QnaClosed)` without a prompt while Q&A is closed
    /// - `NotFound(QnaPrompt)` / `Conflict(PromptClosed)` for a bad prompt
    async fn create_question(
        &self,
        session_id: &SessionId,
        input: NewQuestion,
    ) -> Result<Question, StoreError>;

    async fn set_question_status(
        &self,
        session_id: &SessionId,
        question_id: &QuestionId,
        status: QuestionStatus,
    ) -> Result<Question, StoreError>;

    /// Upvote a question. Identified voters count once; anonymous calls
    /// always count.
    async fn vote_question(
        &self,
        session_id: &SessionId,
        question_id: &QuestionId,
        client_id: Option<&ClientId>,
    ) -> Result<Question, StoreError>;

    // ---- polls ----

    async fn create_poll(&self, session_id: &SessionId, input: NewPoll)
        -> Result<Poll, StoreError>;

    async fn set_poll_status(
        &self,
        session_id: &SessionId,
        poll_id: &PollId,
        status: OpenStatus,
    ) -> Result<Poll, StoreError>;

    /// Vote for one option.
    ///
    /// # Errors
    ///
    /// - `Conflict(PollClosed)` unless the poll is open
    /// - `NotFound(PollOption)` for an option the poll does not have
    async fn vote_poll(
        &self,
        session_id: &SessionId,
        poll_id: &PollId,
        option_id: &OptionId,
        client_id: Option<&ClientId>,
    ) -> Result<Poll, StoreError>;

    // ---- word clouds ----

    async fn create_word_cloud(
        &self,
        session_id: &SessionId,
        input: NewWordCloud,
    ) -> Result<WordCloud, StoreError>;

    /// Change a word cloud's status. Opening one closes every other open
    /// cloud of the session; those are returned in `closed`.
    async fn set_word_cloud_status(
        &self,
        session_id: &SessionId,
        cloud_id: &WordCloudId,
        status: OpenStatus,
    ) -> Result<WordCloudTransition, StoreError>;

    async fn vote_word_cloud(
        &self,
        session_id: &SessionId,
        cloud_id: &WordCloudId,
        word_id: &WordId,
        client_id: Option<&ClientId>,
    ) -> Result<WordCloud, StoreError>;

    // ---- prompts ----

    async fn create_qna_prompt(
        &self,
        session_id: &SessionId,
        input: NewQnaPrompt,
    ) -> Result<QnaPrompt, StoreError>;

    async fn set_qna_prompt_status(
        &self,
        session_id: &SessionId,
        prompt_id: &QnaPromptId,
        status: OpenStatus,
    ) -> Result<QnaPrompt, StoreError>;

    // ---- reads and event log ----

    /// Read the whole aggregate of one session as of a single instant.
    async fn snapshot(&self, session_id: &SessionId) -> Result<SessionSnapshot, StoreError>;

    /// Append an event to the session's log.
    async fn record_event(&self, session_id: &SessionId, event: LiveEvent)
        -> Result<(), StoreError>;

    /// The newest `limit` events, oldest first.
    async fn recent_events(
        &self,
        session_id: &SessionId,
        limit: usize,
    ) -> Result<Vec<LiveEvent>, StoreError>;
}
