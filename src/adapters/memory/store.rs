//! In-memory session store.
//!
//! All state lives behind one store-wide async mutex, so every operation is
//! linearizable against every other, across all sessions.
//!
//! ```text
//! InMemorySessionStore
//!   └── Mutex<StoreState>
//!         ├── sessions: SessionId -> SessionState   (entities, ledgers, event log)
//!         └── codes:    JoinCode  -> SessionId
//! ```
//!
//! Each `SessionState` is self-contained; replacing the outer mutex with one
//! lock per session (plus a short lock on the code index) only changes this
//! file.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::config::StoreConfig;
use crate::domain::event::LiveEvent;
use crate::domain::foundation::{
    ClientId, ConflictReason, EntityKind, JoinCode, OpenStatus, OptionId, PollId, QnaPromptId,
    QuestionId, SessionId, StoreError, WordCloudId, WordId,
};
use crate::domain::poll::{NewPoll, Poll};
use crate::domain::prompt::{NewQnaPrompt, QnaPrompt};
use crate::domain::question::{NewQuestion, Question, QuestionStatus};
use crate::domain::session::{QnaMode, Session};
use crate::domain::snapshot::SessionSnapshot;
use crate::domain::word_cloud::{NewWordCloud, WordCloud, WordCloudTransition};
use crate::ports::SessionStore;

use super::code_generator::{CodeGenerator, RandomCodeGenerator};
use super::session_state::SessionState;

#[derive(Default)]
struct StoreState {
    sessions: HashMap<SessionId, SessionState>,
    codes: HashMap<JoinCode, SessionId>,
}

impl StoreState {
    fn session(&self, id: &SessionId) -> Result<&SessionState, StoreError> {
        self.sessions
            .get(id)
            .ok_or(StoreError::NotFound(EntityKind::Session))
    }

    fn session_mut(&mut self, id: &SessionId) -> Result<&mut SessionState, StoreError> {
        self.sessions
            .get_mut(id)
            .ok_or(StoreError::NotFound(EntityKind::Session))
    }
}

/// Process-local store for every live session.
pub struct InMemorySessionStore {
    state: Mutex<StoreState>,
    codes: Box<dyn CodeGenerator>,
    config: StoreConfig,
}

impl InMemorySessionStore {
    /// Creates an empty store with random join codes.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_code_generator(config, RandomCodeGenerator)
    }

    /// Creates an empty store drawing join codes from `codes`.
    pub fn with_code_generator(config: StoreConfig, codes: impl CodeGenerator + 'static) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            codes: Box::new(codes),
            config,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_session(&self, title: Option<String>) -> Result<Session, StoreError> {
        let mut state = self.state.lock().await;

        for attempt in 1..=self.config.code_attempts {
            let code = self.codes.generate();
            if state.codes.contains_key(&code) {
                tracing::debug!(attempt, code = %code, "join code collision, retrying");
                continue;
            }

            let session = Session::new(code.clone(), title);
            state.codes.insert(code, session.id);
            state.sessions.insert(
                session.id,
                SessionState::new(session.clone(), self.config.event_log_capacity),
            );
            tracing::info!(session_id = %session.id, code = %session.code, "session created");
            return Ok(session);
        }

        tracing::warn!(
            attempts = self.config.code_attempts,
            "could not allocate a unique join code"
        );
        Err(ConflictReason::CodeSpaceExhausted.into())
    }

    async fn get_session(&self, id: &SessionId) -> Result<Session, StoreError> {
        let state = self.state.lock().await;
        Ok(state.session(id)?.session().clone())
    }

    async fn get_session_by_code(&self, code: &JoinCode) -> Result<Session, StoreError> {
        let state = self.state.lock().await;
        let id = state
            .codes
            .get(code)
            .ok_or(StoreError::NotFound(EntityKind::Session))?;
        Ok(state.session(id)?.session().clone())
    }

    async fn end_session(&self, id: &SessionId) -> Result<Session, StoreError> {
        let mut state = self.state.lock().await;
        let session = state.session_mut(id)?.end()?;
        tracing::info!(session_id = %id, "session ended");
        Ok(session)
    }

    async fn set_qna_open(&self, id: &SessionId, open: bool) -> Result<Session, StoreError> {
        let mut state = self.state.lock().await;
        state.session_mut(id)?.set_qna_open(open)
    }

    async fn set_qna_config(
        &self,
        id: &SessionId,
        mode: QnaMode,
        prompt: Option<String>,
    ) -> Result<Session, StoreError> {
        let mut state = self.state.lock().await;
        state.session_mut(id)?.set_qna_config(mode, prompt)
    }

    async fn create_question(
        &self,
        session_id: &SessionId,
        input: NewQuestion,
    ) -> Result<Question, StoreError> {
        let mut state = self.state.lock().await;
        state.session_mut(session_id)?.add_question(input)
    }

    async fn set_question_status(
        &self,
        session_id: &SessionId,
        question_id: &QuestionId,
        status: QuestionStatus,
    ) -> Result<Question, StoreError> {
        let mut state = self.state.lock().await;
        state
            .session_mut(session_id)?
            .set_question_status(question_id, status)
    }

    async fn vote_question(
        &self,
        session_id: &SessionId,
        question_id: &QuestionId,
        client_id: Option<&ClientId>,
    ) -> Result<Question, StoreError> {
        let mut state = self.state.lock().await;
        state
            .session_mut(session_id)?
            .vote_question(question_id, client_id)
    }

    async fn create_poll(
        &self,
        session_id: &SessionId,
        input: NewPoll,
    ) -> Result<Poll, StoreError> {
        let mut state = self.state.lock().await;
        state.session_mut(session_id)?.add_poll(input)
    }

    async fn set_poll_status(
        &self,
        session_id: &SessionId,
        poll_id: &PollId,
        status: OpenStatus,
    ) -> Result<Poll, StoreError> {
        let mut state = self.state.lock().await;
        state.session_mut(session_id)?.set_poll_status(poll_id, status)
    }

    async fn vote_poll(
        &self,
        session_id: &SessionId,
        poll_id: &PollId,
        option_id: &OptionId,
        client_id: Option<&ClientId>,
    ) -> Result<Poll, StoreError> {
        let mut state = self.state.lock().await;
        state.session_mut(session_id)?.vote_poll(
            poll_id,
            option_id,
            client_id,
            self.config.poll_revote,
        )
    }

    async fn create_word_cloud(
        &self,
        session_id: &SessionId,
        input: NewWordCloud,
    ) -> Result<WordCloud, StoreError> {
        let mut state = self.state.lock().await;
        state.session_mut(session_id)?.add_word_cloud(input)
    }

    async fn set_word_cloud_status(
        &self,
        session_id: &SessionId,
        cloud_id: &WordCloudId,
        status: OpenStatus,
    ) -> Result<WordCloudTransition, StoreError> {
        let mut state = self.state.lock().await;
        state
            .session_mut(session_id)?
            .set_word_cloud_status(cloud_id, status)
    }

    async fn vote_word_cloud(
        &self,
        session_id: &SessionId,
        cloud_id: &WordCloudId,
        word_id: &WordId,
        client_id: Option<&ClientId>,
    ) -> Result<WordCloud, StoreError> {
        let mut state = self.state.lock().await;
        state
            .session_mut(session_id)?
            .vote_word_cloud(cloud_id, word_id, client_id)
    }

    async fn create_qna_prompt(
        &self,
        session_id: &SessionId,
        input: NewQnaPrompt,
    ) -> Result<QnaPrompt, StoreError> {
        let mut state = self.state.lock().await;
        state.session_mut(session_id)?.add_prompt(input)
    }

    async fn set_qna_prompt_status(
        &self,
        session_id: &SessionId,
        prompt_id: &QnaPromptId,
        status: OpenStatus,
    ) -> Result<QnaPrompt, StoreError> {
        let mut state = self.state.lock().await;
        state
            .session_mut(session_id)?
            .set_prompt_status(prompt_id, status)
    }

    async fn snapshot(&self, session_id: &SessionId) -> Result<SessionSnapshot, StoreError> {
        let state = self.state.lock().await;
        Ok(state.session(session_id)?.snapshot())
    }

    async fn record_event(
        &self,
        session_id: &SessionId,
        event: LiveEvent,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.session_mut(session_id)?.record(event);
        Ok(())
    }

    async fn recent_events(
        &self,
        session_id: &SessionId,
        limit: usize,
    ) -> Result<Vec<LiveEvent>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.session(session_id)?.recent_events(limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::EventKind;
    use std::collections::{HashSet, VecDeque};
    use std::sync::{Arc, Mutex as StdMutex};

    /// Hands out a fixed sequence of codes, repeating the last one.
    struct ScriptedCodes(StdMutex<VecDeque<&'static str>>);

    impl ScriptedCodes {
        fn new(codes: &[&'static str]) -> Self {
            Self(StdMutex::new(codes.iter().copied().collect()))
        }
    }

    impl CodeGenerator for ScriptedCodes {
        fn generate(&self) -> JoinCode {
            let mut codes = self.0.lock().unwrap();
            let next = if codes.len() > 1 {
                codes.pop_front().unwrap()
            } else {
                codes[0]
            };
            JoinCode::parse(next).unwrap()
        }
    }

    fn store() -> InMemorySessionStore {
        InMemorySessionStore::default()
    }

    #[tokio::test]
    async fn create_then_get_by_id_and_code() {
        let store = store();
        let session = store.create_session(Some("Talk".into())).await.unwrap();

        assert_eq!(store.get_session(&session.id).await.unwrap(), session);
        let lower = JoinCode::parse(&session.code.as_str().to_lowercase()).unwrap();
        assert_eq!(store.get_session_by_code(&lower).await.unwrap().id, session.id);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let store = store();
        let result = store.get_session(&SessionId::new()).await;
        assert_eq!(result, Err(StoreError::NotFound(EntityKind::Session)));

        let code = JoinCode::parse("ZZZZZZ").unwrap();
        assert!(store.get_session_by_code(&code).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn code_collision_retries_until_unique() {
        let store = InMemorySessionStore::with_code_generator(
            StoreConfig::default(),
            ScriptedCodes::new(&["AAAAAA", "AAAAAA", "AAAAAA", "BBBBBB"]),
        );
        let first = store.create_session(None).await.unwrap();
        let second = store.create_session(None).await.unwrap();

        assert_eq!(first.code.as_str(), "AAAAAA");
        assert_eq!(second.code.as_str(), "BBBBBB");
    }

    #[tokio::test]
    async fn exhausted_code_space_is_conflict() {
        let config = StoreConfig {
            code_attempts: 3,
            ..Default::default()
        };
        let store =
            InMemorySessionStore::with_code_generator(config, ScriptedCodes::new(&["AAAAAA"]));
        store.create_session(None).await.unwrap();

        let result = store.create_session(None).await;
        assert_eq!(
            result,
            Err(StoreError::Conflict(ConflictReason::CodeSpaceExhausted))
        );
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn child_under_wrong_session_is_not_found() {
        let store = store();
        let owner = store.create_session(None).await.unwrap();
        let other = store.create_session(None).await.unwrap();
        store.set_qna_open(&owner.id, true).await.unwrap();
        let question = store
            .create_question(&owner.id, NewQuestion::new("Q", None).unwrap())
            .await
            .unwrap();

        let result = store.vote_question(&other.id, &question.id, None).await;
        assert_eq!(result, Err(StoreError::NotFound(EntityKind::Question)));
    }

    #[tokio::test]
    async fn concurrent_identified_votes_count_once() {
        let store = Arc::new(store());
        let session = store.create_session(None).await.unwrap();
        store.set_qna_open(&session.id, true).await.unwrap();
        let question = store
            .create_question(&session.id, NewQuestion::new("Q", None).unwrap())
            .await
            .unwrap();

        let (session_id, question_id) = (session.id, question.id);

        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            let client = ClientId::new(format!("client-{}", i % 4)).unwrap();
            handles.push(tokio::spawn(async move {
                store
                    .vote_question(&session_id, &question_id, Some(&client))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let snapshot = store.snapshot(&session_id).await.unwrap();
        assert_eq!(snapshot.questions[0].votes, 4);
    }

    #[tokio::test]
    async fn switch_policy_is_a_store_setting() {
        let config = StoreConfig {
            poll_revote: crate::config::PollRevotePolicy::Switch,
            ..Default::default()
        };
        let store = InMemorySessionStore::new(config);
        let session = store.create_session(None).await.unwrap();
        let labels = vec!["A".to_string(), "B".to_string()];
        let poll = store
            .create_poll(&session.id, NewPoll::new("Pick", &labels, false).unwrap())
            .await
            .unwrap();
        store
            .set_poll_status(&session.id, &poll.id, OpenStatus::Open)
            .await
            .unwrap();
        let client = ClientId::new("c").unwrap();

        store
            .vote_poll(&session.id, &poll.id, &poll.options[0].id, Some(&client))
            .await
            .unwrap();
        let after = store
            .vote_poll(&session.id, &poll.id, &poll.options[1].id, Some(&client))
            .await
            .unwrap();
        assert_eq!(after.options[0].votes, 0);
        assert_eq!(after.options[1].votes, 1);
    }

    #[tokio::test]
    async fn qna_config_is_stored_and_kept_by_reads() {
        let store = store();
        let session = store.create_session(None).await.unwrap();

        let updated = store
            .set_qna_config(&session.id, QnaMode::Prompt, Some("What should we cover?".into()))
            .await
            .unwrap();
        assert_eq!(updated.qna_mode, QnaMode::Prompt);
        assert!(!updated.qna_open);

        let snapshot = store.snapshot(&session.id).await.unwrap();
        assert_eq!(snapshot.session.qna_prompt.as_deref(), Some("What should we cover?"));

        let reset = store
            .set_qna_config(&session.id, QnaMode::Audience, None)
            .await
            .unwrap();
        assert_eq!(reset.qna_mode, QnaMode::Audience);
        assert_eq!(reset.qna_prompt, None);
    }

    #[tokio::test]
    async fn qna_config_on_ended_or_unknown_session_fails() {
        let store = store();
        let session = store.create_session(None).await.unwrap();
        store.end_session(&session.id).await.unwrap();

        let ended = store.set_qna_config(&session.id, QnaMode::Prompt, None).await;
        assert_eq!(ended, Err(StoreError::Conflict(ConflictReason::SessionEnded)));

        let missing = store
            .set_qna_config(&SessionId::new(), QnaMode::Prompt, None)
            .await;
        assert_eq!(missing, Err(StoreError::NotFound(EntityKind::Session)));
    }

    #[tokio::test]
    async fn ended_session_stays_readable() {
        let store = store();
        let session = store.create_session(None).await.unwrap();
        store.end_session(&session.id).await.unwrap();

        assert!(!store.get_session(&session.id).await.unwrap().is_active());
        assert!(store.snapshot(&session.id).await.is_ok());
        let result = store.set_qna_open(&session.id, true).await;
        assert_eq!(result, Err(StoreError::Conflict(ConflictReason::SessionEnded)));
    }

    #[tokio::test]
    async fn events_are_logged_per_session() {
        let store = store();
        let a = store.create_session(None).await.unwrap();
        let b = store.create_session(None).await.unwrap();

        store
            .record_event(&a.id, LiveEvent::qna_toggled(&a))
            .await
            .unwrap();
        store
            .record_event(&a.id, LiveEvent::session_ended(&a))
            .await
            .unwrap();

        let kinds: Vec<_> = store
            .recent_events(&a.id, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.kind)
            .collect();
        assert_eq!(kinds, vec![EventKind::QnaClosed, EventKind::SessionEnded]);
        assert!(store.recent_events(&b.id, 10).await.unwrap().is_empty());

        let missing = store
            .record_event(&SessionId::new(), LiveEvent::session_ended(&a))
            .await;
        assert!(missing.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn generated_codes_are_distinct() {
        let store = store();
        let mut codes = HashSet::new();
        for _ in 0..200 {
            let session = store.create_session(None).await.unwrap();
            assert!(codes.insert(session.code));
        }
    }
}
