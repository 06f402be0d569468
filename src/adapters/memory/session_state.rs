//! One session's aggregate: its entities, vote ledgers and event log.
//!
//! Every method runs with the store lock held and validates before it
//! mutates, so a failed call leaves the aggregate untouched.

use std::collections::{HashMap, HashSet};

use crate::config::PollRevotePolicy;
use crate::domain::event::LiveEvent;
use crate::domain::foundation::{
    ClientId, ConflictReason, EntityKind, OpenStatus, OptionId, PollId, QnaPromptId, QuestionId,
    SessionStatus, StateMachine, StoreError, WordCloudId, WordId,
};
use crate::domain::poll::{NewPoll, Poll};
use crate::domain::prompt::{NewQnaPrompt, QnaPrompt};
use crate::domain::question::{NewQuestion, Question, QuestionStatus};
use crate::domain::session::{QnaMode, Session};
use crate::domain::snapshot::SessionSnapshot;
use crate::domain::word_cloud::{NewWordCloud, WordCloud, WordCloudTransition};

use super::event_log::EventLog;

/// Choices one client has made on one multi-choice entity.
type Ledger<K, V> = HashMap<K, HashMap<ClientId, HashSet<V>>>;

pub(super) struct SessionState {
    session: Session,
    questions: Vec<Question>,
    polls: Vec<Poll>,
    word_clouds: Vec<WordCloud>,
    prompts: Vec<QnaPrompt>,
    question_voters: HashMap<QuestionId, HashSet<ClientId>>,
    poll_votes: Ledger<PollId, OptionId>,
    word_votes: Ledger<WordCloudId, WordId>,
    events: EventLog,
}

impl SessionState {
    pub(super) fn new(session: Session, event_log_capacity: Option<usize>) -> Self {
        Self {
            session,
            questions: Vec::new(),
            polls: Vec::new(),
            word_clouds: Vec::new(),
            prompts: Vec::new(),
            question_voters: HashMap::new(),
            poll_votes: HashMap::new(),
            word_votes: HashMap::new(),
            events: EventLog::new(event_log_capacity),
        }
    }

    pub(super) fn session(&self) -> &Session {
        &self.session
    }

    fn ensure_active(&self) -> Result<(), StoreError> {
        if self.session.is_active() {
            Ok(())
        } else {
            Err(ConflictReason::SessionEnded.into())
        }
    }

    // === Session ===

    /// Ends the session and closes everything still open.
    pub(super) fn end(&mut self) -> Result<Session, StoreError> {
        self.session.status = self.session.status.transition_to(SessionStatus::Ended)?;
        self.session.qna_open = false;
        for poll in &mut self.polls {
            poll.status = OpenStatus::Closed;
        }
        for cloud in &mut self.word_clouds {
            cloud.status = OpenStatus::Closed;
        }
        for prompt in &mut self.prompts {
            prompt.status = OpenStatus::Closed;
        }
        Ok(self.session.clone())
    }

    pub(super) fn set_qna_open(&mut self, open: bool) -> Result<Session, StoreError> {
        self.ensure_active()?;
        self.session.qna_open = open;
        Ok(self.session.clone())
    }

    pub(super) fn set_qna_config(
        &mut self,
        mode: QnaMode,
        prompt: Option<String>,
    ) -> Result<Session, StoreError> {
        self.ensure_active()?;
        self.session.qna_mode = mode;
        self.session.qna_prompt = prompt;
        Ok(self.session.clone())
    }

    // === Questions ===

    pub(super) fn add_question(&mut self, input: NewQuestion) -> Result<Question, StoreError> {
        self.ensure_active()?;
        match input.prompt_id() {
            Some(prompt_id) => {
                let prompt = self
                    .prompts
                    .iter()
                    .find(|p| p.id == prompt_id)
                    .ok_or(StoreError::NotFound(EntityKind::QnaPrompt))?;
                if !prompt.status.is_open() {
                    return Err(ConflictReason::PromptClosed.into());
                }
            }
            None => {
                if !self.session.qna_open {
                    return Err(ConflictReason::QnaClosed.into());
                }
            }
        }

        let question = Question::new(self.session.id, input);
        self.questions.push(question.clone());
        Ok(question)
    }

    pub(super) fn set_question_status(
        &mut self,
        question_id: &QuestionId,
        status: QuestionStatus,
    ) -> Result<Question, StoreError> {
        self.ensure_active()?;
        let question = self
            .questions
            .iter_mut()
            .find(|q| q.id == *question_id)
            .ok_or(StoreError::NotFound(EntityKind::Question))?;
        question.status = question.status.transition_to(status)?;
        Ok(question.clone())
    }

    pub(super) fn vote_question(
        &mut self,
        question_id: &QuestionId,
        client_id: Option<&ClientId>,
    ) -> Result<Question, StoreError> {
        self.ensure_active()?;
        let question = self
            .questions
            .iter_mut()
            .find(|q| q.id == *question_id)
            .ok_or(StoreError::NotFound(EntityKind::Question))?;

        if let Some(client_id) = client_id {
            let voters = self.question_voters.entry(*question_id).or_default();
            if !voters.insert(client_id.clone()) {
                return Ok(question.clone());
            }
        }
        question.votes = question.votes.saturating_add(1);
        Ok(question.clone())
    }

    // === Polls ===

    pub(super) fn add_poll(&mut self, input: NewPoll) -> Result<Poll, StoreError> {
        self.ensure_active()?;
        let poll = Poll::new(self.session.id, input);
        self.polls.push(poll.clone());
        Ok(poll)
    }

    pub(super) fn set_poll_status(
        &mut self,
        poll_id: &PollId,
        status: OpenStatus,
    ) -> Result<Poll, StoreError> {
        self.ensure_active()?;
        let poll = self
            .polls
            .iter_mut()
            .find(|p| p.id == *poll_id)
            .ok_or(StoreError::NotFound(EntityKind::Poll))?;
        poll.status = poll.status.transition_to(status)?;
        Ok(poll.clone())
    }

    pub(super) fn vote_poll(
        &mut self,
        poll_id: &PollId,
        option_id: &OptionId,
        client_id: Option<&ClientId>,
        revote: PollRevotePolicy,
    ) -> Result<Poll, StoreError> {
        self.ensure_active()?;
        let poll = self
            .polls
            .iter_mut()
            .find(|p| p.id == *poll_id)
            .ok_or(StoreError::NotFound(EntityKind::Poll))?;
        if !poll.status.is_open() {
            return Err(ConflictReason::PollClosed.into());
        }
        if poll.option(option_id).is_none() {
            return Err(StoreError::NotFound(EntityKind::PollOption));
        }

        if let Some(client_id) = client_id {
            let chosen = self
                .poll_votes
                .entry(*poll_id)
                .or_default()
                .entry(client_id.clone())
                .or_default();
            if chosen.contains(option_id) {
                return Ok(poll.clone());
            }
            if !poll.allow_multiple && !chosen.is_empty() {
                match revote {
                    PollRevotePolicy::Reject => return Ok(poll.clone()),
                    PollRevotePolicy::Switch => {
                        for previous in chosen.drain() {
                            if let Some(option) = poll.option_mut(&previous) {
                                option.votes = option.votes.saturating_sub(1);
                            }
                        }
                    }
                }
            }
            chosen.insert(*option_id);
        }

        if let Some(option) = poll.option_mut(option_id) {
            option.votes = option.votes.saturating_add(1);
        }
        Ok(poll.clone())
    }

    // === Word clouds ===

    pub(super) fn add_word_cloud(&mut self, input: NewWordCloud) -> Result<WordCloud, StoreError> {
        self.ensure_active()?;
        let cloud = WordCloud::new(self.session.id, input);
        self.word_clouds.push(cloud.clone());
        Ok(cloud)
    }

    /// Opening a cloud closes every other open cloud in the same step.
    pub(super) fn set_word_cloud_status(
        &mut self,
        cloud_id: &WordCloudId,
        status: OpenStatus,
    ) -> Result<WordCloudTransition, StoreError> {
        self.ensure_active()?;
        let index = self
            .word_clouds
            .iter()
            .position(|w| w.id == *cloud_id)
            .ok_or(StoreError::NotFound(EntityKind::WordCloud))?;
        let current = self.word_clouds[index].status;
        let next = current.transition_to(status)?;

        let mut closed = Vec::new();
        if next.is_open() && !current.is_open() {
            for (i, other) in self.word_clouds.iter_mut().enumerate() {
                if i != index && other.status.is_open() {
                    other.status = OpenStatus::Closed;
                    closed.push(other.clone());
                }
            }
        }

        let cloud = &mut self.word_clouds[index];
        cloud.status = next;
        Ok(WordCloudTransition {
            cloud: cloud.clone(),
            closed,
        })
    }

    pub(super) fn vote_word_cloud(
        &mut self,
        cloud_id: &WordCloudId,
        word_id: &WordId,
        client_id: Option<&ClientId>,
    ) -> Result<WordCloud, StoreError> {
        self.ensure_active()?;
        let cloud = self
            .word_clouds
            .iter_mut()
            .find(|w| w.id == *cloud_id)
            .ok_or(StoreError::NotFound(EntityKind::WordCloud))?;
        if !cloud.status.is_open() {
            return Err(ConflictReason::WordCloudClosed.into());
        }
        if cloud.word_mut(word_id).is_none() {
            return Err(StoreError::NotFound(EntityKind::Word));
        }

        if let Some(client_id) = client_id {
            let chosen = self
                .word_votes
                .entry(*cloud_id)
                .or_default()
                .entry(client_id.clone())
                .or_default();
            if !chosen.insert(*word_id) {
                return Ok(cloud.clone());
            }
        }

        if let Some(word) = cloud.word_mut(word_id) {
            word.votes = word.votes.saturating_add(1);
        }
        Ok(cloud.clone())
    }

    // === Prompts ===

    pub(super) fn add_prompt(&mut self, input: NewQnaPrompt) -> Result<QnaPrompt, StoreError> {
        self.ensure_active()?;
        let prompt = QnaPrompt::new(self.session.id, input);
        self.prompts.push(prompt.clone());
        Ok(prompt)
    }

    pub(super) fn set_prompt_status(
        &mut self,
        prompt_id: &QnaPromptId,
        status: OpenStatus,
    ) -> Result<QnaPrompt, StoreError> {
        self.ensure_active()?;
        let prompt = self
            .prompts
            .iter_mut()
            .find(|p| p.id == *prompt_id)
            .ok_or(StoreError::NotFound(EntityKind::QnaPrompt))?;
        prompt.status = prompt.status.transition_to(status)?;
        Ok(prompt.clone())
    }

    // === Reads and events ===

    pub(super) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session: self.session.clone(),
            questions: self.questions.clone(),
            polls: self.polls.clone(),
            word_clouds: self.word_clouds.clone(),
            prompts: self.prompts.clone(),
        }
    }

    pub(super) fn record(&mut self, event: LiveEvent) {
        self.events.push(event);
    }

    pub(super) fn recent_events(&self, limit: usize) -> Vec<LiveEvent> {
        self.events.recent(limit)
    }
}
