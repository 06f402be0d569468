//! Consistent read of one session's full aggregate.

use serde::{Deserialize, Serialize};

use super::poll::Poll;
use super::prompt::QnaPrompt;
use super::question::Question;
use super::session::Session;
use super::word_cloud::WordCloud;

/// Everything a newly joined viewer needs to render a session.
///
/// Children are ordered by creation time, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session: Session,
    pub questions: Vec<Question>,
    pub polls: Vec<Poll>,
    pub word_clouds: Vec<WordCloud>,
    pub prompts: Vec<QnaPrompt>,
}

impl SessionSnapshot {
    pub fn open_word_clouds(&self) -> impl Iterator<Item = &WordCloud> {
        self.word_clouds.iter().filter(|w| w.status.is_open())
    }
}
