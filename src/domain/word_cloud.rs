//! Word clouds: a handful of words the audience votes up.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    label_list, optional_text, OpenStatus, SessionId, Timestamp, ValidationError, WordCloudId,
    WordId,
};

pub const WORD_CLOUD_PROMPT_MAX_LEN: usize = 200;
pub const WORD_MAX_LEN: usize = 50;
pub const WORD_CLOUD_MIN_WORDS: usize = 2;
pub const WORD_CLOUD_MAX_WORDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    pub label: String,
    pub votes: u32,
}

/// A word cloud. At most one per session is open at any instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCloud {
    pub id: WordCloudId,
    pub session_id: SessionId,
    pub prompt: Option<String>,
    pub words: Vec<Word>,
    pub status: OpenStatus,
    pub created_at: Timestamp,
}

impl WordCloud {
    pub fn new(session_id: SessionId, input: NewWordCloud) -> Self {
        Self {
            id: WordCloudId::new(),
            session_id,
            prompt: input.prompt,
            words: input
                .words
                .into_iter()
                .map(|label| Word {
                    id: WordId::new(),
                    label,
                    votes: 0,
                })
                .collect(),
            status: OpenStatus::Closed,
            created_at: Timestamp::now(),
        }
    }

    pub fn word_mut(&mut self, id: &WordId) -> Option<&mut Word> {
        self.words.iter_mut().find(|w| &w.id == id)
    }
}

/// Validated input for creating a word cloud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWordCloud {
    prompt: Option<String>,
    words: Vec<String>,
}

impl NewWordCloud {
    pub fn new(prompt: Option<&str>, words: &[String]) -> Result<Self, ValidationError> {
        Ok(Self {
            prompt: optional_text("prompt", prompt, WORD_CLOUD_PROMPT_MAX_LEN)?,
            words: label_list(
                "words",
                words,
                WORD_CLOUD_MIN_WORDS,
                WORD_CLOUD_MAX_WORDS,
                WORD_MAX_LEN,
            )?,
        })
    }
}

/// Result of a word-cloud status change.
///
/// `closed` lists the other clouds of the same session that the change shut,
/// so the caller can announce them before announcing `cloud`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCloudTransition {
    pub cloud: WordCloud,
    pub closed: Vec<WordCloud>,
}
