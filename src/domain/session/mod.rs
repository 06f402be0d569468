//! Session domain module.

mod aggregate;

pub use aggregate::{
    qna_prompt_text, session_title, QnaMode, Session, QNA_PROMPT_MAX_LEN, TITLE_MAX_LEN,
};
