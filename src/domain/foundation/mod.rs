//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, status enums, error types and the
//! state machine trait that form the vocabulary of the live session domain.

mod errors;
mod ids;
mod session_status;
mod state_machine;
mod text;
mod timestamp;

pub use errors::{ConflictReason, EntityKind, StoreError, ValidationError};
pub use ids::{
    ClientId, JoinCode, OptionId, PollId, QnaPromptId, QuestionId, SessionId, WordCloudId,
    WordId, CLIENT_ID_MAX_LEN, JOIN_CODE_ALPHABET, JOIN_CODE_LEN,
};
pub use session_status::{OpenStatus, SessionStatus};
pub use state_machine::StateMachine;
pub use text::{label_list, optional_text, required_text};
pub use timestamp::Timestamp;
