//! Domain layer containing the entity records and value types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, join codes, statuses, errors)
//! - `session` - Session root record
//! - `question` - Audience questions and moderation status
//! - `poll` - Polls and their options
//! - `word_cloud` - Word clouds and their words
//! - `prompt` - Q&A prompts
//! - `snapshot` - Consistent aggregate read of one session
//! - `event` - Live events broadcast to viewers

pub mod event;
pub mod foundation;
pub mod poll;
pub mod prompt;
pub mod question;
pub mod session;
pub mod snapshot;
pub mod word_cloud;
