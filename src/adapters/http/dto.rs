//! Request and response DTOs.
//!
//! Entities are returned as-is; only requests and a few envelopes need
//! their own types.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ClientId, ValidationError};
use crate::domain::session::QnaMode;

use super::error::ApiError;

/// Default and maximum number of events returned by the event log endpoint.
pub const DEFAULT_EVENT_LIMIT: usize = 50;
pub const MAX_EVENT_LIMIT: usize = 500;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QnaConfigRequest {
    pub mode: QnaMode,
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuestionRequest {
    pub text: String,
    #[serde(default)]
    pub prompt_id: Option<String>,
}

/// Body of a question upvote. An absent client id votes anonymously.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoteRequest {
    #[serde(default)]
    pub client_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePollRequest {
    pub question: String,
    pub options: Vec<String>,
    #[serde(default)]
    pub allow_multiple: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollVoteRequest {
    pub option_id: String,
    #[serde(default)]
    pub client_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateWordCloudRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    pub words: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WordVoteRequest {
    pub word_id: String,
    #[serde(default)]
    pub client_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateQnaPromptRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsQuery {
    pub limit: Option<usize>,
}

impl EventsQuery {
    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_EVENT_LIMIT)
            .min(MAX_EVENT_LIMIT)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Parse an identifier taken from a path or body.
pub fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {} ID", what)))
}

/// Decode a body that may be left out entirely.
///
/// An empty body yields the default request; anything else must be valid
/// JSON for `T`.
pub fn optional_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))
}

/// A blank client id is treated as no client id.
pub fn voter(raw: Option<String>) -> Result<Option<ClientId>, ValidationError> {
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| ClientId::new(s.trim()))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(parse_id::<SessionId>("nope", "session").is_err());
        let id = SessionId::new();
        assert_eq!(parse_id::<SessionId>(&id.to_string(), "session").unwrap(), id);
    }

    #[test]
    fn blank_voter_is_anonymous() {
        assert_eq!(voter(None).unwrap(), None);
        assert_eq!(voter(Some("  ".into())).unwrap(), None);
        assert_eq!(voter(Some("a".into())).unwrap().unwrap().as_str(), "a");
    }

    #[test]
    fn empty_optional_body_is_default() {
        let req: VoteRequest = optional_body(b"").unwrap();
        assert_eq!(req.client_id, None);
        let req: VoteRequest = optional_body(b" \n").unwrap();
        assert_eq!(req.client_id, None);
        let req: VoteRequest = optional_body(br#"{"client_id":"c1"}"#).unwrap();
        assert_eq!(req.client_id.as_deref(), Some("c1"));
    }

    #[test]
    fn malformed_optional_body_is_rejected() {
        assert!(matches!(
            optional_body::<VoteRequest>(br#"{"client_id": 42}"#),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            optional_body::<CreateSessionRequest>(b"{not json"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn qna_config_request_requires_known_mode() {
        let req: QnaConfigRequest =
            serde_json::from_str(r#"{"mode":"prompt","prompt":"Ask"}"#).unwrap();
        assert_eq!(req.mode, QnaMode::Prompt);
        assert!(serde_json::from_str::<QnaConfigRequest>(r#"{"mode":"loud"}"#).is_err());
    }

    #[test]
    fn event_limit_is_clamped() {
        assert_eq!(EventsQuery::default().limit(), DEFAULT_EVENT_LIMIT);
        assert_eq!(EventsQuery { limit: Some(10_000) }.limit(), MAX_EVENT_LIMIT);
    }

    #[test]
    fn poll_request_defaults_to_single_select() {
        let req: CreatePollRequest =
            serde_json::from_str(r#"{"question":"Q","options":["a","b"]}"#).unwrap();
        assert!(!req.allow_multiple);
    }
}
