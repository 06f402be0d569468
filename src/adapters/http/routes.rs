//! Route table for the REST API and the WebSocket endpoint.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::websocket::websocket_router;
use crate::application::LiveContext;

use super::handlers::{health, polls, prompts, questions, sessions, word_clouds};

/// Build the full application router over a live context.
pub fn api_router(context: LiveContext) -> Router {
    Router::new()
        .route("/health", get(health))
        // ════════════════════════════════════════════════════════════════
        // Sessions
        // ════════════════════════════════════════════════════════════════
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/code/:code", get(sessions::get_session_by_code))
        .route("/sessions/:session_id", get(sessions::get_session))
        .route("/sessions/:session_id/snapshot", get(sessions::get_snapshot))
        .route("/sessions/:session_id/events", get(sessions::recent_events))
        .route("/sessions/:session_id/end", post(sessions::end_session))
        .route("/sessions/:session_id/qna/open", post(sessions::open_qna))
        .route("/sessions/:session_id/qna/close", post(sessions::close_qna))
        .route("/sessions/:session_id/qna/config", post(sessions::set_qna_config))
        // ════════════════════════════════════════════════════════════════
        // Questions
        // ════════════════════════════════════════════════════════════════
        .route(
            "/sessions/:session_id/questions",
            post(questions::create_question),
        )
        .route(
            "/sessions/:session_id/questions/:question_id/approve",
            post(questions::approve_question),
        )
        .route(
            "/sessions/:session_id/questions/:question_id/hide",
            post(questions::hide_question),
        )
        .route(
            "/sessions/:session_id/questions/:question_id/reset",
            post(questions::reset_question),
        )
        .route(
            "/sessions/:session_id/questions/:question_id/vote",
            post(questions::vote_question),
        )
        // ════════════════════════════════════════════════════════════════
        // Polls
        // ════════════════════════════════════════════════════════════════
        .route("/sessions/:session_id/polls", post(polls::create_poll))
        .route(
            "/sessions/:session_id/polls/:poll_id/open",
            post(polls::open_poll),
        )
        .route(
            "/sessions/:session_id/polls/:poll_id/close",
            post(polls::close_poll),
        )
        .route(
            "/sessions/:session_id/polls/:poll_id/vote",
            post(polls::vote_poll),
        )
        // ════════════════════════════════════════════════════════════════
        // Word clouds
        // ════════════════════════════════════════════════════════════════
        .route(
            "/sessions/:session_id/word-clouds",
            post(word_clouds::create_word_cloud),
        )
        .route(
            "/sessions/:session_id/word-clouds/:cloud_id/open",
            post(word_clouds::open_word_cloud),
        )
        .route(
            "/sessions/:session_id/word-clouds/:cloud_id/close",
            post(word_clouds::close_word_cloud),
        )
        .route(
            "/sessions/:session_id/word-clouds/:cloud_id/vote",
            post(word_clouds::vote_word_cloud),
        )
        // ════════════════════════════════════════════════════════════════
        // Q&A prompts
        // ════════════════════════════════════════════════════════════════
        .route(
            "/sessions/:session_id/qna-prompts",
            post(prompts::create_prompt),
        )
        .route(
            "/sessions/:session_id/qna-prompts/:prompt_id/open",
            post(prompts::open_prompt),
        )
        .route(
            "/sessions/:session_id/qna-prompts/:prompt_id/close",
            post(prompts::close_prompt),
        )
        .merge(websocket_router())
        .with_state(context)
}
