//! Q&A prompt endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::adapters::http::dto::{parse_id, CreateQnaPromptRequest};
use crate::adapters::http::error::ApiError;
use crate::application::LiveContext;
use crate::domain::event::LiveEvent;
use crate::domain::foundation::{OpenStatus, QnaPromptId, SessionId};
use crate::domain::prompt::{NewQnaPrompt, QnaPrompt};

/// POST /sessions/:id/qna-prompts
pub async fn create_prompt(
    State(context): State<LiveContext>,
    Path(session_id): Path<String>,
    Json(req): Json<CreateQnaPromptRequest>,
) -> Result<(StatusCode, Json<QnaPrompt>), ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session")?;
    let input = NewQnaPrompt::new(&req.prompt)?;

    let prompt = context
        .broadcaster()
        .commit(
            &session_id,
            context.store().create_qna_prompt(&session_id, input),
            |prompt| vec![LiveEvent::prompt_created(prompt)],
        )
        .await?;
    Ok((StatusCode::CREATED, Json(prompt)))
}

/// POST /sessions/:id/qna-prompts/:prompt_id/open
pub async fn open_prompt(
    State(context): State<LiveContext>,
    Path((session_id, prompt_id)): Path<(String, String)>,
) -> Result<Json<QnaPrompt>, ApiError> {
    set_status(context, session_id, prompt_id, OpenStatus::Open).await
}

/// POST /sessions/:id/qna-prompts/:prompt_id/close
pub async fn close_prompt(
    State(context): State<LiveContext>,
    Path((session_id, prompt_id)): Path<(String, String)>,
) -> Result<Json<QnaPrompt>, ApiError> {
    set_status(context, session_id, prompt_id, OpenStatus::Closed).await
}

async fn set_status(
    context: LiveContext,
    session_id: String,
    prompt_id: String,
    status: OpenStatus,
) -> Result<Json<QnaPrompt>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session")?;
    let prompt_id: QnaPromptId = parse_id(&prompt_id, "prompt")?;

    let prompt = context
        .broadcaster()
        .commit(
            &session_id,
            context.store().set_qna_prompt_status(&session_id, &prompt_id, status),
            |prompt| vec![LiveEvent::prompt_status(prompt)],
        )
        .await?;
    Ok(Json(prompt))
}
