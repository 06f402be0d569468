//! Question endpoints: submit, moderate, upvote.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::adapters::http::dto::{
    optional_body, parse_id, voter, CreateQuestionRequest, VoteRequest,
};
use crate::adapters::http::error::ApiError;
use crate::application::LiveContext;
use crate::domain::event::LiveEvent;
use crate::domain::foundation::{QnaPromptId, QuestionId, SessionId};
use crate::domain::question::{NewQuestion, Question, QuestionStatus};

/// POST /sessions/:id/questions
pub async fn create_question(
    State(context): State<LiveContext>,
    Path(session_id): Path<String>,
    Json(req): Json<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<Question>), ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session")?;
    let prompt_id = req
        .prompt_id
        .as_deref()
        .map(|raw| parse_id::<QnaPromptId>(raw, "prompt"))
        .transpose()?;
    let input = NewQuestion::new(&req.text, prompt_id)?;

    let question = context
        .broadcaster()
        .commit(
            &session_id,
            context.store().create_question(&session_id, input),
            |question| vec![LiveEvent::question_submitted(question)],
        )
        .await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// POST /sessions/:id/questions/:question_id/approve
pub async fn approve_question(
    State(context): State<LiveContext>,
    Path((session_id, question_id)): Path<(String, String)>,
) -> Result<Json<Question>, ApiError> {
    set_status(context, session_id, question_id, QuestionStatus::Approved).await
}

/// POST /sessions/:id/questions/:question_id/hide
pub async fn hide_question(
    State(context): State<LiveContext>,
    Path((session_id, question_id)): Path<(String, String)>,
) -> Result<Json<Question>, ApiError> {
    set_status(context, session_id, question_id, QuestionStatus::Hidden).await
}

/// POST /sessions/:id/questions/:question_id/reset - Back to pending
pub async fn reset_question(
    State(context): State<LiveContext>,
    Path((session_id, question_id)): Path<(String, String)>,
) -> Result<Json<Question>, ApiError> {
    set_status(context, session_id, question_id, QuestionStatus::Pending).await
}

async fn set_status(
    context: LiveContext,
    session_id: String,
    question_id: String,
    status: QuestionStatus,
) -> Result<Json<Question>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session")?;
    let question_id: QuestionId = parse_id(&question_id, "question")?;

    let question = context
        .broadcaster()
        .commit(
            &session_id,
            context.store().set_question_status(&session_id, &question_id, status),
            |question| vec![LiveEvent::question_status(question)],
        )
        .await?;
    Ok(Json(question))
}

/// POST /sessions/:id/questions/:question_id/vote - The body may be omitted.
pub async fn vote_question(
    State(context): State<LiveContext>,
    Path((session_id, question_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Question>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session")?;
    let question_id: QuestionId = parse_id(&question_id, "question")?;
    let req: VoteRequest = optional_body(&body)?;
    let client_id = voter(req.client_id)?;

    let question = context
        .broadcaster()
        .commit(
            &session_id,
            context.store().vote_question(&session_id, &question_id, client_id.as_ref()),
            |question| vec![LiveEvent::question_voted(question)],
        )
        .await?;
    Ok(Json(question))
}
