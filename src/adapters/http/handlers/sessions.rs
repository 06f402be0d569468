//! Session endpoints: lifecycle, lookup, snapshot, Q&A settings, event log.

use std::future::Future;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::adapters::http::dto::{
    optional_body, parse_id, CreateSessionRequest, EventsQuery, QnaConfigRequest,
};
use crate::adapters::http::error::ApiError;
use crate::application::LiveContext;
use crate::domain::event::LiveEvent;
use crate::domain::foundation::{EntityKind, JoinCode, SessionId, StoreError};
use crate::domain::session::{qna_prompt_text, session_title, Session};
use crate::domain::snapshot::SessionSnapshot;

/// POST /sessions - Create a session. The body may be omitted.
pub async fn create_session(
    State(context): State<LiveContext>,
    body: Bytes,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    let req: CreateSessionRequest = optional_body(&body)?;
    let title = session_title(req.title.as_deref())?;
    let session = context.store().create_session(title).await?;
    Ok((StatusCode::CREATED, Json(context.with_join_url(session))))
}

/// GET /sessions/:id
pub async fn get_session(
    State(context): State<LiveContext>,
    Path(session_id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session")?;
    let session = context.store().get_session(&session_id).await?;
    Ok(Json(context.with_join_url(session)))
}

/// GET /sessions/code/:code - Case-insensitive join-code lookup
pub async fn get_session_by_code(
    State(context): State<LiveContext>,
    Path(code): Path<String>,
) -> Result<Json<Session>, ApiError> {
    // A malformed code cannot belong to any session.
    let code = JoinCode::parse(&code).map_err(|_| StoreError::NotFound(EntityKind::Session))?;
    let session = context.store().get_session_by_code(&code).await?;
    Ok(Json(context.with_join_url(session)))
}

/// GET /sessions/:id/snapshot
pub async fn get_snapshot(
    State(context): State<LiveContext>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session")?;
    let mut snapshot = context.store().snapshot(&session_id).await?;
    snapshot.session = context.with_join_url(snapshot.session);
    Ok(Json(snapshot))
}

/// GET /sessions/:id/events?limit=N - Newest recorded events, oldest first
pub async fn recent_events(
    State(context): State<LiveContext>,
    Path(session_id): Path<String>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<Vec<LiveEvent>>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session")?;
    let events = context
        .store()
        .recent_events(&session_id, query.limit())
        .await?;
    Ok(Json(events))
}

/// POST /sessions/:id/end
pub async fn end_session(
    State(context): State<LiveContext>,
    Path(session_id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session")?;
    let mutation = context.store().end_session(&session_id);
    commit_session(&context, &session_id, mutation, LiveEvent::session_ended).await
}

/// POST /sessions/:id/qna/open
pub async fn open_qna(
    State(context): State<LiveContext>,
    Path(session_id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    set_qna(context, session_id, true).await
}

/// POST /sessions/:id/qna/close
pub async fn close_qna(
    State(context): State<LiveContext>,
    Path(session_id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    set_qna(context, session_id, false).await
}

/// POST /sessions/:id/qna/config - Q&A mode and presenter prompt
pub async fn set_qna_config(
    State(context): State<LiveContext>,
    Path(session_id): Path<String>,
    Json(req): Json<QnaConfigRequest>,
) -> Result<Json<Session>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session")?;
    let prompt = qna_prompt_text(req.prompt.as_deref())?;
    let mutation = context
        .store()
        .set_qna_config(&session_id, req.mode, prompt);
    commit_session(&context, &session_id, mutation, LiveEvent::qna_config_updated).await
}

async fn set_qna(
    context: LiveContext,
    session_id: String,
    open: bool,
) -> Result<Json<Session>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session")?;
    let mutation = context.store().set_qna_open(&session_id, open);
    commit_session(&context, &session_id, mutation, LiveEvent::qna_toggled).await
}

/// Commit a session-level change; the response and the event both carry
/// the session with its `join_url`.
async fn commit_session<F>(
    context: &LiveContext,
    session_id: &SessionId,
    mutation: F,
    event: fn(&Session) -> LiveEvent,
) -> Result<Json<Session>, ApiError>
where
    F: Future<Output = Result<Session, StoreError>>,
{
    let session = context
        .broadcaster()
        .commit(
            session_id,
            async { mutation.await.map(|session| context.with_join_url(session)) },
            |session| vec![event(session)],
        )
        .await?;
    Ok(Json(session))
}
