//! Poll endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::adapters::http::dto::{parse_id, voter, CreatePollRequest, PollVoteRequest};
use crate::adapters::http::error::ApiError;
use crate::application::LiveContext;
use crate::domain::event::LiveEvent;
use crate::domain::foundation::{OpenStatus, OptionId, PollId, SessionId};
use crate::domain::poll::{NewPoll, Poll};

/// POST /sessions/:id/polls
pub async fn create_poll(
    State(context): State<LiveContext>,
    Path(session_id): Path<String>,
    Json(req): Json<CreatePollRequest>,
) -> Result<(StatusCode, Json<Poll>), ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session")?;
    let input = NewPoll::new(&req.question, &req.options, req.allow_multiple)?;

    let poll = context
        .broadcaster()
        .commit(
            &session_id,
            context.store().create_poll(&session_id, input),
            |poll| vec![LiveEvent::poll_created(poll)],
        )
        .await?;
    Ok((StatusCode::CREATED, Json(poll)))
}

/// POST /sessions/:id/polls/:poll_id/open
pub async fn open_poll(
    State(context): State<LiveContext>,
    Path((session_id, poll_id)): Path<(String, String)>,
) -> Result<Json<Poll>, ApiError> {
    set_status(context, session_id, poll_id, OpenStatus::Open).await
}

/// POST /sessions/:id/polls/:poll_id/close
pub async fn close_poll(
    State(context): State<LiveContext>,
    Path((session_id, poll_id)): Path<(String, String)>,
) -> Result<Json<Poll>, ApiError> {
    set_status(context, session_id, poll_id, OpenStatus::Closed).await
}

async fn set_status(
    context: LiveContext,
    session_id: String,
    poll_id: String,
    status: OpenStatus,
) -> Result<Json<Poll>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session")?;
    let poll_id: PollId = parse_id(&poll_id, "poll")?;

    let poll = context
        .broadcaster()
        .commit(
            &session_id,
            context.store().set_poll_status(&session_id, &poll_id, status),
            |poll| vec![LiveEvent::poll_status(poll)],
        )
        .await?;
    Ok(Json(poll))
}

/// POST /sessions/:id/polls/:poll_id/vote
pub async fn vote_poll(
    State(context): State<LiveContext>,
    Path((session_id, poll_id)): Path<(String, String)>,
    Json(req): Json<PollVoteRequest>,
) -> Result<Json<Poll>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session")?;
    let poll_id: PollId = parse_id(&poll_id, "poll")?;
    let option_id: OptionId = parse_id(&req.option_id, "option")?;
    let client_id = voter(req.client_id)?;

    let poll = context
        .broadcaster()
        .commit(
            &session_id,
            context.store().vote_poll(&session_id, &poll_id, &option_id, client_id.as_ref()),
            |poll| vec![LiveEvent::poll_voted(poll)],
        )
        .await?;
    Ok(Json(poll))
}
