//! Word cloud endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::adapters::http::dto::{parse_id, voter, CreateWordCloudRequest, WordVoteRequest};
use crate::adapters::http::error::ApiError;
use crate::application::LiveContext;
use crate::domain::event::LiveEvent;
use crate::domain::foundation::{OpenStatus, SessionId, WordCloudId, WordId};
use crate::domain::word_cloud::{NewWordCloud, WordCloud};

/// POST /sessions/:id/word-clouds
pub async fn create_word_cloud(
    State(context): State<LiveContext>,
    Path(session_id): Path<String>,
    Json(req): Json<CreateWordCloudRequest>,
) -> Result<(StatusCode, Json<WordCloud>), ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session")?;
    let input = NewWordCloud::new(req.prompt.as_deref(), &req.words)?;

    let cloud = context
        .broadcaster()
        .commit(
            &session_id,
            context.store().create_word_cloud(&session_id, input),
            |cloud| vec![LiveEvent::word_cloud_created(cloud)],
        )
        .await?;
    Ok((StatusCode::CREATED, Json(cloud)))
}

/// POST /sessions/:id/word-clouds/:cloud_id/open
///
/// Any other open cloud is closed first; its `word_cloud_closed` event is
/// broadcast before this cloud's `word_cloud_opened`.
pub async fn open_word_cloud(
    State(context): State<LiveContext>,
    Path((session_id, cloud_id)): Path<(String, String)>,
) -> Result<Json<WordCloud>, ApiError> {
    set_status(context, session_id, cloud_id, OpenStatus::Open).await
}

/// POST /sessions/:id/word-clouds/:cloud_id/close
pub async fn close_word_cloud(
    State(context): State<LiveContext>,
    Path((session_id, cloud_id)): Path<(String, String)>,
) -> Result<Json<WordCloud>, ApiError> {
    set_status(context, session_id, cloud_id, OpenStatus::Closed).await
}

async fn set_status(
    context: LiveContext,
    session_id: String,
    cloud_id: String,
    status: OpenStatus,
) -> Result<Json<WordCloud>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session")?;
    let cloud_id: WordCloudId = parse_id(&cloud_id, "word cloud")?;

    let transition = context
        .broadcaster()
        .commit(
            &session_id,
            context
                .store()
                .set_word_cloud_status(&session_id, &cloud_id, status),
            |transition| transition.events(),
        )
        .await?;
    Ok(Json(transition.cloud))
}

/// POST /sessions/:id/word-clouds/:cloud_id/vote
pub async fn vote_word_cloud(
    State(context): State<LiveContext>,
    Path((session_id, cloud_id)): Path<(String, String)>,
    Json(req): Json<WordVoteRequest>,
) -> Result<Json<WordCloud>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session")?;
    let cloud_id: WordCloudId = parse_id(&cloud_id, "word cloud")?;
    let word_id: WordId = parse_id(&req.word_id, "word")?;
    let client_id = voter(req.client_id)?;

    let cloud = context
        .broadcaster()
        .commit(
            &session_id,
            context.store().vote_word_cloud(&session_id, &cloud_id, &word_id, client_id.as_ref()),
            |cloud| vec![LiveEvent::word_cloud_voted(cloud)],
        )
        .await?;
    Ok(Json(cloud))
}
