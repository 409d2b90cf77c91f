//! Image upload endpoints.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap},
};
use serde::{Deserialize, Serialize};

use super::blocks::{commit_session, open_session};
use super::{error, success, ApiResult};
use crate::editor::UploadTarget;
use crate::models::Story;
use crate::AppState;

/// Maximum accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct StoryUploadParams {
    pub target: UploadTarget,
}

fn content_type(headers: &HeaderMap) -> &str {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// POST /api/uploads - Store a raw image body and return its URL.
pub async fn upload_media(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<UploadResponse> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.media.save(&body, content_type(&headers)).await {
        Ok(url) => success(UploadResponse { url }, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/stories/:id/uploads?target=cover|block - Upload an image into a story.
///
/// The story is only written once the upload finished; a failed upload leaves
/// it untouched.
pub async fn upload_story_media(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<StoryUploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Story> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let mut session = match open_session(&state, &id).await {
        Ok(session) => session,
        Err(e) => return error(e, revision_id),
    };

    session.begin_upload();
    let uploaded = state.media.save(&body, content_type(&headers)).await;
    if let Err(e) = session.finish_upload(params.target, uploaded) {
        tracing::warn!(story_id = %id, "story upload failed: {}", e);
        return error(e, revision_id);
    }

    tracing::info!(story_id = %session.story().id, target = ?params.target, "story image uploaded");

    match commit_session(&state, session).await {
        Ok(story) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(story, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
