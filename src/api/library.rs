//! Public reading endpoints and the author dashboard.

use axum::extract::{Path, Query, State};
use serde::Deserialize;

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::listing::{self, LibraryOverview};
use crate::models::StoryCard;
use crate::reader::{self, ReadingView, RevealTracker};
use crate::AppState;

/// Query parameters for the archive.
#[derive(Debug, Deserialize)]
pub struct ArchiveParams {
    #[serde(default)]
    pub q: String,
}

/// Query parameters for the reading view.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadParams {
    #[serde(default)]
    pub scroll_y: f64,
    /// Comma-separated ids of image blocks that have entered the viewport.
    #[serde(default)]
    pub revealed: Option<String>,
}

/// GET /api/library - Latest published story and the rest, newest first.
pub async fn get_library(State(state): State<AppState>) -> ApiResult<LibraryOverview> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_published_stories().await {
        Ok(stories) => success(listing::library_overview(&stories), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/archive?q= - Published stories matching the search text.
pub async fn get_archive(
    State(state): State<AppState>,
    Query(params): Query<ArchiveParams>,
) -> ApiResult<Vec<StoryCard>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_published_stories().await {
        Ok(stories) => success(listing::archive(&stories, &params.q), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/dashboard - Every story, drafts included, newest first.
pub async fn get_dashboard(State(state): State<AppState>) -> ApiResult<Vec<StoryCard>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_stories().await {
        Ok(stories) => success(listing::dashboard(&stories), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/stories/:id/read - Reading view of a published story at a scroll offset.
pub async fn read_story(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ReadParams>,
) -> ApiResult<ReadingView> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let story = match state.repo.get_story(&id).await {
        Ok(Some(story)) if story.is_published => story,
        Ok(_) => {
            return error(
                AppError::NotFound(format!("Story {} not found", id)),
                revision_id,
            )
        }
        Err(e) => return error(e, revision_id),
    };

    tracing::debug!(
        story_id = %id,
        theme = story.settings.theme.as_str(),
        scroll_y = params.scroll_y,
        "rendering story"
    );

    let mut reveals = RevealTracker::for_story(&story);
    for block_id in params
        .revealed
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        reveals.observe(block_id, 1.0);
    }

    success(reader::render(&story, params.scroll_y, &reveals), revision_id)
}
