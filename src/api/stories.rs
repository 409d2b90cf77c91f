//! Story API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::blocks::{commit_session, open_session};
use super::{error, new_id, now_millis, success, ApiResult, DeleteParams};
use crate::auth::CurrentUser;
use crate::editor::{ensure_unique_block_ids, EditorSession};
use crate::errors::AppError;
use crate::models::{CreateStoryRequest, Story, StoryPatch};
use crate::AppState;

/// POST /api/stories - Start a new draft owned by the current author.
pub async fn create_story(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateStoryRequest>,
) -> ApiResult<Story> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let draft = Story::draft(new_id(), user.display_name(), now_millis());
    let mut session = EditorSession::open(draft);
    session.apply(StoryPatch {
        title: request.title,
        summary: request.summary,
        ..Default::default()
    });

    let story = match session.save() {
        Ok(story) => story,
        Err(e) => return error(e, revision_id),
    };

    match state.repo.save_story(&story).await {
        Ok(()) => {
            tracing::info!(story_id = %story.id, author = %story.author, "story created");
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(story, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/stories/:id - Get a story for editing, published or not.
pub async fn get_story(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Story> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_story(&id).await {
        Ok(Some(story)) => success(story, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Story {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/stories/:id - Replace a story with the editor's copy.
///
/// The id and creation time stay those of the stored story. Block ids must be
/// unique. Text blocks are normalized to a single plain paragraph on the way
/// in and image blocks drop any styles.
pub async fn update_story(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut incoming): Json<Story>,
) -> ApiResult<Story> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Err(e) = ensure_unique_block_ids(&incoming.blocks) {
        return error(e, revision_id);
    }

    let existing = match state.repo.get_story(&id).await {
        Ok(Some(story)) => story,
        Ok(None) => {
            return error(
                AppError::NotFound(format!("Story {} not found", id)),
                revision_id,
            )
        }
        Err(e) => return error(e, revision_id),
    };

    incoming.id = existing.id;
    incoming.created_at = existing.created_at;

    let story = match EditorSession::open(incoming).save() {
        Ok(story) => story,
        Err(e) => return error(e, revision_id),
    };

    match state.repo.save_story(&story).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(story, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/stories/:id?confirm=true - Delete a story.
pub async fn delete_story(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Err(e) = params.require_confirmation("a story") {
        return error(e, revision_id);
    }

    match state.repo.delete_story(&id).await {
        Ok(()) => {
            tracing::info!(story_id = %id, "story deleted");
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/stories/:id/cover - Go back to the default cover.
pub async fn remove_cover(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Story> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let mut session = match open_session(&state, &id).await {
        Ok(session) => session,
        Err(e) => return error(e, revision_id),
    };

    if !session.story().has_custom_cover() {
        return match session.save() {
            Ok(story) => success(story, revision_id),
            Err(e) => error(e, revision_id),
        };
    }

    session.remove_cover();
    match commit_session(&state, session).await {
        Ok(story) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(story, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
