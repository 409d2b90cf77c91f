//! Block editing endpoints.
//!
//! Each call opens the stored story in an editor session, applies one
//! operation and writes the story back. Operations that change nothing
//! return the story without a write.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::editor::{EditorSession, MoveDirection};
use crate::errors::AppError;
use crate::models::{AddImageBlockRequest, BlockPatch, MoveBlockRequest, Story};
use crate::AppState;

pub(crate) async fn open_session(state: &AppState, id: &str) -> Result<EditorSession, AppError> {
    match state.repo.get_story(id).await? {
        Some(story) => Ok(EditorSession::open(story)),
        None => Err(AppError::NotFound(format!("Story {} not found", id))),
    }
}

pub(crate) async fn commit_session(
    state: &AppState,
    session: EditorSession,
) -> Result<Story, AppError> {
    let story = session.save()?;
    state.repo.save_story(&story).await?;
    Ok(story)
}

/// Run `edit` on the story and persist it when the edit reports a change.
async fn edit_story<F>(state: &AppState, id: &str, edit: F) -> Result<Story, AppError>
where
    F: FnOnce(&mut EditorSession) -> Result<bool, AppError>,
{
    let mut session = open_session(state, id).await?;
    if edit(&mut session)? {
        tracing::debug!(
            story_id = %id,
            blocks = session.blocks().len(),
            active_block = ?session.active_block_id(),
            "story edited"
        );
        commit_session(state, session).await
    } else {
        session.save()
    }
}

async fn respond(
    state: &AppState,
    revision_id: i64,
    result: Result<Story, AppError>,
) -> ApiResult<Story> {
    match result {
        Ok(story) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(story, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/stories/:id/blocks/text - Append a placeholder text block.
pub async fn add_text_block(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Story> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let result = edit_story(&state, &id, |session| {
        session.add_text_block();
        Ok(true)
    })
    .await;

    respond(&state, revision_id, result).await
}

/// POST /api/stories/:id/blocks/image - Append an image block.
pub async fn add_image_block(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AddImageBlockRequest>,
) -> ApiResult<Story> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if request.content.trim().is_empty() {
        return error(
            AppError::Validation("Image content is required".to_string()),
            revision_id,
        );
    }

    let result = edit_story(&state, &id, |session| {
        session.add_image_block(request.content);
        Ok(true)
    })
    .await;

    respond(&state, revision_id, result).await
}

/// POST /api/stories/:id/blocks/move - Swap a block with its neighbour.
pub async fn move_block(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MoveBlockRequest>,
) -> ApiResult<Story> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let result = edit_story(&state, &id, |session| {
        let direction = MoveDirection::try_from(request.direction)?;
        Ok(session.move_block(request.index, direction))
    })
    .await;

    respond(&state, revision_id, result).await
}

/// PATCH /api/stories/:id/blocks/:block_id - Update block content or styles.
///
/// An unknown block id leaves the story as it is.
pub async fn update_block(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(String, String)>,
    Json(patch): Json<BlockPatch>,
) -> ApiResult<Story> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let result = edit_story(&state, &id, |session| {
        Ok(session.update_block(&block_id, patch))
    })
    .await;

    respond(&state, revision_id, result).await
}

/// DELETE /api/stories/:id/blocks/:block_id - Remove a block.
pub async fn delete_block(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(String, String)>,
) -> ApiResult<Story> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let result =
        edit_story(&state, &id, |session| Ok(session.delete_block(&block_id))).await;

    respond(&state, revision_id, result).await
}

/// POST /api/stories/:id/blocks/:block_id/enhance - Rewrite a text block with the assistant.
pub async fn enhance_block(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(String, String)>,
) -> ApiResult<Story> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let mut session = match open_session(&state, &id).await {
        Ok(session) => session,
        Err(e) => return error(e, revision_id),
    };

    let Some(text) = session.editable_text(&block_id) else {
        return respond(&state, revision_id, session.save()).await;
    };

    let improved = state.assistant.enhance_text(&text).await;
    if improved == text {
        tracing::debug!(story_id = %id, block_id = %block_id, "enhancement left text unchanged");
        return respond(&state, revision_id, session.save()).await;
    }

    session.update_block(
        &block_id,
        BlockPatch {
            content: Some(improved),
            styles: None,
        },
    );

    let result = commit_session(&state, session).await;
    respond(&state, revision_id, result).await
}
