//! Page configuration endpoints.

use axum::{extract::State, Json};

use super::{error, success, ApiResult};
use crate::models::{LibraryPageConfig, LibraryPageConfigPatch};
use crate::AppState;

/// GET /api/pages/library - Library page configuration (defaults if never saved).
pub async fn get_library_page(State(state): State<AppState>) -> ApiResult<LibraryPageConfig> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_library_config().await {
        Ok(config) => success(config, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/pages/library - Merge fields into the library page configuration.
pub async fn update_library_page(
    State(state): State<AppState>,
    Json(patch): Json<LibraryPageConfigPatch>,
) -> ApiResult<LibraryPageConfig> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.merge_library_config(patch).await {
        Ok(config) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(config, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
