//! News API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{error, new_id, now_millis, success, ApiResult, DeleteParams};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::listing;
use crate::models::{NewsPost, SaveNewsRequest, DEFAULT_NEWS_AUTHOR};
use crate::AppState;

fn validate(request: &SaveNewsRequest) -> Result<(), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("O título é obrigatório.".to_string()));
    }
    Ok(())
}

/// GET /api/news - News feed, newest first.
pub async fn list_news(State(state): State<AppState>) -> ApiResult<Vec<NewsPost>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_news().await {
        Ok(news) => success(listing::news_feed(news), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/news/:id - Get a single news post.
pub async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<NewsPost> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_news(&id).await {
        Ok(Some(post)) => success(post, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("News post {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/news - Publish a news post.
pub async fn create_news(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<SaveNewsRequest>,
) -> ApiResult<NewsPost> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Err(e) = validate(&request) {
        return error(e, revision_id);
    }

    let post = NewsPost {
        id: new_id(),
        title: request.title.trim().to_string(),
        banner_image: request.banner_image,
        content: request.content,
        date: now_millis(),
        author: user
            .display_name()
            .unwrap_or(DEFAULT_NEWS_AUTHOR)
            .to_string(),
    };

    match state.repo.save_news(&post).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(post, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/news/:id - Replace the editable fields of a news post.
pub async fn update_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SaveNewsRequest>,
) -> ApiResult<NewsPost> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Err(e) = validate(&request) {
        return error(e, revision_id);
    }

    let mut post = match state.repo.get_news(&id).await {
        Ok(Some(post)) => post,
        Ok(None) => {
            return error(
                AppError::NotFound(format!("News post {} not found", id)),
                revision_id,
            )
        }
        Err(e) => return error(e, revision_id),
    };

    post.title = request.title.trim().to_string();
    post.banner_image = request.banner_image;
    post.content = request.content;

    match state.repo.save_news(&post).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(post, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/news/:id?confirm=true - Delete a news post.
pub async fn delete_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Err(e) = params.require_confirmation("a news post") {
        return error(e, revision_id);
    }

    match state.repo.delete_news(&id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
