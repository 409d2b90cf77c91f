//! AI assistant endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct IdeasRequest {
    #[serde(default)]
    pub topic: String,
}

#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AssistantResponse {
    pub text: String,
}

/// POST /api/assistant/ideas - Story title and synopsis suggestions.
pub async fn story_ideas(
    State(state): State<AppState>,
    Json(request): Json<IdeasRequest>,
) -> ApiResult<AssistantResponse> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let topic = request.topic.trim();
    if topic.is_empty() {
        return error(
            AppError::Validation("Topic is required".to_string()),
            revision_id,
        );
    }

    let text = state.assistant.story_ideas(topic).await;
    success(AssistantResponse { text }, revision_id)
}

/// POST /api/assistant/enhance - Rewrite a passage; echoes it back on failure.
pub async fn enhance_text(
    State(state): State<AppState>,
    Json(request): Json<EnhanceRequest>,
) -> ApiResult<AssistantResponse> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let text = if request.text.trim().is_empty() {
        request.text
    } else {
        state.assistant.enhance_text(&request.text).await
    };

    success(AssistantResponse { text }, revision_id)
}
