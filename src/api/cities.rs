//! World catalog API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{error, new_id, success, ApiResult, DeleteParams};
use crate::errors::AppError;
use crate::listing::{CityBrowser, WorldView};
use crate::models::{City, SaveCityRequest};
use crate::AppState;

/// Detail the caller currently has open, if any.
#[derive(Debug, Default, Deserialize)]
pub struct WorldParams {
    pub open: Option<String>,
}

fn validate(request: &SaveCityRequest) -> Result<(), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation(
            "O nome da cidade é obrigatório.".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/cities - All cities ordered by name.
pub async fn list_cities(State(state): State<AppState>) -> ApiResult<Vec<City>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_cities().await {
        Ok(cities) => success(CityBrowser::new(cities).cities().to_vec(), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/cities/:id - Detail of one city.
pub async fn get_city(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<City> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_city(&id).await {
        Ok(Some(city)) => success(city, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("City {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// Grid state after a write, given the detail the caller had open.
async fn browse(state: &AppState, open: Option<&str>) -> Result<CityBrowser, AppError> {
    let mut browser = CityBrowser::new(state.repo.list_cities().await?);
    if let Some(id) = open {
        browser.open(id);
    }
    Ok(browser)
}

/// POST /api/cities - Add a city.
pub async fn create_city(
    State(state): State<AppState>,
    Json(request): Json<SaveCityRequest>,
) -> ApiResult<City> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Err(e) = validate(&request) {
        return error(e, revision_id);
    }

    let city = City {
        id: new_id(),
        name: request.name.trim().to_string(),
        description: request.description,
        image: request.image,
    };

    match state.repo.save_city(&city).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(city, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/cities/:id?open=:id - Replace a city.
///
/// Returns the refreshed grid and the detail left open.
pub async fn update_city(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<WorldParams>,
    Json(request): Json<SaveCityRequest>,
) -> ApiResult<WorldView> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Err(e) = validate(&request) {
        return error(e, revision_id);
    }

    match state.repo.get_city(&id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return error(
                AppError::NotFound(format!("City {} not found", id)),
                revision_id,
            )
        }
        Err(e) => return error(e, revision_id),
    }

    let mut browser = match browse(&state, params.open.as_deref()).await {
        Ok(browser) => browser,
        Err(e) => return error(e, revision_id),
    };

    let city = City {
        id,
        name: request.name.trim().to_string(),
        description: request.description,
        image: request.image,
    };

    match state.repo.save_city(&city).await {
        Ok(()) => {
            browser.saved(city);
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(browser.into_view(), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/cities/:id?confirm=true&open=:id - Delete a city.
///
/// Returns the remaining grid; the detail closes if it showed this city.
pub async fn delete_city(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
    Query(world): Query<WorldParams>,
) -> ApiResult<WorldView> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Err(e) = params.require_confirmation("a city") {
        return error(e, revision_id);
    }

    let mut browser = match browse(&state, world.open.as_deref()).await {
        Ok(browser) => browser,
        Err(e) => return error(e, revision_id),
    };

    match state.repo.delete_city(&id).await {
        Ok(()) => {
            browser.deleted(&id);
            tracing::info!(
                city_id = %id,
                detail_open = browser.selected().is_some(),
                "city deleted"
            );
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(browser.into_view(), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
