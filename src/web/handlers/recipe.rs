//! Recipe handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::recipe::{Recipe, RecipeData, SearchPage};

use super::super::error::ApiError;
use super::super::extract::CurrentUser;
use super::AppState;

const DEFAULT_PAGE_SIZE: i64 = 10;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
    pub group: Option<String>,
    pub start: Option<i64>,
    pub count: Option<i64>,
}

/// GET /api/recipes - Search the caller's recipes.
///
/// Absent or negative `start`/`count` fall back to 0 and 10.
pub async fn search(
    State(state): State<AppState>,
    CurrentUser(owner_id): CurrentUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchPage>, ApiError> {
    let group = match query.group.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| ApiError::bad_request("group is invalid"))?,
        ),
    };

    let start = query.start.filter(|s| *s >= 0).unwrap_or(0);
    let count = query.count.filter(|c| *c >= 0).unwrap_or(DEFAULT_PAGE_SIZE);

    let page = state
        .recipes
        .search(owner_id, query.search.as_deref(), group, start, count)
        .await?;
    Ok(Json(page))
}

/// GET /api/recipes/{id} - Get one recipe.
pub async fn get(
    State(state): State<AppState>,
    CurrentUser(owner_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, ApiError> {
    let id = parse_id(&id).ok_or_else(|| ApiError::not_found("recipe not found"))?;
    let recipe = state.recipes.get(owner_id, id).await?;
    Ok(Json(recipe))
}

/// POST /api/recipes - Create a recipe.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(owner_id): CurrentUser,
    Json(data): Json<RecipeData>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe = state.recipes.create(owner_id, data).await?;
    Ok(Json(recipe))
}

/// PUT /api/recipes/{id} - Replace a recipe.
///
/// The path id wins over any id in the body.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(owner_id): CurrentUser,
    Path(id): Path<String>,
    Json(mut data): Json<RecipeData>,
) -> Result<Json<Recipe>, ApiError> {
    let id = parse_id(&id).ok_or_else(|| ApiError::not_found("recipe not found"))?;
    data.id = Some(id);

    let recipe = state.recipes.update(owner_id, data).await?;
    Ok(Json(recipe))
}

/// DELETE /api/recipes/{id} - Remove a recipe.
///
/// Unparseable ids are treated like absent records: the delete succeeds
/// without doing anything.
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(owner_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if let Some(id) = parse_id(&id) {
        state.recipes.remove(owner_id, id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

pub(super) fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id >= 0)
}
