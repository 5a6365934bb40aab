//! Group handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::recipe::{Group, GroupData};

use super::super::error::ApiError;
use super::super::extract::CurrentUser;
use super::recipe::parse_id;
use super::AppState;

/// Group create/update request body.
#[derive(Debug, Deserialize)]
pub struct GroupRequest {
    pub name: Option<String>,
}

/// Group listing response.
#[derive(Debug, Serialize)]
pub struct GroupListResponse {
    pub total: usize,
    pub results: Vec<Group>,
}

/// GET /api/groups - List the caller's groups.
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(owner_id): CurrentUser,
) -> Result<Json<GroupListResponse>, ApiError> {
    let results = state.groups.get_groups(owner_id).await?;
    Ok(Json(GroupListResponse {
        total: results.len(),
        results,
    }))
}

/// POST /api/groups - Create a group.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(owner_id): CurrentUser,
    Json(req): Json<GroupRequest>,
) -> Result<Json<Group>, ApiError> {
    let name = required_name(req)?;
    let group = state
        .groups
        .create_group(
            owner_id,
            GroupData {
                id: None,
                name: Some(name),
            },
        )
        .await?;
    Ok(Json(group))
}

/// PUT /api/groups/{id} - Rename a group.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(owner_id): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<GroupRequest>,
) -> Result<Json<Group>, ApiError> {
    let name = required_name(req)?;
    let id = parse_id(&id).ok_or_else(|| ApiError::not_found("group not found"))?;

    let group = state
        .groups
        .update_group(
            owner_id,
            GroupData {
                id: Some(id),
                name: Some(name),
            },
        )
        .await?;
    Ok(Json(group))
}

/// DELETE /api/groups/{id} - Remove a group.
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(owner_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if let Some(id) = parse_id(&id) {
        state.groups.remove_group(owner_id, id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

fn required_name(req: GroupRequest) -> Result<String, ApiError> {
    match req.name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(ApiError::bad_request("name is required")),
    }
}
