//! File upload and serving handlers.

use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::blob::{BlobReferenceTracker, METADATA_MIME_TYPE};

use super::super::error::ApiError;
use super::super::extract::CurrentUser;
use super::AppState;

/// Upload response: the public keys of the stored files, in upload order.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub uploaded: Vec<String>,
}

/// GET /api/files/{key} - Serve an uploaded file.
///
/// Keys are silently owner-scoped: the caller's id is prepended before the
/// lookup, so one account can never address another's blobs no matter what
/// key it asks for. Blob content is immutable, hence the aggressive cache
/// header.
pub async fn get(
    State(state): State<AppState>,
    CurrentUser(owner_id): CurrentUser,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    if key.trim().is_empty() {
        return Err(ApiError::not_found("file not found"));
    }

    let scoped = BlobReferenceTracker::resolve_key(owner_id, &format!("/{key}"));
    let item = state
        .files
        .get(&scoped)?
        .ok_or_else(|| ApiError::not_found("file not found"))?;

    let mime_type = item
        .metadata
        .get(METADATA_MIME_TYPE)
        .map(String::as_str)
        .unwrap_or("application/octet-stream")
        .to_string();

    let mut response = item.data.into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&mime_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=31536000"),
    );
    Ok(response)
}

/// POST /api/files - Upload files.
///
/// Accepts multipart form data; every `file` part is stored under a fresh
/// opaque public key in the caller's namespace. Clients never see the
/// owner-scoped part of the key.
pub async fn upload(
    State(state): State<AppState>,
    CurrentUser(owner_id): CurrentUser,
    mut payload: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut uploaded = Vec::new();

    while let Some(field) = payload
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("malformed upload: {e}")))?;

        let public_key = Uuid::new_v4().simple().to_string();
        let key = BlobReferenceTracker::resolve_key(owner_id, &format!("/{public_key}"));

        let mut metadata = HashMap::new();
        metadata.insert(METADATA_MIME_TYPE.to_string(), mime_type);
        state.files.upsert(&key, &data, metadata)?;

        info!(owner_id, key = %public_key, size = data.len(), "stored upload");
        uploaded.push(public_key);
    }

    Ok(Json(UploadResponse { uploaded }))
}
