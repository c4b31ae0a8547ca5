//! File query and delete handlers.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::file::StoredFile;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::NodekbError;

/// Query parameters accepted by `POST /files/:id`.
#[derive(Debug, Deserialize)]
pub struct MethodOverride {
    /// HTTP method the form meant to send.
    #[serde(rename = "_method")]
    pub method: Option<String>,
}

/// The 302 redirect to the application root used after writes.
pub fn redirect_home() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

async fn lookup(state: &AppState, filename: &str) -> Result<StoredFile, ApiError> {
    state
        .store
        .find_by_filename(filename)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("No file exists"))
}

/// GET /files - All stored file metadata as JSON.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StoredFile>>, ApiError> {
    let files = state.store.list_all().await.map_err(ApiError::from)?;

    if files.is_empty() {
        return Err(ApiError::not_found("No files exist"));
    }

    Ok(Json(files))
}

/// GET /files/:filename - Metadata of one file.
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Json<StoredFile>, ApiError> {
    let file = lookup(&state, &filename).await?;
    Ok(Json(file))
}

/// GET /image/:filename - Stream an image's bytes.
///
/// Only `image/jpeg` and `image/png` files are served; the stored content
/// type is sent as the `Content-Type` header.
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let file = lookup(&state, &filename).await?;

    let content_type = match file.content_type.as_deref() {
        Some(ct) if file.is_image() => ct.to_string(),
        _ => return Err(ApiError::not_found("Not an image")),
    };

    let stream = state.store.open_download_stream(&file);

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_LENGTH, file.length.to_string()),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}

/// DELETE /files/:id - Remove a file, then redirect to `/`.
///
/// A missing id is answered with 404 and the store's error message.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    match state.store.remove(&id).await {
        Ok(()) => {
            tracing::info!(id = %id, "Deleted file");
            Ok(redirect_home())
        }
        Err(e @ NodekbError::NotFound(_)) => {
            tracing::debug!(id = %id, error = %e, "Delete of unknown file");
            Err(ApiError::not_found(e.to_string()))
        }
        Err(e) => Err(ApiError::from(e)),
    }
}

/// POST /files/:id?_method=DELETE - Delete for HTML forms.
pub async fn delete_file_override(
    state: State<Arc<AppState>>,
    path: Path<String>,
    Query(query): Query<MethodOverride>,
) -> Result<Response, ApiError> {
    match query.method.as_deref() {
        Some(method) if method.eq_ignore_ascii_case("DELETE") => delete_file(state, path).await,
        _ => Err(ApiError::method_not_allowed()),
    }
}
