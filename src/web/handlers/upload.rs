//! Upload handler.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::Response,
};
use futures::TryStreamExt;
use std::sync::Arc;

use crate::file::generate_filename;
use crate::web::error::ApiError;
use crate::web::handlers::{redirect_home, AppState};
use crate::NodekbError;

/// Multipart field that carries the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// Message sent when an upload exceeds the size limit.
pub const TOO_LARGE_MESSAGE: &str = "File too large";

/// Content type recorded for a part: the client's, else a guess from the
/// original name.
fn resolve_content_type(declared: Option<&str>, original_name: &str) -> String {
    match declared {
        Some(ct) if !ct.is_empty() => ct.to_string(),
        _ => mime_guess::from_path(original_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    }
}

/// Classify a multipart read failure: an exceeded body limit versus a
/// malformed or interrupted request.
fn multipart_failure(err: MultipartError) -> NodekbError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        NodekbError::TooLarge(err.body_text())
    } else {
        NodekbError::Validation(err.body_text())
    }
}

/// POST /upload - Store a single file, then redirect to `/`.
///
/// Request body: multipart/form-data with the file under the `file` field.
/// Only the first `file` part is stored; other fields are ignored.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!(error = %e, "Failed to read multipart field");
        match multipart_failure(e) {
            NodekbError::TooLarge(_) => ApiError::payload_too_large(TOO_LARGE_MESSAGE),
            _ => ApiError::bad_request("Invalid multipart data"),
        }
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let content_type = resolve_content_type(field.content_type(), &original_name);

        let filename = generate_filename(&original_name).map_err(|e| {
            tracing::error!(error = %e, "Failed to generate filename");
            ApiError::internal("Upload failed")
        })?;

        let stored = state
            .store
            .write(
                &filename,
                Some(&content_type),
                field.map_err(multipart_failure),
                Some(state.max_upload_size),
            )
            .await;

        return match stored {
            Ok(file) => {
                tracing::info!(
                    original = %original_name,
                    filename = %file.filename,
                    length = file.length,
                    "Upload complete"
                );
                Ok(redirect_home())
            }
            Err(NodekbError::TooLarge(msg)) => {
                tracing::warn!(original = %original_name, reason = %msg, "Upload too large");
                Err(ApiError::payload_too_large(TOO_LARGE_MESSAGE))
            }
            Err(NodekbError::Validation(msg)) => {
                tracing::warn!(original = %original_name, reason = %msg, "Upload rejected");
                Err(ApiError::bad_request("Upload rejected"))
            }
            Err(e) => {
                tracing::error!(original = %original_name, error = %e, "Failed to store upload");
                Err(ApiError::internal("Upload failed"))
            }
        };
    }

    Err(ApiError::bad_request("No file provided"))
}
