//! Registration acknowledgement.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::web::error::ApiError;

/// Suffix appended to the username in the acknowledgement.
pub const REGISTER_SUFFIX: &str = "成功した";

/// Registration request body: `{"model": {"username": ...}}`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Submitted form model.
    #[serde(default)]
    pub model: Option<RegisterModel>,
}

/// Form model of a registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterModel {
    /// Requested username.
    #[serde(default)]
    pub username: Option<String>,
}

/// Registration acknowledgement.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Human-readable acknowledgement.
    pub message: String,
}

/// POST /register - Acknowledge a registration request.
pub async fn register(
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let username = req
        .model
        .and_then(|m| m.username)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request("Username is required"))?;

    Ok(Json(RegisterResponse {
        message: format!("{username}{REGISTER_SUFFIX}"),
    }))
}
