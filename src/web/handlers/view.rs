//! Page handlers.

use axum::{extract::State, response::Html};
use std::sync::Arc;

use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::view::{FileListing, IndexPage, ADD_TITLE, HOME_TITLE};

async fn render_listing(state: &AppState, title: &str) -> Result<Html<String>, ApiError> {
    let files = state.store.list_all().await.map_err(ApiError::from)?;

    let page = IndexPage {
        title,
        files: FileListing::from_files(files),
    };

    let html = state.views.render_index(&page).map_err(ApiError::from)?;

    Ok(Html(html))
}

/// GET /add - Upload form and file list.
///
/// Renders `files: false` when nothing is stored, never a 404.
pub async fn add_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    render_listing(&state, ADD_TITLE).await
}

/// GET / - Home page; the target of post-upload redirects.
pub async fn home_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    render_listing(&state, HOME_TITLE).await
}
