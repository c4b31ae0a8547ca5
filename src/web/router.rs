//! Router configuration.

use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{
    add_page, delete_file, delete_file_override, get_file, get_image, home_page, list_files,
    register, upload_file, AppState,
};
use super::middleware::create_cors_layer;
use crate::config::WebConfig;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the application router with the page, file and registration routes.
pub fn create_router(app_state: Arc<AppState>, web_config: &WebConfig) -> Router {
    let body_limit = (app_state.max_upload_size as usize).saturating_add(MULTIPART_OVERHEAD);

    let page_routes = Router::new()
        .route("/", get(home_page))
        .route("/add", get(add_page));

    // `/files/:key` is a filename for GET and a file id for DELETE/POST.
    let file_routes = Router::new()
        .route(
            "/upload",
            post(upload_file).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/files", get(list_files))
        .route(
            "/files/:key",
            get(get_file)
                .delete(delete_file)
                .post(delete_file_override),
        )
        .route("/image/:filename", get(get_image));

    Router::new()
        .merge(page_routes)
        .merge(file_routes)
        .route("/register", post(register))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&web_config.cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Create a router serving static files for otherwise unmatched paths.
///
/// Returns `None` if the directory does not exist.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    if !Path::new(static_path).is_dir() {
        tracing::warn!(path = %static_path, "Static directory not found, not serving static files");
        return None;
    }

    Some(Router::new().fallback_service(ServeDir::new(static_path)))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
