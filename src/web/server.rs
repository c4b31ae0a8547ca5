//! Web server for nodekb.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;

use crate::config::Config;
use crate::db::Database;
use crate::file::ChunkedFileStore;
use crate::{NodekbError, Result};

use super::handlers::AppState;
use super::router::{create_health_router, create_router, create_static_router};

/// Web server for the application.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Full configuration.
    config: Config,
    /// External routers nested under their own prefixes.
    collaborators: Vec<(String, Router)>,
}

impl WebServer {
    /// Create a new web server over an opened database.
    pub fn new(config: &Config, db: Database) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| NodekbError::Config(format!("invalid listen address: {e}")))?;

        let store = ChunkedFileStore::new(db, &config.storage.bucket, config.storage.chunk_size);
        let app_state = AppState::new(store)?
            .with_max_upload_size(config.storage.max_upload_bytes());

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            config: config.clone(),
            collaborators: Vec::new(),
        })
    }

    /// Mount an external router (articles, users, ...) under `prefix`.
    pub fn mount(mut self, prefix: impl Into<String>, router: Router) -> Self {
        self.collaborators.push((prefix.into(), router));
        self
    }

    /// Get the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get the shared application state.
    pub fn app_state(&self) -> Arc<AppState> {
        self.app_state.clone()
    }

    /// Assemble the complete router.
    pub fn into_router(self) -> Router {
        let mut router = create_router(self.app_state, &self.config.web).merge(create_health_router());

        for (prefix, collaborator) in self.collaborators {
            tracing::debug!(prefix = %prefix, "Mounting collaborator routes");
            router = router.nest(&prefix, collaborator);
        }

        if self.config.web.serve_static {
            if let Some(static_router) = create_static_router(&self.config.web.static_path) {
                router = router.merge(static_router);
            }
        }

        if self.config.server.request_timeout_secs > 0 {
            router = router.layer(TimeoutLayer::new(Duration::from_secs(
                self.config.server.request_timeout_secs,
            )));
        }

        router
    }

    /// Run the web server until it fails.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        let router = self.into_router();

        tracing::info!("Server started on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        let router = self.into_router();

        tracing::info!("Server started on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
