//! HTTP handlers.

pub mod file;
pub mod register;
pub mod upload;
pub mod view;

pub use file::*;
pub use register::*;
pub use upload::*;
pub use view::*;

use crate::config::StorageConfig;
use crate::file::ChunkedFileStore;
use crate::web::view::ViewRenderer;
use crate::Result;

/// Shared state handed to every handler.
#[derive(Debug)]
pub struct AppState {
    /// Chunked file store for the uploads bucket.
    pub store: ChunkedFileStore,
    /// HTML renderer.
    pub views: ViewRenderer,
    /// Maximum upload size in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create application state around an opened store.
    pub fn new(store: ChunkedFileStore) -> Result<Self> {
        Ok(Self {
            store,
            views: ViewRenderer::new()?,
            max_upload_size: StorageConfig::default().max_upload_bytes(),
        })
    }

    /// Set the maximum upload size in bytes.
    pub fn with_max_upload_size(mut self, bytes: u64) -> Self {
        self.max_upload_size = bytes;
        self
    }
}
