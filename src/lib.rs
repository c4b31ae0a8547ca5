//! nodekb - knowledge base web application with chunked file storage.
//!
//! Uploaded files (mostly images) are stored in a chunked store inside the
//! database and served back as metadata or byte streams over HTTP.

pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use error::{NodekbError, Result};
pub use file::{ChunkedFileStore, StoredFile};
pub use web::WebServer;
