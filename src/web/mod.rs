//! Web module for nodekb.
//!
//! HTTP routes for uploading, listing, streaming and deleting stored files,
//! plus the HTML list view.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod view;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
