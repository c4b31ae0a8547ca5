//! File storage module for nodekb.
//!
//! Uploaded files live in a chunked store inside the database:
//! - one metadata row per file, addressable by id or filename within a bucket
//! - content split into fixed-size chunks, read back lazily as a stream
//! - random hex filenames that keep the original extension

mod metadata;
mod naming;
mod store;

pub use metadata::StoredFile;
pub use naming::{extension_of, generate_filename, RANDOM_NAME_BYTES};
pub use store::ChunkedFileStore;

/// Bucket that uploads are written to.
pub const DEFAULT_BUCKET: &str = "uploads";

/// Default chunk size in bytes (255 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 255 * 1024;

/// Content types that the image endpoint will stream.
pub const IMAGE_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// Whether a content type is one of the renderable image types.
///
/// The comparison is exact: parameters or different casing do not match.
pub fn is_image(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| IMAGE_CONTENT_TYPES.contains(&ct))
}
