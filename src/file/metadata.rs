//! Stored file metadata.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metadata record describing one file in the chunked store.
///
/// Serializes with the field names chunked-store clients expect
/// (`_id`, `contentType`, `chunkSize`, `uploadDate`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct StoredFile {
    /// Store-assigned identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Bucket the file belongs to.
    #[serde(skip)]
    pub bucket: String,
    /// Stored filename (random hex + original extension).
    pub filename: String,
    /// Client-supplied MIME type.
    #[serde(rename = "contentType")]
    pub content_type: Option<String>,
    /// Total size in bytes.
    pub length: i64,
    /// Chunk size the file was written with.
    #[serde(rename = "chunkSize")]
    pub chunk_size: i64,
    /// When the write completed.
    #[serde(rename = "uploadDate")]
    pub upload_date: DateTime<Utc>,
    /// Hex SHA-256 of the content.
    pub sha256: String,
}

impl StoredFile {
    /// Number of chunks the content occupies.
    pub fn chunk_count(&self) -> i64 {
        if self.length <= 0 || self.chunk_size <= 0 {
            0
        } else {
            (self.length + self.chunk_size - 1) / self.chunk_size
        }
    }

    /// Whether the file can be rendered by the image endpoint.
    pub fn is_image(&self) -> bool {
        super::is_image(self.content_type.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(length: i64, chunk_size: i64) -> StoredFile {
        StoredFile {
            id: "6a1c".to_string(),
            bucket: "uploads".to_string(),
            filename: "00ff.png".to_string(),
            content_type: Some("image/png".to_string()),
            length,
            chunk_size,
            upload_date: DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            sha256: "abc".to_string(),
        }
    }

    #[test]
    fn test_chunk_count() {
        assert_eq!(sample(0, 4).chunk_count(), 0);
        assert_eq!(sample(1, 4).chunk_count(), 1);
        assert_eq!(sample(4, 4).chunk_count(), 1);
        assert_eq!(sample(5, 4).chunk_count(), 2);
        assert_eq!(sample(12, 4).chunk_count(), 3);
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(sample(10, 4)).unwrap();

        assert_eq!(value["_id"], "6a1c");
        assert_eq!(value["filename"], "00ff.png");
        assert_eq!(value["contentType"], "image/png");
        assert_eq!(value["length"], 10);
        assert_eq!(value["chunkSize"], 4);
        assert_eq!(value["uploadDate"], "2024-05-01T10:00:00Z");
        assert!(value.get("bucket").is_none());
    }
}
