//! Database schema and migrations for nodekb.

/// Database migrations, applied in order.
///
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Chunked file store
    r#"
-- One row per stored file
CREATE TABLE fs_files (
    id            TEXT PRIMARY KEY,
    bucket        TEXT NOT NULL,
    filename      TEXT NOT NULL,
    content_type  TEXT,
    length        INTEGER NOT NULL,
    chunk_size    INTEGER NOT NULL,
    upload_date   TEXT NOT NULL,
    sha256        TEXT NOT NULL,
    UNIQUE (bucket, filename)
);

CREATE INDEX idx_fs_files_bucket_date ON fs_files(bucket, upload_date);

-- File content, split into fixed-size chunks numbered from 0
CREATE TABLE fs_chunks (
    files_id  TEXT NOT NULL,
    n         INTEGER NOT NULL,
    data      BLOB NOT NULL,
    PRIMARY KEY (files_id, n)
);
"#,
];
