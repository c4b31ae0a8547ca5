//! Chunked file store.
//!
//! Files are kept in two tables:
//! ```text
//! fs_files   id | bucket | filename | content_type | length | chunk_size | upload_date | sha256
//! fs_chunks  files_id | n | data
//! ```
//! Chunk `n` holds bytes `[n * chunk_size, (n + 1) * chunk_size)` of the file.
//! A write spools the upload to a temporary file first, then inserts every
//! row in one transaction, so readers only ever see a file as absent or
//! complete.

use bytes::Bytes;
use chrono::Utc;
use futures::{Stream, StreamExt, TryStreamExt};
use sha2::{Digest, Sha256};
use sqlx::SqliteConnection;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, info};
use uuid::Uuid;

use super::StoredFile;
use crate::db::Database;
use crate::{NodekbError, Result};

const FILE_COLUMNS: &str =
    "id, bucket, filename, content_type, length, chunk_size, upload_date, sha256";

/// Handle to the chunked store for one bucket.
///
/// Cloning is cheap; all clones share the database pool.
#[derive(Debug, Clone)]
pub struct ChunkedFileStore {
    db: Database,
    bucket: String,
    chunk_size: usize,
}

impl ChunkedFileStore {
    /// Create a store over `db` for the given bucket and chunk size.
    pub fn new(db: Database, bucket: impl Into<String>, chunk_size: usize) -> Self {
        Self {
            db,
            bucket: bucket.into(),
            chunk_size: chunk_size.max(1),
        }
    }

    /// Get the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Get the chunk size in bytes.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Stream `content` into the store under `filename`.
    ///
    /// The content is spooled to an anonymous temporary file while it
    /// arrives, so no connection or write lock is held during client I/O.
    /// Once the stream ends, the chunks and the metadata row are inserted
    /// in one short transaction. When `max_length` is given, a longer stream
    /// aborts the write with `TooLarge`. Stream errors abort it unchanged.
    pub async fn write<S, E>(
        &self,
        filename: &str,
        content_type: Option<&str>,
        content: S,
        max_length: Option<u64>,
    ) -> Result<StoredFile>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: Into<NodekbError>,
    {
        let mut content = std::pin::pin!(content);
        let mut spool = File::from_std(tempfile::tempfile()?);

        let mut hasher = Sha256::new();
        let mut length: u64 = 0;

        while let Some(piece) = content.next().await {
            let piece = piece.map_err(Into::into)?;

            length += piece.len() as u64;
            if let Some(max) = max_length {
                if length > max {
                    return Err(NodekbError::TooLarge(format!(
                        "file exceeds maximum size of {max} bytes"
                    )));
                }
            }
            hasher.update(&piece);
            spool.write_all(&piece).await?;
        }

        spool.flush().await?;
        spool.rewind().await?;

        let id = Uuid::new_v4().to_string();
        let mut tx = self.db.pool().begin().await?;

        let mut buf = vec![0u8; self.chunk_size];
        let mut remaining = length;
        let mut n: i64 = 0;
        while remaining > 0 {
            let take = (self.chunk_size as u64).min(remaining) as usize;
            spool.read_exact(&mut buf[..take]).await?;
            insert_chunk(&mut tx, &id, n, &buf[..take]).await?;
            remaining -= take as u64;
            n += 1;
        }

        let file = StoredFile {
            id,
            bucket: self.bucket.clone(),
            filename: filename.to_string(),
            content_type: content_type.map(str::to_string),
            length: length as i64,
            chunk_size: self.chunk_size as i64,
            upload_date: Utc::now(),
            sha256: format!("{:x}", hasher.finalize()),
        };

        sqlx::query(
            "INSERT INTO fs_files (id, bucket, filename, content_type, length, chunk_size, upload_date, sha256)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&file.id)
        .bind(&file.bucket)
        .bind(&file.filename)
        .bind(&file.content_type)
        .bind(file.length)
        .bind(file.chunk_size)
        .bind(file.upload_date)
        .bind(&file.sha256)
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                NodekbError::Storage(format!("filename {} already exists", file.filename))
            }
            other => other.into(),
        })?;

        tx.commit().await?;

        info!(
            id = %file.id,
            filename = %file.filename,
            length = file.length,
            chunks = n,
            "Stored file"
        );

        Ok(file)
    }

    /// List every file in the bucket, oldest first.
    pub async fn list_all(&self) -> Result<Vec<StoredFile>> {
        let files = sqlx::query_as::<_, StoredFile>(&format!(
            "SELECT {FILE_COLUMNS} FROM fs_files WHERE bucket = ? ORDER BY upload_date, id"
        ))
        .bind(&self.bucket)
        .fetch_all(self.db.pool())
        .await?;

        Ok(files)
    }

    /// Find a file by its stored filename.
    pub async fn find_by_filename(&self, filename: &str) -> Result<Option<StoredFile>> {
        let file = sqlx::query_as::<_, StoredFile>(&format!(
            "SELECT {FILE_COLUMNS} FROM fs_files WHERE bucket = ? AND filename = ?"
        ))
        .bind(&self.bucket)
        .bind(filename)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(file)
    }

    /// Find a file by its identifier.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<StoredFile>> {
        let file = sqlx::query_as::<_, StoredFile>(&format!(
            "SELECT {FILE_COLUMNS} FROM fs_files WHERE bucket = ? AND id = ?"
        ))
        .bind(&self.bucket)
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(file)
    }

    /// Open a lazy byte stream over a file's content.
    ///
    /// Fails with `NotFound` if no file has this name.
    pub async fn read_stream(
        &self,
        filename: &str,
    ) -> Result<impl Stream<Item = Result<Bytes>> + Send + 'static> {
        let file = self
            .find_by_filename(filename)
            .await?
            .ok_or_else(|| NodekbError::NotFound(format!("file {filename}")))?;

        Ok(self.open_download_stream(&file))
    }

    /// Stream the chunks of an already located file, one query per chunk.
    pub fn open_download_stream(
        &self,
        file: &StoredFile,
    ) -> impl Stream<Item = Result<Bytes>> + Send + 'static {
        let pool = self.db.pool().clone();
        let files_id = file.id.clone();
        let total = file.chunk_count();

        futures::stream::try_unfold(0i64, move |n| {
            let pool = pool.clone();
            let files_id = files_id.clone();
            async move {
                if n >= total {
                    return Ok::<_, NodekbError>(None);
                }

                let data: Option<Vec<u8>> =
                    sqlx::query_scalar("SELECT data FROM fs_chunks WHERE files_id = ? AND n = ?")
                        .bind(&files_id)
                        .bind(n)
                        .fetch_optional(&pool)
                        .await?;

                let data = data.ok_or_else(|| {
                    NodekbError::Storage(format!("chunk {n} of file {files_id} is missing"))
                })?;

                Ok(Some((Bytes::from(data), n + 1)))
            }
        })
    }

    /// Read a whole file into memory.
    pub async fn read_to_vec(&self, filename: &str) -> Result<Vec<u8>> {
        let chunks: Vec<Bytes> = self.read_stream(filename).await?.try_collect().await?;
        Ok(chunks.concat())
    }

    /// Remove a file and its chunks.
    ///
    /// Fails with `NotFound` if the bucket holds no file with this id.
    pub async fn remove(&self, id: &str) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        let deleted = sqlx::query("DELETE FROM fs_files WHERE id = ? AND bucket = ?")
            .bind(id)
            .bind(&self.bucket)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(NodekbError::NotFound(format!("file with id {id}")));
        }

        let chunks = sqlx::query("DELETE FROM fs_chunks WHERE files_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        debug!(id = %id, chunks, "Removed file");
        Ok(())
    }
}

async fn insert_chunk(conn: &mut SqliteConnection, files_id: &str, n: i64, data: &[u8]) -> Result<()> {
    sqlx::query("INSERT INTO fs_chunks (files_id, n, data) VALUES (?, ?, ?)")
        .bind(files_id)
        .bind(n)
        .bind(data)
        .execute(conn)
        .await?;
    Ok(())
}
