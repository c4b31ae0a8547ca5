//! Test helpers for web API tests.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use nodekb::{ChunkedFileStore, Config, Database, StoredFile, WebServer};

/// A minimal PNG signature plus some payload bytes.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR-test-image-payload";

/// A minimal JPEG header plus some payload bytes.
pub const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0\0\x10JFIF\0-test-jpeg";

/// Create a test configuration.
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config
}

/// Create a test server with an in-memory database.
pub async fn create_test_server() -> (TestServer, ChunkedFileStore) {
    create_test_server_with_config(create_test_config()).await
}

/// Create a test server from a custom configuration.
pub async fn create_test_server_with_config(config: Config) -> (TestServer, ChunkedFileStore) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let web = WebServer::new(&config, db).expect("Failed to create web server");
    let store = web.app_state().store.clone();
    let server = TestServer::new(web.into_router()).expect("Failed to create test server");

    (server, store)
}

/// Build a single-file multipart form under the `file` field.
pub fn file_form(original_name: &str, mime_type: &str, content: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(content.to_vec())
            .file_name(original_name)
            .mime_type(mime_type),
    )
}

/// POST a file to `/upload`.
pub async fn upload(
    server: &TestServer,
    original_name: &str,
    mime_type: &str,
    content: &[u8],
) -> TestResponse {
    server
        .post("/upload")
        .multipart(file_form(original_name, mime_type, content))
        .await
}

/// Upload a file and return its metadata as recorded by the store.
pub async fn upload_and_find(
    server: &TestServer,
    store: &ChunkedFileStore,
    original_name: &str,
    mime_type: &str,
    content: &[u8],
) -> StoredFile {
    let before: Vec<String> = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.id)
        .collect();

    upload(server, original_name, mime_type, content)
        .await
        .assert_status(axum::http::StatusCode::FOUND);

    let mut added: Vec<StoredFile> = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .filter(|f| !before.contains(&f.id))
        .collect();
    assert_eq!(added.len(), 1, "upload should add exactly one file");
    added.remove(0)
}

/// Create a test server over a SQLite file in `dir`, with a real
/// multi-connection pool.
pub async fn create_file_backed_server(
    dir: &std::path::Path,
    max_connections: u32,
) -> (TestServer, ChunkedFileStore) {
    let url = format!("sqlite://{}", dir.join("nodekb.db").display());
    let db = Database::open(&url, max_connections)
        .await
        .expect("Failed to open file-backed database");

    let web = WebServer::new(&create_test_config(), db).expect("Failed to create web server");
    let store = web.app_state().store.clone();
    let server = TestServer::new(web.into_router()).expect("Failed to create test server");

    (server, store)
}
