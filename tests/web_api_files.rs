//! File metadata and image streaming tests.

mod common;

use axum::http::StatusCode;
use common::{
    create_test_config, create_test_server, create_test_server_with_config, upload_and_find,
    JPEG_BYTES, PNG_BYTES,
};
use serde_json::{json, Value};

#[tokio::test]
async fn test_list_files_empty() {
    let (server, _store) = create_test_server().await;

    let response = server.get("/files").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>(), json!({ "err": "No files exist" }));
}

#[tokio::test]
async fn test_list_files_returns_all_records() {
    let (server, store) = create_test_server().await;

    let png = upload_and_find(&server, &store, "a.png", "image/png", PNG_BYTES).await;
    let txt = upload_and_find(&server, &store, "notes.txt", "text/plain", b"hello").await;

    let response = server.get("/files").await;
    response.assert_status_ok();

    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 2);

    let names: Vec<&str> = body.iter().filter_map(|f| f["filename"].as_str()).collect();
    assert!(names.contains(&png.filename.as_str()));
    assert!(names.contains(&txt.filename.as_str()));

    for record in &body {
        assert!(record["_id"].is_string());
        assert!(record["length"].is_number());
        assert!(record["chunkSize"].is_number());
        assert!(record["uploadDate"].is_string());
        assert!(record.get("bucket").is_none());
    }
}

#[tokio::test]
async fn test_get_file_unknown() {
    let (server, _store) = create_test_server().await;

    let response = server.get("/files/does-not-exist.png").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>(), json!({ "err": "No file exists" }));
}

#[tokio::test]
async fn test_get_file_non_image_metadata() {
    let (server, store) = create_test_server().await;

    let file = upload_and_find(&server, &store, "doc.pdf", "application/pdf", b"%PDF-1.4").await;

    let response = server.get(&format!("/files/{}", file.filename)).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["contentType"], "application/pdf");
    assert_eq!(body["length"], 8);
}

#[tokio::test]
async fn test_get_image_png() {
    let (server, store) = create_test_server().await;

    let file = upload_and_find(&server, &store, "cat.png", "image/png", PNG_BYTES).await;

    let response = server.get(&format!("/image/{}", file.filename)).await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "image/png");
    assert_eq!(
        response.header("content-length"),
        PNG_BYTES.len().to_string().as_str()
    );
    assert_eq!(response.as_bytes().as_ref(), PNG_BYTES);
}

#[tokio::test]
async fn test_get_image_jpeg() {
    let (server, store) = create_test_server().await;

    let file = upload_and_find(&server, &store, "dog.jpg", "image/jpeg", JPEG_BYTES).await;

    let response = server.get(&format!("/image/{}", file.filename)).await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "image/jpeg");
    assert_eq!(response.as_bytes().as_ref(), JPEG_BYTES);
}

#[tokio::test]
async fn test_get_image_spanning_many_chunks() {
    let mut config = create_test_config();
    config.storage.chunk_size = 7;
    let (server, store) = create_test_server_with_config(config).await;

    let content: Vec<u8> = (0..500u32).map(|i| (i * 31 % 251) as u8).collect();
    let file = upload_and_find(&server, &store, "big.png", "image/png", &content).await;
    assert!(file.chunk_count() > 1);

    let response = server.get(&format!("/image/{}", file.filename)).await;

    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), content.as_slice());
}

#[tokio::test]
async fn test_get_image_rejects_other_types() {
    let (server, store) = create_test_server().await;

    let gif = upload_and_find(&server, &store, "anim.gif", "image/gif", b"GIF89a").await;
    let txt = upload_and_find(&server, &store, "a.txt", "text/plain", b"text").await;

    for file in [gif, txt] {
        let response = server.get(&format!("/image/{}", file.filename)).await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>(), json!({ "err": "Not an image" }));
    }
}

#[tokio::test]
async fn test_get_image_unknown() {
    let (server, _store) = create_test_server().await;

    let response = server.get("/image/missing.png").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>(), json!({ "err": "No file exists" }));
}
