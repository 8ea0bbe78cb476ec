//! End-to-end test over a real TCP socket with a multipart client.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use serde_json::Value;

use readwise_api::{build_router, ApiConfig, AppState};
use readwise_db::MemoryStore;

const EXTRACT: &str = r#"{
  "asin": "B00E2E",
  "title": "Socket Reading",
  "authors": "A. Tester",
  "highlights": [
    {"text": "First line", "isNoteOnly": false, "location": {"url": "kindle://book?action=open&location=5", "value": 5}, "note": ""},
    {"text": "", "isNoteOnly": true, "location": {"url": "", "value": 9}, "note": "only a note"}
  ]
}"#;

#[tokio::test]
async fn test_upload_over_http() {
    let store = MemoryStore::new();
    let app = build_router(AppState::new(
        Arc::new(store.clone()),
        &ApiConfig::default(),
    ));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();
    let form = Form::new().part(
        "file",
        Part::bytes(EXTRACT.as_bytes().to_vec())
            .file_name("My Clippings.json")
            .mime_str("application/json")
            .unwrap(),
    );

    let response = client
        .post(format!("http://{}/api/v1/users/e2e-user/parse-kindle-file", addr))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["book_id"], "B00E2E");
    assert_eq!(body["highlights_saved"], 2);

    let book: Value = client
        .get(format!("http://{}/api/v1/users/e2e-user/book", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(book["title"], "Socket Reading");
    assert_eq!(book["highlights"][1]["is_note_only"], true);
    assert_eq!(book["highlights"][1]["note"], "only a note");
    assert_eq!(store.highlight_count(), 2);

    server.abort();
}
