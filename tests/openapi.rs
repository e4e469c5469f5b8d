mod common;

use axum::http::StatusCode;
use common::TestApp;

#[tokio::test]
async fn document_lists_catalogue_paths() {
    let app = TestApp::spawn().await;

    let (status, doc) = app.get("/docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);

    let paths = doc["paths"].as_object().unwrap();
    for path in [
        "/healthz",
        "/api/authors",
        "/api/authors/{id}",
        "/api/books",
        "/api/books/{id}",
    ] {
        assert!(paths.contains_key(path), "missing {path}");
    }

    let by_id = &doc["paths"]["/api/authors/{id}"];
    assert!(by_id["get"].is_object());
    assert!(by_id["put"].is_object());
    assert!(by_id["delete"].is_object());
    assert_eq!(doc["paths"]["/api/books"]["get"]["tags"][0], "books");

    let schemas = doc["components"]["schemas"].as_object().unwrap();
    for schema in ["CreateAuthor", "UpdateBook", "ErrorResponse"] {
        assert!(schemas.contains_key(schema), "missing schema {schema}");
    }
}

#[tokio::test]
async fn health_check_is_plain_ok() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}
