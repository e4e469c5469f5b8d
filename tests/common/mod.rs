#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use bookshelf_kernel::Settings;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

pub struct TestApp {
    pub pool: SqlitePool,
    router: Router,
}

impl TestApp {
    /// Fresh migrated in-memory database with the full HTTP stack on top.
    pub async fn spawn() -> Self {
        let pool = bookshelf_db::connect_in_memory().await.unwrap();
        bookshelf_app::migrate(&pool).await.unwrap();
        let registry = bookshelf_app::registry(&pool);
        let router = bookshelf_http::build_router(&registry, &Settings::default());
        Self { pool, router }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request("POST", uri, &body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request("PUT", uri, &body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::delete(uri).body(Body::empty()).unwrap()).await
    }

    /// Create an author and return its id.
    pub async fn author(&self, first_name: &str, last_name: &str) -> String {
        let (status, body) = self
            .post(
                "/api/authors",
                json!({ "firstName": first_name, "lastName": last_name }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_owned()
    }

    /// Create a book for `author_id` and return its id.
    pub async fn book(&self, title: &str, author_id: &str) -> String {
        let (status, body) = self
            .post(
                "/api/books",
                json!({
                    "title": title,
                    "authorId": author_id,
                    "pageCount": 300,
                    "releaseDate": "2023-01-01"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_owned()
    }
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub const MISSING_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
