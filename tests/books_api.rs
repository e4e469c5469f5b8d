mod common;

use axum::http::StatusCode;
use bookshelf_app::modules::books::store::BookStore;
use common::{TestApp, MISSING_ID};
use serde_json::json;

#[tokio::test]
async fn create_embeds_author() {
    let app = TestApp::spawn().await;
    let author = app.author("John", "Doe").await;

    let (status, body) = app
        .post(
            "/api/books",
            json!({
                "title": "The Great Gatsby",
                "authorId": author,
                "pageCount": 300,
                "releaseDate": "2023-01-01"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "The Great Gatsby");
    assert_eq!(body["pageCount"], 300);
    assert_eq!(body["releaseDate"], "2023-01-01");
    assert_eq!(body["author"]["id"], author.as_str());
    assert_eq!(body["author"]["firstName"], "John");
    assert!(body["author"].get("books").is_none());
}

#[tokio::test]
async fn create_for_missing_author_writes_nothing() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post(
            "/api/books",
            json!({
                "title": "Orphan",
                "authorId": MISSING_ID,
                "pageCount": 10,
                "releaseDate": "2020-02-02"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"]["message"],
        format!("Author with ID {MISSING_ID} not found")
    );
    assert_eq!(BookStore::new(app.pool.clone()).count().await.unwrap(), 0);
}

#[tokio::test]
async fn create_validates_payload() {
    let app = TestApp::spawn().await;
    let author = app.author("John", "Doe").await;

    let invalid = [
        json!({ "title": "", "authorId": author, "pageCount": 1, "releaseDate": "2020-01-01" }),
        json!({ "title": "T", "authorId": author, "pageCount": 0, "releaseDate": "2020-01-01" }),
        json!({ "title": "T", "authorId": "nope", "pageCount": 1, "releaseDate": "2020-01-01" }),
        json!({ "title": "T", "authorId": author, "pageCount": 1, "releaseDate": "yesterday" }),
        json!({ "title": "T", "pageCount": 1, "releaseDate": "2020-01-01" }),
    ];

    for payload in invalid {
        let (status, _) = app.post("/api/books", payload.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
    }
}

#[tokio::test]
async fn list_pages_through_books() {
    let app = TestApp::spawn().await;
    let author = app.author("John", "Doe").await;
    for n in 0..12 {
        app.book(&format!("Volume {n}"), &author).await;
    }

    let (status, body) = app.get("/api/books?page=2&limit=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["meta"],
        json!({ "total": 12, "page": 2, "limit": 5, "totalPages": 3 })
    );

    let titles: Vec<_> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["title"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(titles, ["Volume 10", "Volume 11"]);
    assert_eq!(body["items"][0]["author"]["lastName"], "Doe");
}

#[tokio::test]
async fn empty_catalogue_has_zero_pages() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["meta"]["total"], 0);
    assert_eq!(body["meta"]["totalPages"], 0);
}

#[tokio::test]
async fn update_moves_book_between_authors() {
    let app = TestApp::spawn().await;
    let first = app.author("Jane", "Austen").await;
    let second = app.author("Agatha", "Christie").await;
    let book = app.book("Emma", &first).await;

    let (status, body) = app
        .put(
            &format!("/api/books/{book}"),
            json!({ "authorId": second, "pageCount": 474 }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Emma");
    assert_eq!(body["pageCount"], 474);
    assert_eq!(body["author"]["id"], second.as_str());

    let (_, old_owner) = app.get(&format!("/api/authors/{first}")).await;
    assert_eq!(old_owner["books"], json!([]));
    let (_, new_owner) = app.get(&format!("/api/authors/{second}")).await;
    assert_eq!(new_owner["books"][0]["id"], book.as_str());
}

#[tokio::test]
async fn update_with_missing_author_keeps_original() {
    let app = TestApp::spawn().await;
    let author = app.author("Stephen", "King").await;
    let book = app.book("It", &author).await;

    let (status, _) = app
        .put(
            &format!("/api/books/{book}"),
            json!({ "authorId": MISSING_ID, "title": "Changed" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, stored) = app.get(&format!("/api/books/{book}")).await;
    assert_eq!(stored["title"], "It");
    assert_eq!(stored["author"]["id"], author.as_str());
}

#[tokio::test]
async fn missing_and_malformed_book_ids() {
    let app = TestApp::spawn().await;

    let (status, _) = app.get(&format!("/api/books/{MISSING_ID}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .put(&format!("/api/books/{MISSING_ID}"), json!({ "title": "X" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.delete(&format!("/api/books/{MISSING_ID}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"]["message"],
        format!("Book with ID {MISSING_ID} not found")
    );

    let (status, _) = app.delete("/api/books/123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_removes_book_from_author() {
    let app = TestApp::spawn().await;
    let author = app.author("John", "Doe").await;
    let book = app.book("Short Story", &author).await;

    let (status, _) = app.delete(&format!("/api/books/{book}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, owner) = app.get(&format!("/api/authors/{author}")).await;
    assert_eq!(owner["books"], json!([]));
}
