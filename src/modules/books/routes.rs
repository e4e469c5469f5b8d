//! HTTP handlers for `/api/books`.

use axum::{extract::State, http::StatusCode, Json};
use bookshelf_db::{Page, PageRequest};
use bookshelf_http::{AppResult, EntityId, ErrorResponse, ValidatedJson, ValidatedQuery};
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use super::models::{Book, CreateBook, UpdateBook};
use super::store::BookStore;

/// Routes and their OpenAPI description, relative to the module mount point.
pub fn router(store: BookStore) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_books, create_book))
        .routes(routes!(get_book, update_book, delete_book))
        .with_state(store)
}

/// Get all books
#[utoipa::path(
    get,
    path = "/",
    tag = "books",
    params(PageRequest),
    responses(
        (status = 200, description = "Returns a page of books.", body = Page<Book>),
        (status = 400, description = "Invalid pagination parameters.", body = ErrorResponse)
    )
)]
async fn list_books(
    State(store): State<BookStore>,
    ValidatedQuery(page): ValidatedQuery<PageRequest>,
) -> AppResult<Json<Page<Book>>> {
    Ok(Json(store.list(page.resolve()).await?))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Returns a single book.", body = Book),
        (status = 400, description = "Invalid UUID format.", body = ErrorResponse),
        (status = 404, description = "Book not found.", body = ErrorResponse)
    )
)]
async fn get_book(State(store): State<BookStore>, EntityId(id): EntityId) -> AppResult<Json<Book>> {
    Ok(Json(store.get(id).await?))
}

/// Create new book
#[utoipa::path(
    post,
    path = "/",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book successfully created.", body = Book),
        (status = 400, description = "Invalid input.", body = ErrorResponse),
        (status = 404, description = "Author not found.", body = ErrorResponse)
    )
)]
async fn create_book(
    State(store): State<BookStore>,
    ValidatedJson(input): ValidatedJson<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = store.create(input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update book
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book successfully updated.", body = Book),
        (status = 400, description = "Invalid UUID format or invalid input.", body = ErrorResponse),
        (status = 404, description = "Book or author not found.", body = ErrorResponse)
    )
)]
async fn update_book(
    State(store): State<BookStore>,
    EntityId(id): EntityId,
    ValidatedJson(patch): ValidatedJson<UpdateBook>,
) -> AppResult<Json<Book>> {
    Ok(Json(store.update(id, patch).await?))
}

/// Delete book
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book successfully deleted."),
        (status = 400, description = "Invalid UUID format.", body = ErrorResponse),
        (status = 404, description = "Book not found.", body = ErrorResponse)
    )
)]
async fn delete_book(State(store): State<BookStore>, EntityId(id): EntityId) -> AppResult<StatusCode> {
    store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
