//! HTTP handlers for `/api/authors`.

use axum::{extract::State, http::StatusCode, Json};
use bookshelf_db::{Page, PageRequest};
use bookshelf_http::{AppResult, EntityId, ErrorResponse, ValidatedJson, ValidatedQuery};
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use super::models::{Author, CreateAuthor, UpdateAuthor};
use super::store::AuthorStore;

/// Routes and their OpenAPI description, relative to the module mount point.
pub fn router(store: AuthorStore) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_authors, create_author))
        .routes(routes!(get_author, update_author, delete_author))
        .with_state(store)
}

/// Get all authors
#[utoipa::path(
    get,
    path = "/",
    tag = "authors",
    params(PageRequest),
    responses(
        (status = 200, description = "Returns a page of authors.", body = Page<Author>),
        (status = 400, description = "Invalid pagination parameters.", body = ErrorResponse)
    )
)]
async fn list_authors(
    State(store): State<AuthorStore>,
    ValidatedQuery(page): ValidatedQuery<PageRequest>,
) -> AppResult<Json<Page<Author>>> {
    Ok(Json(store.list(page.resolve()).await?))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Returns a single author.", body = Author),
        (status = 400, description = "Invalid UUID format.", body = ErrorResponse),
        (status = 404, description = "Author not found.", body = ErrorResponse)
    )
)]
async fn get_author(
    State(store): State<AuthorStore>,
    EntityId(id): EntityId,
) -> AppResult<Json<Author>> {
    Ok(Json(store.get(id).await?))
}

/// Create new author
#[utoipa::path(
    post,
    path = "/",
    tag = "authors",
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author successfully created.", body = Author),
        (status = 400, description = "Invalid input.", body = ErrorResponse)
    )
)]
async fn create_author(
    State(store): State<AuthorStore>,
    ValidatedJson(input): ValidatedJson<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let author = store.create(input).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Update author
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author successfully updated.", body = Author),
        (status = 400, description = "Invalid UUID format or invalid input.", body = ErrorResponse),
        (status = 404, description = "Author not found.", body = ErrorResponse)
    )
)]
async fn update_author(
    State(store): State<AuthorStore>,
    EntityId(id): EntityId,
    ValidatedJson(patch): ValidatedJson<UpdateAuthor>,
) -> AppResult<Json<Author>> {
    Ok(Json(store.update(id, patch).await?))
}

/// Delete author
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author successfully deleted."),
        (status = 400, description = "Invalid UUID format.", body = ErrorResponse),
        (status = 404, description = "Author not found.", body = ErrorResponse),
        (status = 409, description = "Author still has books.", body = ErrorResponse)
    )
)]
async fn delete_author(
    State(store): State<AuthorStore>,
    EntityId(id): EntityId,
) -> AppResult<StatusCode> {
    store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
