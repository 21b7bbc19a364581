//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{
        Book, BookDetail, BookListItem, BookQuery, BookSearchResult, CreateBook, EditionIsbns,
        EditionQuery, SearchQuery, UpdateBook,
    },
    AppState,
};

use super::AuthenticatedUser;

/// List books, optionally filtered by status
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "Books with rating aggregates, newest first", body = Vec<BookListItem>)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<BookListItem>>> {
    let books = state.services.catalog.list(query.status).await?;
    Ok(Json(books))
}

/// Get a book with its ratings and discussion questions
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetail),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<BookDetail>> {
    let book = state.services.catalog.detail(id, claims.user_id).await?;
    Ok(Json(book))
}

/// Add a book; members can only suggest
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.catalog.create(book, &claims).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Change a book's status or synopsis
#[utoipa::path(
    patch,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 403, description = "Status changes need an administrator", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(update): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.update(id, update, &claims).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 403, description = "Not allowed", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete(id, &claims).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Search the external catalog by title, author or ISBN
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matches, possibly empty", body = Vec<BookSearchResult>)
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<BookSearchResult>> {
    Json(state.services.catalog.search(&query.q).await)
}

/// ISBNs of a work's English edition
#[utoipa::path(
    get,
    path = "/books/english-isbn",
    tag = "books",
    params(EditionQuery),
    responses(
        (status = 200, description = "ISBNs, null when unknown", body = EditionIsbns),
        (status = 400, description = "Malformed work key", body = crate::error::ErrorResponse)
    )
)]
pub async fn english_isbn(
    State(state): State<AppState>,
    Query(query): Query<EditionQuery>,
) -> AppResult<Json<EditionIsbns>> {
    let isbns = state.services.catalog.english_isbn(&query.work_key).await?;
    Ok(Json(isbns))
}
