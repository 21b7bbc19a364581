//! Private reading note endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::note::{BookNote, SaveNote},
    AppState,
};

use super::AuthenticatedUser;

/// The caller's note on a book, null when none
#[utoipa::path(
    get,
    path = "/books/{id}/note",
    tag = "notes",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Note or null", body = Option<BookNote>),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_note(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i64>,
) -> AppResult<Json<Option<BookNote>>> {
    let note = state.services.notes.get(claims.user_id, book_id).await?;
    Ok(Json(note))
}

/// Save the caller's note; blank content deletes it
#[utoipa::path(
    put,
    path = "/books/{id}/note",
    tag = "notes",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = SaveNote,
    responses(
        (status = 200, description = "Saved note, or null after deletion", body = Option<BookNote>),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn save_note(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i64>,
    Json(request): Json<SaveNote>,
) -> AppResult<Json<Option<BookNote>>> {
    let note = state
        .services
        .notes
        .save(claims.user_id, book_id, &request.content)
        .await?;
    Ok(Json(note))
}
