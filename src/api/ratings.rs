//! Rating endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::rating::{RateBook, Rating},
    AppState,
};

use super::AuthenticatedUser;

/// Rate a book, replacing any earlier rating by the caller
#[utoipa::path(
    post,
    path = "/ratings",
    tag = "ratings",
    security(("bearer_auth" = [])),
    request_body = RateBook,
    responses(
        (status = 200, description = "Rating stored", body = Rating),
        (status = 400, description = "Value outside 0.5..5 in half steps", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn rate_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<RateBook>,
) -> AppResult<Json<Rating>> {
    let rating = state.services.ratings.rate(claims.user_id, &request).await?;
    Ok(Json(rating))
}

/// Delete a rating
#[utoipa::path(
    delete,
    path = "/ratings/{id}",
    tag = "ratings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Rating ID")
    ),
    responses(
        (status = 204, description = "Rating deleted"),
        (status = 403, description = "Not your rating", body = crate::error::ErrorResponse),
        (status = 404, description = "Rating not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_rating(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.ratings.delete(id, &claims).await?;
    Ok(StatusCode::NO_CONTENT)
}
