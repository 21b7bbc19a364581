//! Poll endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::vote::{CastVote, Vote, VoteWithBook},
    AppState,
};

use super::AuthenticatedUser;

/// Vote for a suggestion, moving any earlier vote
#[utoipa::path(
    post,
    path = "/votes",
    tag = "votes",
    security(("bearer_auth" = [])),
    request_body = CastVote,
    responses(
        (status = 200, description = "Vote stored", body = Vote),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Book is not a suggestion", body = crate::error::ErrorResponse)
    )
)]
pub async fn cast_vote(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CastVote>,
) -> AppResult<Json<Vote>> {
    let vote = state.services.votes.cast(claims.user_id, request.book_id).await?;
    Ok(Json(vote))
}

/// The caller's current vote, null when none
#[utoipa::path(
    get,
    path = "/votes/mine",
    tag = "votes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Vote or null", body = Option<VoteWithBook>)
    )
)]
pub async fn my_vote(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Option<VoteWithBook>>> {
    let vote = state.services.votes.mine(claims.user_id).await?;
    Ok(Json(vote))
}

/// Withdraw the caller's vote
#[utoipa::path(
    delete,
    path = "/votes/mine",
    tag = "votes",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Vote withdrawn")
    )
)]
pub async fn withdraw_vote(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<StatusCode> {
    state.services.votes.withdraw(claims.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
