//! Self-service profile endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::{
        rating::RatingWithBook,
        user::{ChangePassword, UpdateEmail, User},
    },
    AppState,
};

use super::AuthenticatedUser;

/// Change own email address
#[utoipa::path(
    put,
    path = "/profile/email",
    tag = "profile",
    security(("bearer_auth" = [])),
    request_body = UpdateEmail,
    responses(
        (status = 200, description = "Email updated", body = User),
        (status = 400, description = "Invalid email", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_email(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<UpdateEmail>,
) -> AppResult<Json<User>> {
    let user = state
        .services
        .users
        .update_email(claims.user_id, request)
        .await?;
    Ok(Json(user))
}

/// Change own password
#[utoipa::path(
    put,
    path = "/profile/password",
    tag = "profile",
    security(("bearer_auth" = [])),
    request_body = ChangePassword,
    responses(
        (status = 204, description = "Password changed"),
        (status = 403, description = "Current password is wrong", body = crate::error::ErrorResponse)
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<ChangePassword>,
) -> AppResult<StatusCode> {
    state
        .services
        .users
        .change_password(claims.user_id, &request)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Own rating history
#[utoipa::path(
    get,
    path = "/profile/ratings",
    tag = "profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Ratings by the caller, newest first", body = Vec<RatingWithBook>)
    )
)]
pub async fn my_ratings(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<RatingWithBook>>> {
    let ratings = state.services.ratings.for_user(claims.user_id).await?;
    Ok(Json(ratings))
}
