//! Invite code endpoints (administrators)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::invite_code::{InviteCode, InviteCodeDetails},
    AppState,
};

use super::AuthenticatedUser;

/// List invite codes with their creator and redeemer
#[utoipa::path(
    get,
    path = "/invite-codes",
    tag = "invite-codes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Invite codes, newest first", body = Vec<InviteCodeDetails>),
        (status = 403, description = "Not an administrator", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_invite_codes(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<InviteCodeDetails>>> {
    claims.require_admin()?;

    let codes = state.services.invite_codes.list().await?;
    Ok(Json(codes))
}

/// Issue a new random invite code
#[utoipa::path(
    post,
    path = "/invite-codes",
    tag = "invite-codes",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Invite code created", body = InviteCode),
        (status = 500, description = "No free code found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_invite_code(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<(StatusCode, Json<InviteCode>)> {
    claims.require_admin()?;

    let invite = state.services.invite_codes.create(claims.user_id).await?;
    Ok((StatusCode::CREATED, Json(invite)))
}

/// Delete an unused invite code
#[utoipa::path(
    delete,
    path = "/invite-codes/{id}",
    tag = "invite-codes",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Invite code ID")
    ),
    responses(
        (status = 204, description = "Invite code deleted"),
        (status = 404, description = "Invite code not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invite code already redeemed", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_invite_code(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.invite_codes.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
