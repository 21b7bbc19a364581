//! Meeting announcement endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::announcement::{Announcement, CreateAnnouncement},
    AppState,
};

use super::AuthenticatedUser;

/// The active announcement, null when none
#[utoipa::path(
    get,
    path = "/announcements/active",
    tag = "announcements",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Announcement or null", body = Option<Announcement>)
    )
)]
pub async fn active_announcement(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Option<Announcement>>> {
    let announcement = state.services.announcements.active().await?;
    Ok(Json(announcement))
}

/// Publish an announcement, replacing the active one
#[utoipa::path(
    post,
    path = "/announcements",
    tag = "announcements",
    security(("bearer_auth" = [])),
    request_body = CreateAnnouncement,
    responses(
        (status = 201, description = "Announcement published", body = Announcement),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Not an administrator", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_announcement(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateAnnouncement>,
) -> AppResult<(StatusCode, Json<Announcement>)> {
    claims.require_admin()?;

    let announcement = state.services.announcements.create(&request).await?;
    Ok((StatusCode::CREATED, Json(announcement)))
}

/// Take down the active announcement
#[utoipa::path(
    delete,
    path = "/announcements/active",
    tag = "announcements",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Announcement deactivated"),
        (status = 403, description = "Not an administrator", body = crate::error::ErrorResponse)
    )
)]
pub async fn deactivate_announcement(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.announcements.deactivate().await?;
    Ok(StatusCode::NO_CONTENT)
}
