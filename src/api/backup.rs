//! Backup export and restore endpoints (administrators)

use axum::{
    extract::State,
    http::header::CONTENT_DISPOSITION,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::AppResult,
    models::backup::{BackupDocument, RestoreSummary},
    AppState,
};

use super::AuthenticatedUser;

/// Download the whole database as a JSON document
#[utoipa::path(
    get,
    path = "/backup",
    tag = "backup",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Backup file", body = BackupDocument),
        (status = 403, description = "Not an administrator", body = crate::error::ErrorResponse)
    )
)]
pub async fn export_backup(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Response> {
    claims.require_admin()?;

    let document = state.services.backup.export().await?;
    let disposition = format!("attachment; filename=\"{}\"", document.file_name());
    Ok(([(CONTENT_DISPOSITION, disposition)], Json(document)).into_response())
}

/// Replace the whole database with an uploaded backup
#[utoipa::path(
    post,
    path = "/backup",
    tag = "backup",
    security(("bearer_auth" = [])),
    request_body = BackupDocument,
    responses(
        (status = 200, description = "Rows restored per entity", body = RestoreSummary),
        (status = 400, description = "Malformed or unsupported document", body = crate::error::ErrorResponse),
        (status = 500, description = "Restore rolled back", body = crate::error::ErrorResponse)
    )
)]
pub async fn import_backup(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(document): Json<serde_json::Value>,
) -> AppResult<Json<RestoreSummary>> {
    claims.require_admin()?;

    let summary = state.services.backup.import(document).await?;
    Ok(Json(summary))
}
