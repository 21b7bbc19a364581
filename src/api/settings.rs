//! Site settings endpoints

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::setting::{Branding, SettingValue, SiteSetting, UpdateSetting},
    AppState,
};

use super::AuthenticatedUser;

/// All settings as a key/value object
#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    responses(
        (status = 200, description = "Stored settings", body = BTreeMap<String, String>)
    )
)]
pub async fn get_settings(State(state): State<AppState>) -> AppResult<Json<BTreeMap<String, String>>> {
    let settings = state.services.settings.all().await?;
    Ok(Json(settings))
}

/// Branding with defaults applied
#[utoipa::path(
    get,
    path = "/settings/branding",
    tag = "settings",
    responses(
        (status = 200, description = "Site name, theme and login subtitle", body = Branding)
    )
)]
pub async fn get_branding(State(state): State<AppState>) -> AppResult<Json<Branding>> {
    let branding = state.services.settings.branding().await?;
    Ok(Json(branding))
}

/// Value of one setting
#[utoipa::path(
    get,
    path = "/settings/{key}",
    tag = "settings",
    params(
        ("key" = String, Path, description = "Setting key")
    ),
    responses(
        (status = 200, description = "Value, null when unset", body = SettingValue)
    )
)]
pub async fn get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<SettingValue>> {
    let value = state.services.settings.get(&key).await?;
    Ok(Json(SettingValue { key, value }))
}

/// Create or replace a setting
#[utoipa::path(
    put,
    path = "/settings",
    tag = "settings",
    security(("bearer_auth" = [])),
    request_body = UpdateSetting,
    responses(
        (status = 200, description = "Setting stored", body = SiteSetting),
        (status = 403, description = "Not an administrator", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_setting(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<UpdateSetting>,
) -> AppResult<Json<SiteSetting>> {
    claims.require_admin()?;

    let setting = state
        .services
        .settings
        .update(&request.key, &request.value)
        .await?;
    Ok(Json(setting))
}
