//! Site settings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub const SITE_NAME_KEY: &str = "siteName";
pub const THEME_KEY: &str = "theme";
pub const LOGIN_SUBTITLE_KEY: &str = "loginSubtitle";

pub const DEFAULT_SITE_NAME: &str = "Book Club";
pub const DEFAULT_THEME: &str = "classic";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteSetting {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSetting {
    pub key: String,
    pub value: String,
}

/// Value of a single key, null when unset
#[derive(Debug, Serialize, ToSchema)]
pub struct SettingValue {
    pub key: String,
    pub value: Option<String>,
}

/// Branding with defaults applied
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    pub site_name: String,
    pub theme: String,
    pub login_subtitle: Option<String>,
}
