//! Meeting announcement model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

pub const DEFAULT_TITLE: &str = "Next Book Club Meeting";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub location: String,
    pub date_time: DateTime<Utc>,
    pub time_zone: String,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnouncement {
    pub title: Option<String>,
    #[validate(length(min = 1, message = "is required"))]
    pub location: String,
    pub date_time: DateTime<Utc>,
    pub time_zone: Option<String>,
    pub notes: Option<String>,
}
