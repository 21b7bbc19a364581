//! Private reading notes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookNote {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Empty content removes the note
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveNote {
    pub content: String,
}
