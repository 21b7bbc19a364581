//! Invite code model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::user::{UserContact, UserSummary};

/// Code allowing exactly one registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteCode {
    pub id: i64,
    pub code: String,
    pub created_by_id: i64,
    pub used_by_id: Option<i64>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl InviteCode {
    pub fn is_used(&self) -> bool {
        self.used_by_id.is_some()
    }
}

/// Invite code with its creator and redeemer for the admin list
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteCodeDetails {
    #[serde(flatten)]
    pub invite: InviteCode,
    pub created_by: UserSummary,
    pub used_by: Option<UserContact>,
}
