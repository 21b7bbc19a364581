//! Invite codes repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Sqlite, SqliteConnection};

use super::is_unique_violation;
use crate::{
    error::{AppError, AppResult},
    models::{
        invite_code::{InviteCode, InviteCodeDetails},
        user::{UserContact, UserSummary},
    },
};

const CODE_COLUMNS: &str = "id, code, created_by_id, used_by_id, used_at, created_at";

#[derive(FromRow)]
struct InviteCodeRow {
    #[sqlx(flatten)]
    invite: InviteCode,
    creator_name: String,
    redeemer_name: Option<String>,
    redeemer_email: Option<String>,
}

impl From<InviteCodeRow> for InviteCodeDetails {
    fn from(row: InviteCodeRow) -> Self {
        let created_by = UserSummary {
            id: row.invite.created_by_id,
            name: row.creator_name,
        };
        let used_by = match (row.invite.used_by_id, row.redeemer_name, row.redeemer_email) {
            (Some(id), Some(name), Some(email)) => Some(UserContact { id, name, email }),
            _ => None,
        };
        Self {
            invite: row.invite,
            created_by,
            used_by,
        }
    }
}

#[derive(Clone)]
pub struct InviteCodesRepository {
    pool: Pool<Sqlite>,
}

impl InviteCodesRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// All codes with creator and redeemer, newest first
    pub async fn list_with_people(&self) -> AppResult<Vec<InviteCodeDetails>> {
        let rows = sqlx::query_as::<_, InviteCodeRow>(
            r#"
            SELECT i.id, i.code, i.created_by_id, i.used_by_id, i.used_at, i.created_at,
                   c.name AS creator_name,
                   r.name AS redeemer_name,
                   r.email AS redeemer_email
            FROM invite_codes i
            JOIN users c ON c.id = i.created_by_id
            LEFT JOIN users r ON r.id = i.used_by_id
            ORDER BY i.created_at DESC, i.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<InviteCode> {
        sqlx::query_as::<_, InviteCode>(&format!(
            "SELECT {} FROM invite_codes WHERE id = ?",
            CODE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Invite code with id {} not found", id)))
    }

    /// Insert a code; a taken code value is reported as `Conflict`
    pub async fn create(&self, code: &str, created_by_id: i64) -> AppResult<InviteCode> {
        sqlx::query_as::<_, InviteCode>(&format!(
            "INSERT INTO invite_codes (code, created_by_id, created_at) VALUES (?, ?, ?) RETURNING {}",
            CODE_COLUMNS
        ))
        .bind(code)
        .bind(created_by_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("Invite code {} already exists", code))
            } else {
                AppError::Database(e)
            }
        })
    }

    /// Insert unless the code is already taken; returns whether a row was added
    pub async fn create_if_absent(&self, code: &str, created_by_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO invite_codes (code, created_by_id, created_at) VALUES (?, ?, ?) ON CONFLICT(code) DO NOTHING",
        )
        .bind(code)
        .bind(created_by_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a code that was never redeemed; returns whether a row was removed
    pub async fn delete_unused(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM invite_codes WHERE id = ? AND used_by_id IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_code_tx(
        conn: &mut SqliteConnection,
        code: &str,
    ) -> AppResult<Option<InviteCode>> {
        let invite = sqlx::query_as::<_, InviteCode>(&format!(
            "SELECT {} FROM invite_codes WHERE code = ?",
            CODE_COLUMNS
        ))
        .bind(code)
        .fetch_optional(conn)
        .await?;

        Ok(invite)
    }

    /// Mark a code as redeemed. Only succeeds while the code is unused.
    pub async fn redeem_tx(
        conn: &mut SqliteConnection,
        id: i64,
        user_id: i64,
        used_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE invite_codes SET used_by_id = ?, used_at = ? WHERE id = ? AND used_by_id IS NULL",
        )
        .bind(user_id)
        .bind(used_at)
        .bind(id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
