//! Users repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::user::User,
};

use super::is_unique_violation;

const USER_COLUMNS: &str = "id, name, email, password_hash, is_admin, created_at";

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Sqlite>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<User> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = ?",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by email, ignoring case
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER(?)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by exact display name (first registered wins on duplicates)
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE name = ? ORDER BY id LIMIT 1",
            USER_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER(?) AND id != COALESCE(?, -1))",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// All members, oldest first
    pub async fn list(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at ASC, id ASC",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn admin_exists(&self) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE is_admin)")
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Create a user outside of any transaction
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> AppResult<User> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_tx(&mut conn, name, email, password_hash, is_admin, Utc::now()).await
    }

    /// Insert a user on an open connection or transaction
    pub async fn insert_tx(
        conn: &mut SqliteConnection,
        name: &str,
        email: &str,
        password_hash: &str,
        is_admin: bool,
        created_at: DateTime<Utc>,
    ) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, is_admin, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(is_admin)
        .bind(created_at)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Email already registered".to_string())
            } else {
                AppError::Database(e)
            }
        })
    }

    pub async fn update_email(&self, id: i64, email: &str) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET email = ? WHERE id = ? RETURNING {}",
            USER_COLUMNS
        ))
        .bind(email)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Email already in use".to_string())
            } else {
                AppError::Database(e)
            }
        })?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    pub async fn update_password(&self, id: i64, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }

    pub async fn exists_tx(conn: &mut SqliteConnection, id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
            .bind(id)
            .fetch_one(conn)
            .await?;
        Ok(exists)
    }
}

/// One step of removing a member. Steps run in [`UserCleanupStep::ORDERED`]
/// order inside a single transaction; each one only touches rows that still
/// reference the member being removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCleanupStep {
    /// Keep authored questions, drop the author reference
    DetachQuestions,
    /// Forget which codes the member redeemed
    ClearRedemptions,
    /// Unused codes the member issued disappear with them
    DeleteUnusedCodes,
    /// Used codes the member issued move to the acting admin
    ReassignUsedCodes,
    /// Submitted books move to the acting admin
    ReassignBooks,
    /// Ratings, votes and notes belong to the member only
    DeletePersonalData,
    DeleteAccount,
}

impl UserCleanupStep {
    pub const ORDERED: [UserCleanupStep; 7] = [
        UserCleanupStep::DetachQuestions,
        UserCleanupStep::ClearRedemptions,
        UserCleanupStep::DeleteUnusedCodes,
        UserCleanupStep::ReassignUsedCodes,
        UserCleanupStep::ReassignBooks,
        UserCleanupStep::DeletePersonalData,
        UserCleanupStep::DeleteAccount,
    ];

    /// Apply this step, returning the number of rows touched
    pub async fn apply(
        self,
        conn: &mut SqliteConnection,
        target_id: i64,
        admin_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let affected = match self {
            UserCleanupStep::DetachQuestions => {
                sqlx::query("UPDATE discussion_questions SET user_id = NULL WHERE user_id = ?")
                    .bind(target_id)
                    .execute(&mut *conn)
                    .await?
                    .rows_affected()
            }
            UserCleanupStep::ClearRedemptions => {
                sqlx::query(
                    "UPDATE invite_codes SET used_by_id = NULL, used_at = NULL WHERE used_by_id = ?",
                )
                .bind(target_id)
                .execute(&mut *conn)
                .await?
                .rows_affected()
            }
            UserCleanupStep::DeleteUnusedCodes => {
                sqlx::query("DELETE FROM invite_codes WHERE created_by_id = ? AND used_by_id IS NULL")
                    .bind(target_id)
                    .execute(&mut *conn)
                    .await?
                    .rows_affected()
            }
            UserCleanupStep::ReassignUsedCodes => {
                sqlx::query(
                    "UPDATE invite_codes SET created_by_id = ? WHERE created_by_id = ? AND used_by_id IS NOT NULL",
                )
                .bind(admin_id)
                .bind(target_id)
                .execute(&mut *conn)
                .await?
                .rows_affected()
            }
            UserCleanupStep::ReassignBooks => {
                sqlx::query("UPDATE books SET added_by_id = ? WHERE added_by_id = ?")
                    .bind(admin_id)
                    .bind(target_id)
                    .execute(&mut *conn)
                    .await?
                    .rows_affected()
            }
            UserCleanupStep::DeletePersonalData => {
                let mut total = 0;
                for table in ["votes", "ratings", "book_notes"] {
                    total += sqlx::query(&format!("DELETE FROM {} WHERE user_id = ?", table))
                        .bind(target_id)
                        .execute(&mut *conn)
                        .await?
                        .rows_affected();
                }
                total
            }
            UserCleanupStep::DeleteAccount => sqlx::query("DELETE FROM users WHERE id = ?")
                .bind(target_id)
                .execute(&mut *conn)
                .await?
                .rows_affected(),
        };

        Ok(affected)
    }
}
