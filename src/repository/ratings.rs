//! Ratings repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookStatus, BookSummary},
        rating::{Rating, RatingWithBook, RatingWithUser, RecentRating},
        user::UserSummary,
    },
};

const RATING_COLUMNS: &str = "id, user_id, book_id, value, created_at, updated_at";

#[derive(FromRow)]
struct RatingUserRow {
    id: i64,
    value: f64,
    created_at: DateTime<Utc>,
    user_id: i64,
    user_name: String,
}

impl From<RatingUserRow> for RatingWithUser {
    fn from(row: RatingUserRow) -> Self {
        Self {
            id: row.id,
            value: row.value,
            created_at: row.created_at,
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
            },
        }
    }
}

#[derive(FromRow)]
struct RatingBookRow {
    id: i64,
    value: f64,
    created_at: DateTime<Utc>,
    user_id: i64,
    user_name: String,
    book_id: i64,
    book_title: String,
    book_author: String,
    book_cover_url: Option<String>,
    book_status: BookStatus,
}

impl RatingBookRow {
    fn book(&self) -> BookSummary {
        BookSummary {
            id: self.book_id,
            title: self.book_title.clone(),
            author: self.book_author.clone(),
            cover_url: self.book_cover_url.clone(),
            status: self.book_status,
        }
    }
}

impl From<RatingBookRow> for RatingWithBook {
    fn from(row: RatingBookRow) -> Self {
        Self {
            book: row.book(),
            id: row.id,
            value: row.value,
            created_at: row.created_at,
        }
    }
}

impl From<RatingBookRow> for RecentRating {
    fn from(row: RatingBookRow) -> Self {
        Self {
            book: row.book(),
            id: row.id,
            value: row.value,
            created_at: row.created_at,
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
            },
        }
    }
}

const RATING_BOOK_SELECT: &str = r#"
    SELECT r.id, r.value, r.created_at,
           u.id AS user_id, u.name AS user_name,
           b.id AS book_id, b.title AS book_title, b.author AS book_author,
           b.cover_url AS book_cover_url, b.status AS book_status
    FROM ratings r
    JOIN users u ON u.id = r.user_id
    JOIN books b ON b.id = r.book_id
"#;

#[derive(Clone)]
pub struct RatingsRepository {
    pool: Pool<Sqlite>,
}

impl RatingsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Create or replace the member's rating for a book
    pub async fn upsert(&self, user_id: i64, book_id: i64, value: f64) -> AppResult<Rating> {
        let now = Utc::now();
        let rating = sqlx::query_as::<_, Rating>(&format!(
            r#"
            INSERT INTO ratings (user_id, book_id, value, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id, book_id)
            DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            RETURNING {}
            "#,
            RATING_COLUMNS
        ))
        .bind(user_id)
        .bind(book_id)
        .bind(value)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(rating)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Rating> {
        sqlx::query_as::<_, Rating>(&format!(
            "SELECT {} FROM ratings WHERE id = ?",
            RATING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rating with id {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM ratings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Ratings of one book with their authors, newest first
    pub async fn for_book(&self, book_id: i64) -> AppResult<Vec<RatingWithUser>> {
        let rows = sqlx::query_as::<_, RatingUserRow>(
            r#"
            SELECT r.id, r.value, r.created_at, u.id AS user_id, u.name AS user_name
            FROM ratings r
            JOIN users u ON u.id = r.user_id
            WHERE r.book_id = ?
            ORDER BY r.created_at DESC, r.id DESC
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn value_for(&self, user_id: i64, book_id: i64) -> AppResult<Option<f64>> {
        let value: Option<f64> =
            sqlx::query_scalar("SELECT value FROM ratings WHERE user_id = ? AND book_id = ?")
                .bind(user_id)
                .bind(book_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    /// A member's rating history, newest first
    pub async fn by_user(&self, user_id: i64) -> AppResult<Vec<RatingWithBook>> {
        let rows = sqlx::query_as::<_, RatingBookRow>(&format!(
            "{} WHERE r.user_id = ? ORDER BY r.created_at DESC, r.id DESC",
            RATING_BOOK_SELECT
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Latest ratings across the club
    pub async fn recent(&self, limit: i64) -> AppResult<Vec<RecentRating>> {
        let rows = sqlx::query_as::<_, RatingBookRow>(&format!(
            "{} ORDER BY r.created_at DESC, r.id DESC LIMIT ?",
            RATING_BOOK_SELECT
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ratings")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
