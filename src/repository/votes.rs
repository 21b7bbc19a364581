//! Votes repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Sqlite, SqliteConnection};

use crate::{
    error::AppResult,
    models::{
        book::{BookStatus, BookSummary},
        vote::{Vote, VoteWithBook},
    },
};

#[derive(FromRow)]
struct VoteBookRow {
    id: i64,
    book_id: i64,
    created_at: DateTime<Utc>,
    title: String,
    author: String,
    cover_url: Option<String>,
    status: BookStatus,
}

impl From<VoteBookRow> for VoteWithBook {
    fn from(row: VoteBookRow) -> Self {
        Self {
            id: row.id,
            book_id: row.book_id,
            created_at: row.created_at,
            book: BookSummary {
                id: row.book_id,
                title: row.title,
                author: row.author,
                cover_url: row.cover_url,
                status: row.status,
            },
        }
    }
}

#[derive(Clone)]
pub struct VotesRepository {
    pool: Pool<Sqlite>,
}

impl VotesRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Point the member's single vote at a book, refreshing its timestamp.
    /// Writes nothing and returns `None` unless the book is a suggestion.
    pub async fn upsert_suggestion_tx(
        conn: &mut SqliteConnection,
        user_id: i64,
        book_id: i64,
    ) -> AppResult<Option<Vote>> {
        let vote = sqlx::query_as::<_, Vote>(
            r#"
            INSERT INTO votes (user_id, book_id, created_at)
            SELECT ?, id, ? FROM books WHERE id = ? AND status = ?
            ON CONFLICT(user_id)
            DO UPDATE SET book_id = excluded.book_id, created_at = excluded.created_at
            RETURNING id, user_id, book_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(Utc::now())
        .bind(book_id)
        .bind(BookStatus::Suggestion)
        .fetch_optional(conn)
        .await?;

        Ok(vote)
    }

    pub async fn for_user(&self, user_id: i64) -> AppResult<Option<VoteWithBook>> {
        let row = sqlx::query_as::<_, VoteBookRow>(
            r#"
            SELECT v.id, v.book_id, v.created_at, b.title, b.author, b.cover_url, b.status
            FROM votes v
            JOIN books b ON b.id = v.book_id
            WHERE v.user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn delete_for_user(&self, user_id: i64) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM votes WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Reset the poll
    pub async fn clear_all_tx(conn: &mut SqliteConnection) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM votes").execute(conn).await?;
        Ok(result.rows_affected())
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
