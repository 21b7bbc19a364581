//! Book notes repository

use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::{error::AppResult, models::note::BookNote};

const NOTE_COLUMNS: &str = "id, user_id, book_id, content, created_at, updated_at";

#[derive(Clone)]
pub struct NotesRepository {
    pool: Pool<Sqlite>,
}

impl NotesRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn find(&self, user_id: i64, book_id: i64) -> AppResult<Option<BookNote>> {
        let note = sqlx::query_as::<_, BookNote>(&format!(
            "SELECT {} FROM book_notes WHERE user_id = ? AND book_id = ?",
            NOTE_COLUMNS
        ))
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(note)
    }

    pub async fn upsert(&self, user_id: i64, book_id: i64, content: &str) -> AppResult<BookNote> {
        let now = Utc::now();
        let note = sqlx::query_as::<_, BookNote>(&format!(
            r#"
            INSERT INTO book_notes (user_id, book_id, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id, book_id)
            DO UPDATE SET content = excluded.content, updated_at = excluded.updated_at
            RETURNING {}
            "#,
            NOTE_COLUMNS
        ))
        .bind(user_id)
        .bind(book_id)
        .bind(content)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(note)
    }

    pub async fn delete(&self, user_id: i64, book_id: i64) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM book_notes WHERE user_id = ? AND book_id = ?")
            .bind(user_id)
            .bind(book_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
