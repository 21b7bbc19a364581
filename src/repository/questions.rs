//! Discussion questions repository

use chrono::Utc;
use sqlx::{FromRow, Pool, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::{
        question::{DiscussionQuestion, QuestionView},
        user::UserSummary,
    },
};

const QUESTION_COLUMNS: &str = "id, book_id, user_id, question, sort_order, created_at, updated_at";

#[derive(FromRow)]
struct QuestionRow {
    #[sqlx(flatten)]
    question: DiscussionQuestion,
    author_name: Option<String>,
}

impl From<QuestionRow> for QuestionView {
    fn from(row: QuestionRow) -> Self {
        let author = match (row.question.user_id, row.author_name) {
            (Some(id), Some(name)) => Some(UserSummary { id, name }),
            _ => None,
        };
        QuestionView::new(row.question, author)
    }
}

#[derive(Clone)]
pub struct QuestionsRepository {
    pool: Pool<Sqlite>,
}

impl QuestionsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Questions of a book in display order
    pub async fn list_for_book(&self, book_id: i64) -> AppResult<Vec<QuestionView>> {
        let rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT q.id, q.book_id, q.user_id, q.question, q.sort_order, q.created_at, q.updated_at,
                   u.name AS author_name
            FROM discussion_questions q
            LEFT JOIN users u ON u.id = q.user_id
            WHERE q.book_id = ?
            ORDER BY q.sort_order ASC, q.id ASC
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<DiscussionQuestion> {
        sqlx::query_as::<_, DiscussionQuestion>(&format!(
            "SELECT {} FROM discussion_questions WHERE id = ?",
            QUESTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Question with id {} not found", id)))
    }

    /// Append a question after the book's current last one
    pub async fn append_tx(
        conn: &mut SqliteConnection,
        book_id: i64,
        user_id: i64,
        question: &str,
    ) -> AppResult<DiscussionQuestion> {
        let last: Option<i64> =
            sqlx::query_scalar("SELECT MAX(sort_order) FROM discussion_questions WHERE book_id = ?")
                .bind(book_id)
                .fetch_one(&mut *conn)
                .await?;
        let sort_order = last.map(|n| n + 1).unwrap_or(0);
        let now = Utc::now();

        let created = sqlx::query_as::<_, DiscussionQuestion>(&format!(
            r#"
            INSERT INTO discussion_questions (book_id, user_id, question, sort_order, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            QUESTION_COLUMNS
        ))
        .bind(book_id)
        .bind(user_id)
        .bind(question)
        .bind(sort_order)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    /// Update text and/or position; `None` keeps the stored value
    pub async fn update(
        &self,
        id: i64,
        question: Option<&str>,
        sort_order: Option<i64>,
    ) -> AppResult<DiscussionQuestion> {
        sqlx::query_as::<_, DiscussionQuestion>(&format!(
            r#"
            UPDATE discussion_questions
            SET question = COALESCE(?, question),
                sort_order = COALESCE(?, sort_order),
                updated_at = ?
            WHERE id = ?
            RETURNING {}
            "#,
            QUESTION_COLUMNS
        ))
        .bind(question)
        .bind(sort_order)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Question with id {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM discussion_questions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn ids_for_book_tx(conn: &mut SqliteConnection, book_id: i64) -> AppResult<Vec<i64>> {
        let ids: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM discussion_questions WHERE book_id = ?")
                .bind(book_id)
                .fetch_all(conn)
                .await?;
        Ok(ids)
    }

    pub async fn set_sort_order_tx(
        conn: &mut SqliteConnection,
        id: i64,
        sort_order: i64,
    ) -> AppResult<()> {
        sqlx::query("UPDATE discussion_questions SET sort_order = ?, updated_at = ? WHERE id = ?")
            .bind(sort_order)
            .bind(Utc::now())
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
