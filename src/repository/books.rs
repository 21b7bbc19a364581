//! Books repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookListItem, BookStatus, CreateBook},
        dashboard::RankedSuggestion,
        user::UserSummary,
    },
};

const BOOK_COLUMNS: &str = "id, title, author, isbn, isbn13, cover_url, synopsis, \
                            open_library_key, page_count, publish_year, status, added_by_id, added_at";

/// Book columns plus submitter name and rating aggregate; callers append
/// WHERE and GROUP BY b.id
const AGGREGATE_SELECT: &str = r#"
    SELECT b.id, b.title, b.author, b.isbn, b.isbn13, b.cover_url, b.synopsis,
           b.open_library_key, b.page_count, b.publish_year, b.status,
           b.added_by_id, b.added_at,
           u.name AS added_by_name,
           AVG(r.value) AS average_rating,
           COUNT(r.id) AS rating_count
    FROM books b
    JOIN users u ON u.id = b.added_by_id
    LEFT JOIN ratings r ON r.book_id = b.id
"#;

#[derive(FromRow)]
struct BookAggregateRow {
    #[sqlx(flatten)]
    book: Book,
    added_by_name: String,
    average_rating: Option<f64>,
    rating_count: i64,
}

impl From<BookAggregateRow> for BookListItem {
    fn from(row: BookAggregateRow) -> Self {
        Self {
            added_by: UserSummary {
                id: row.book.added_by_id,
                name: row.added_by_name,
            },
            book: row.book,
            average_rating: row.average_rating,
            rating_count: row.rating_count,
        }
    }
}

#[derive(FromRow)]
struct SuggestionRow {
    id: i64,
    title: String,
    author: String,
    cover_url: Option<String>,
    added_at: DateTime<Utc>,
    added_by_id: i64,
    added_by_name: String,
    vote_count: i64,
}

impl From<SuggestionRow> for RankedSuggestion {
    fn from(row: SuggestionRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            author: row.author,
            cover_url: row.cover_url,
            added_at: row.added_at,
            added_by: UserSummary {
                id: row.added_by_id,
                name: row.added_by_name,
            },
            vote_count: row.vote_count,
        }
    }
}

/// Fields of a new book after status resolution
#[derive(Debug)]
pub struct NewBook<'a> {
    pub request: &'a CreateBook,
    pub status: BookStatus,
    pub added_by_id: i64,
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Books with submitter and rating aggregate, newest first
    pub async fn list(&self, status: Option<BookStatus>) -> AppResult<Vec<BookListItem>> {
        let rows = sqlx::query_as::<_, BookAggregateRow>(&format!(
            "{} WHERE ?1 IS NULL OR b.status = ?1 GROUP BY b.id ORDER BY b.added_at DESC, b.id DESC",
            AGGREGATE_SELECT
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Single book with submitter and rating aggregate
    pub async fn get_with_aggregate(&self, id: i64) -> AppResult<BookListItem> {
        let row = sqlx::query_as::<_, BookAggregateRow>(&format!(
            "{} WHERE b.id = ? GROUP BY b.id",
            AGGREGATE_SELECT
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        Ok(row.into())
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = ?",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    pub async fn create(&self, new: NewBook<'_>) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, isbn, isbn13, cover_url, synopsis,
                               open_library_key, page_count, publish_year, status,
                               added_by_id, added_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(new.request.title.trim())
        .bind(new.request.author.trim())
        .bind(&new.request.isbn)
        .bind(&new.request.isbn13)
        .bind(&new.request.cover_url)
        .bind(&new.request.synopsis)
        .bind(&new.request.open_library_key)
        .bind(new.request.page_count)
        .bind(new.request.publish_year)
        .bind(new.status)
        .bind(new.added_by_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    pub async fn find_by_id_tx(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = ?",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(book)
    }

    pub async fn set_status_tx(
        conn: &mut SqliteConnection,
        id: i64,
        status: BookStatus,
    ) -> AppResult<bool> {
        let result = sqlx::query("UPDATE books SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_synopsis_tx(
        conn: &mut SqliteConnection,
        id: i64,
        synopsis: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query("UPDATE books SET synopsis = ? WHERE id = ?")
            .bind(synopsis)
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Delete a book; ratings, votes, questions and notes go with it
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    /// Suggestions with their vote tally, unordered
    pub async fn suggestions_with_votes(&self) -> AppResult<Vec<RankedSuggestion>> {
        let rows = sqlx::query_as::<_, SuggestionRow>(
            r#"
            SELECT b.id, b.title, b.author, b.cover_url, b.added_at, b.added_by_id,
                   u.name AS added_by_name,
                   COUNT(v.id) AS vote_count
            FROM books b
            JOIN users u ON u.id = b.added_by_id
            LEFT JOIN votes v ON v.book_id = b.id
            WHERE b.status = ?
            GROUP BY b.id
            "#,
        )
        .bind(BookStatus::Suggestion)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// (total books, completed books)
    pub async fn counts(&self) -> AppResult<(i64, i64)> {
        let counts: (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0) FROM books",
        )
        .bind(BookStatus::Completed)
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }
}
