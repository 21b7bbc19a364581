//! Whole-database snapshot and restore

use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{
    error::AppResult,
    models::{
        announcement::Announcement,
        backup::{BackupData, UserRecord},
        book::Book,
        invite_code::InviteCode,
        note::BookNote,
        question::DiscussionQuestion,
        rating::Rating,
        setting::SiteSetting,
        vote::Vote,
    },
};

/// Tables with dependents before the tables they reference. Restores insert
/// in the reverse of this order.
pub const TABLES_DEPENDENTS_FIRST: [&str; 9] = [
    "votes",
    "ratings",
    "discussion_questions",
    "book_notes",
    "invite_codes",
    "announcements",
    "books",
    "users",
    "site_settings",
];

#[derive(Clone)]
pub struct BackupRepository {
    pool: Pool<Sqlite>,
}

impl BackupRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Read every table from a single snapshot
    pub async fn export_all(&self) -> AppResult<BackupData> {
        let mut tx = self.pool.begin().await?;
        let data = Self::export_all_tx(&mut tx).await?;
        tx.commit().await?;
        Ok(data)
    }

    /// Read every row of every table on one connection
    pub async fn export_all_tx(conn: &mut SqliteConnection) -> Result<BackupData, sqlx::Error> {
        Ok(BackupData {
            users: sqlx::query_as::<_, UserRecord>(
                "SELECT id, name, email, password_hash, is_admin, created_at FROM users ORDER BY id",
            )
            .fetch_all(&mut *conn)
            .await?,
            books: sqlx::query_as::<_, Book>(
                "SELECT id, title, author, isbn, isbn13, cover_url, synopsis, open_library_key, \
                 page_count, publish_year, status, added_by_id, added_at FROM books ORDER BY id",
            )
            .fetch_all(&mut *conn)
            .await?,
            ratings: sqlx::query_as::<_, Rating>(
                "SELECT id, user_id, book_id, value, created_at, updated_at FROM ratings ORDER BY id",
            )
            .fetch_all(&mut *conn)
            .await?,
            votes: sqlx::query_as::<_, Vote>(
                "SELECT id, user_id, book_id, created_at FROM votes ORDER BY id",
            )
            .fetch_all(&mut *conn)
            .await?,
            invite_codes: sqlx::query_as::<_, InviteCode>(
                "SELECT id, code, created_by_id, used_by_id, used_at, created_at FROM invite_codes ORDER BY id",
            )
            .fetch_all(&mut *conn)
            .await?,
            discussion_questions: sqlx::query_as::<_, DiscussionQuestion>(
                "SELECT id, book_id, user_id, question, sort_order, created_at, updated_at \
                 FROM discussion_questions ORDER BY id",
            )
            .fetch_all(&mut *conn)
            .await?,
            announcements: sqlx::query_as::<_, Announcement>(
                "SELECT id, title, location, date_time, time_zone, notes, is_active, created_at, updated_at \
                 FROM announcements ORDER BY id",
            )
            .fetch_all(&mut *conn)
            .await?,
            site_settings: sqlx::query_as::<_, SiteSetting>(
                "SELECT key, value, updated_at FROM site_settings ORDER BY key",
            )
            .fetch_all(&mut *conn)
            .await?,
            book_notes: sqlx::query_as::<_, BookNote>(
                "SELECT id, user_id, book_id, content, created_at, updated_at FROM book_notes ORDER BY id",
            )
            .fetch_all(&mut *conn)
            .await?,
        })
    }

    /// Empty every table, dependents first
    pub async fn clear_all_tx(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
        for table in TABLES_DEPENDENTS_FIRST {
            sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    /// Insert every record with its original key, parents first
    pub async fn insert_all_tx(
        conn: &mut SqliteConnection,
        data: &BackupData,
    ) -> Result<(), sqlx::Error> {
        insert_settings(&mut *conn, &data.site_settings).await?;
        insert_users(&mut *conn, &data.users).await?;
        insert_books(&mut *conn, &data.books).await?;
        insert_announcements(&mut *conn, &data.announcements).await?;
        insert_invite_codes(&mut *conn, &data.invite_codes).await?;
        insert_notes(&mut *conn, &data.book_notes).await?;
        insert_questions(&mut *conn, &data.discussion_questions).await?;
        insert_ratings(&mut *conn, &data.ratings).await?;
        insert_votes(&mut *conn, &data.votes).await?;
        Ok(())
    }
}

async fn insert_settings(conn: &mut SqliteConnection, rows: &[SiteSetting]) -> Result<(), sqlx::Error> {
    for s in rows {
        sqlx::query("INSERT INTO site_settings (key, value, updated_at) VALUES (?, ?, ?)")
            .bind(&s.key)
            .bind(&s.value)
            .bind(s.updated_at)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn insert_users(conn: &mut SqliteConnection, rows: &[UserRecord]) -> Result<(), sqlx::Error> {
    for u in rows {
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, is_admin, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(u.id)
        .bind(&u.name)
        .bind(&u.email)
        .bind(&u.password_hash)
        .bind(u.is_admin)
        .bind(u.created_at)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_books(conn: &mut SqliteConnection, rows: &[Book]) -> Result<(), sqlx::Error> {
    for b in rows {
        sqlx::query(
            r#"
            INSERT INTO books (id, title, author, isbn, isbn13, cover_url, synopsis, open_library_key,
                               page_count, publish_year, status, added_by_id, added_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(b.id)
        .bind(&b.title)
        .bind(&b.author)
        .bind(&b.isbn)
        .bind(&b.isbn13)
        .bind(&b.cover_url)
        .bind(&b.synopsis)
        .bind(&b.open_library_key)
        .bind(b.page_count)
        .bind(b.publish_year)
        .bind(b.status)
        .bind(b.added_by_id)
        .bind(b.added_at)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_announcements(
    conn: &mut SqliteConnection,
    rows: &[Announcement],
) -> Result<(), sqlx::Error> {
    for a in rows {
        sqlx::query(
            r#"
            INSERT INTO announcements (id, title, location, date_time, time_zone, notes, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(a.id)
        .bind(&a.title)
        .bind(&a.location)
        .bind(a.date_time)
        .bind(&a.time_zone)
        .bind(&a.notes)
        .bind(a.is_active)
        .bind(a.created_at)
        .bind(a.updated_at)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_invite_codes(
    conn: &mut SqliteConnection,
    rows: &[InviteCode],
) -> Result<(), sqlx::Error> {
    for i in rows {
        sqlx::query(
            "INSERT INTO invite_codes (id, code, created_by_id, used_by_id, used_at, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(i.id)
        .bind(&i.code)
        .bind(i.created_by_id)
        .bind(i.used_by_id)
        .bind(i.used_at)
        .bind(i.created_at)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_notes(conn: &mut SqliteConnection, rows: &[BookNote]) -> Result<(), sqlx::Error> {
    for n in rows {
        sqlx::query(
            "INSERT INTO book_notes (id, user_id, book_id, content, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(n.id)
        .bind(n.user_id)
        .bind(n.book_id)
        .bind(&n.content)
        .bind(n.created_at)
        .bind(n.updated_at)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_questions(
    conn: &mut SqliteConnection,
    rows: &[DiscussionQuestion],
) -> Result<(), sqlx::Error> {
    for q in rows {
        sqlx::query(
            r#"
            INSERT INTO discussion_questions (id, book_id, user_id, question, sort_order, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(q.id)
        .bind(q.book_id)
        .bind(q.user_id)
        .bind(&q.question)
        .bind(q.sort_order)
        .bind(q.created_at)
        .bind(q.updated_at)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_ratings(conn: &mut SqliteConnection, rows: &[Rating]) -> Result<(), sqlx::Error> {
    for r in rows {
        sqlx::query(
            "INSERT INTO ratings (id, user_id, book_id, value, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(r.id)
        .bind(r.user_id)
        .bind(r.book_id)
        .bind(r.value)
        .bind(r.created_at)
        .bind(r.updated_at)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_votes(conn: &mut SqliteConnection, rows: &[Vote]) -> Result<(), sqlx::Error> {
    for v in rows {
        sqlx::query("INSERT INTO votes (id, user_id, book_id, created_at) VALUES (?, ?, ?, ?)")
            .bind(v.id)
            .bind(v.user_id)
            .bind(v.book_id)
            .bind(v.created_at)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
