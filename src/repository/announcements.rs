//! Announcements repository

use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{error::AppResult, models::announcement::Announcement};

const ANNOUNCEMENT_COLUMNS: &str =
    "id, title, location, date_time, time_zone, notes, is_active, created_at, updated_at";

/// Resolved values for a new announcement
#[derive(Debug)]
pub struct NewAnnouncement<'a> {
    pub title: &'a str,
    pub location: &'a str,
    pub date_time: DateTime<Utc>,
    pub time_zone: &'a str,
    pub notes: Option<&'a str>,
}

#[derive(Clone)]
pub struct AnnouncementsRepository {
    pool: Pool<Sqlite>,
}

impl AnnouncementsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Most recent active announcement
    pub async fn find_active(&self) -> AppResult<Option<Announcement>> {
        let announcement = sqlx::query_as::<_, Announcement>(&format!(
            "SELECT {} FROM announcements WHERE is_active ORDER BY created_at DESC, id DESC LIMIT 1",
            ANNOUNCEMENT_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(announcement)
    }

    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM announcements WHERE is_active")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn deactivate_all_tx(conn: &mut SqliteConnection) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE announcements SET is_active = FALSE, updated_at = ? WHERE is_active",
        )
        .bind(Utc::now())
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn insert_tx(
        conn: &mut SqliteConnection,
        new: NewAnnouncement<'_>,
    ) -> AppResult<Announcement> {
        let now = Utc::now();
        let announcement = sqlx::query_as::<_, Announcement>(&format!(
            r#"
            INSERT INTO announcements (title, location, date_time, time_zone, notes, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, TRUE, ?, ?)
            RETURNING {}
            "#,
            ANNOUNCEMENT_COLUMNS
        ))
        .bind(new.title)
        .bind(new.location)
        .bind(new.date_time)
        .bind(new.time_zone)
        .bind(new.notes)
        .bind(now)
        .bind(now)
        .fetch_one(conn)
        .await?;

        Ok(announcement)
    }
}
