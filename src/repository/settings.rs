//! Site settings repository

use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::{error::AppResult, models::setting::SiteSetting};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: Pool<Sqlite>,
}

impl SettingsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn all(&self) -> AppResult<Vec<SiteSetting>> {
        let settings = sqlx::query_as::<_, SiteSetting>(
            "SELECT key, value, updated_at FROM site_settings ORDER BY key",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(settings)
    }

    pub async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM site_settings WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    pub async fn upsert(&self, key: &str, value: &str) -> AppResult<SiteSetting> {
        let setting = sqlx::query_as::<_, SiteSetting>(
            r#"
            INSERT INTO site_settings (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            RETURNING key, value, updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(setting)
    }
}
