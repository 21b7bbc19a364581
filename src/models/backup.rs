//! Backup document format

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{
    announcement::Announcement, book::Book, invite_code::InviteCode, note::BookNote,
    question::DiscussionQuestion, rating::Rating, setting::SiteSetting, vote::Vote,
};
use crate::error::{AppError, AppResult};

pub const BACKUP_VERSION: u32 = 1;

/// User row including the credential, so restored members can still log in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Every table, one array per entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub ratings: Vec<Rating>,
    #[serde(default)]
    pub votes: Vec<Vote>,
    #[serde(default)]
    pub invite_codes: Vec<InviteCode>,
    #[serde(default)]
    pub discussion_questions: Vec<DiscussionQuestion>,
    #[serde(default)]
    pub announcements: Vec<Announcement>,
    #[serde(default)]
    pub site_settings: Vec<SiteSetting>,
    #[serde(default)]
    pub book_notes: Vec<BookNote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub data: BackupData,
}

impl BackupDocument {
    /// Parse an uploaded document, rejecting unknown versions
    pub fn from_value(value: serde_json::Value) -> AppResult<Self> {
        if value.get("version").is_none() || value.get("data").is_none() {
            return Err(AppError::Validation(
                "Invalid backup file: version and data are required".to_string(),
            ));
        }
        let document: BackupDocument = serde_json::from_value(value)
            .map_err(|e| AppError::Validation(format!("Invalid backup file: {}", e)))?;
        if document.version != BACKUP_VERSION {
            return Err(AppError::Validation(format!(
                "Unsupported backup version {}",
                document.version
            )));
        }
        Ok(document)
    }

    pub fn file_name(&self) -> String {
        format!("bookclub-backup-{}.json", self.exported_at.format("%Y-%m-%d"))
    }
}

/// Number of rows written per entity by a restore
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestoreSummary {
    pub users: usize,
    pub books: usize,
    pub ratings: usize,
    pub votes: usize,
    pub invite_codes: usize,
    pub discussion_questions: usize,
    pub announcements: usize,
    pub site_settings: usize,
    pub book_notes: usize,
}

impl From<&BackupData> for RestoreSummary {
    fn from(data: &BackupData) -> Self {
        Self {
            users: data.users.len(),
            books: data.books.len(),
            ratings: data.ratings.len(),
            votes: data.votes.len(),
            invite_codes: data.invite_codes.len(),
            discussion_questions: data.discussion_questions.len(),
            announcements: data.announcements.len(),
            site_settings: data.site_settings.len(),
            book_notes: data.book_notes.len(),
        }
    }
}
