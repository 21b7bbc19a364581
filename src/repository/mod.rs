//! Repository layer for database operations
//!
//! Read paths run against the pool. Functions taking `&mut SqliteConnection`
//! are meant to run inside a transaction opened by a service.

pub mod announcements;
pub mod backup;
pub mod books;
pub mod invite_codes;
pub mod notes;
pub mod questions;
pub mod ratings;
pub mod settings;
pub mod users;
pub mod votes;

use sqlx::{Pool, Sqlite};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Sqlite>,
    pub users: users::UsersRepository,
    pub invite_codes: invite_codes::InviteCodesRepository,
    pub books: books::BooksRepository,
    pub ratings: ratings::RatingsRepository,
    pub votes: votes::VotesRepository,
    pub questions: questions::QuestionsRepository,
    pub notes: notes::NotesRepository,
    pub announcements: announcements::AnnouncementsRepository,
    pub settings: settings::SettingsRepository,
    pub backup: backup::BackupRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            invite_codes: invite_codes::InviteCodesRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            ratings: ratings::RatingsRepository::new(pool.clone()),
            votes: votes::VotesRepository::new(pool.clone()),
            questions: questions::QuestionsRepository::new(pool.clone()),
            notes: notes::NotesRepository::new(pool.clone()),
            announcements: announcements::AnnouncementsRepository::new(pool.clone()),
            settings: settings::SettingsRepository::new(pool.clone()),
            backup: backup::BackupRepository::new(pool.clone()),
            pool,
        }
    }

    /// Cheap connectivity probe used by the readiness endpoint
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// True when the error comes from a UNIQUE constraint
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}
