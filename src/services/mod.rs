//! Business logic services

pub mod announcements;
pub mod backup;
pub mod catalog;
pub mod invite_codes;
pub mod metadata;
pub mod notes;
pub mod questions;
pub mod ratings;
pub mod settings;
pub mod stats;
pub mod users;
pub mod votes;

use std::sync::Arc;

use crate::{config::AppConfig, repository::Repository};

use self::metadata::MetadataProvider;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub invite_codes: invite_codes::InviteCodesService,
    pub catalog: catalog::CatalogService,
    pub ratings: ratings::RatingsService,
    pub votes: votes::VotesService,
    pub questions: questions::QuestionsService,
    pub notes: notes::NotesService,
    pub announcements: announcements::AnnouncementsService,
    pub settings: settings::SettingsService,
    pub stats: stats::StatsService,
    pub backup: backup::BackupService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        config: &AppConfig,
        metadata: Arc<dyn MetadataProvider>,
    ) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), config.auth.clone()),
            invite_codes: invite_codes::InviteCodesService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone(), metadata),
            ratings: ratings::RatingsService::new(repository.clone()),
            votes: votes::VotesService::new(repository.clone()),
            questions: questions::QuestionsService::new(repository.clone()),
            notes: notes::NotesService::new(repository.clone()),
            announcements: announcements::AnnouncementsService::new(
                repository.clone(),
                config.club.time_zone.clone(),
            ),
            settings: settings::SettingsService::new(repository.clone()),
            stats: stats::StatsService::new(repository.clone()),
            backup: backup::BackupService::new(repository.clone()),
            repository,
        }
    }

    /// Database connectivity for the readiness probe
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        self.repository.ping().await
    }
}
