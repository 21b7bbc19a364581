//! Meeting announcements; at most one is active at a time

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::announcement::{Announcement, CreateAnnouncement, DEFAULT_TITLE},
    repository::{
        announcements::{AnnouncementsRepository, NewAnnouncement},
        Repository,
    },
};

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct AnnouncementsService {
    repository: Repository,
    default_time_zone: String,
}

impl AnnouncementsService {
    pub fn new(repository: Repository, default_time_zone: String) -> Self {
        Self {
            repository,
            default_time_zone,
        }
    }

    pub async fn active(&self) -> AppResult<Option<Announcement>> {
        self.repository.announcements.find_active().await
    }

    /// Replace the active announcement
    pub async fn create(&self, request: &CreateAnnouncement) -> AppResult<Announcement> {
        request.validate()?;
        let location = request.location.trim();
        if location.is_empty() {
            return Err(AppError::Validation("location is required".to_string()));
        }

        let new = NewAnnouncement {
            title: non_blank(request.title.as_deref()).unwrap_or(DEFAULT_TITLE),
            location,
            date_time: request.date_time,
            time_zone: non_blank(request.time_zone.as_deref()).unwrap_or(&self.default_time_zone),
            notes: non_blank(request.notes.as_deref()),
        };

        let mut tx = self.repository.pool.begin().await?;
        let replaced = AnnouncementsRepository::deactivate_all_tx(&mut tx).await?;
        let announcement = AnnouncementsRepository::insert_tx(&mut tx, new).await?;
        tx.commit().await?;

        tracing::info!(announcement_id = announcement.id, replaced, "Announcement published");
        Ok(announcement)
    }

    /// Hide the current announcement without deleting it
    pub async fn deactivate(&self) -> AppResult<()> {
        let mut tx = self.repository.pool.begin().await?;
        let count = AnnouncementsRepository::deactivate_all_tx(&mut tx).await?;
        tx.commit().await?;
        tracing::info!(count, "Announcements deactivated");
        Ok(())
    }
}
