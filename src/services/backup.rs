//! Whole-database export and restore

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::backup::{BackupDocument, RestoreSummary, BACKUP_VERSION},
    repository::{backup::BackupRepository, Repository},
};

#[derive(Clone)]
pub struct BackupService {
    repository: Repository,
}

impl BackupService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn export(&self) -> AppResult<BackupDocument> {
        let data = self.repository.backup.export_all().await?;
        let document = BackupDocument {
            version: BACKUP_VERSION,
            exported_at: Utc::now(),
            data,
        };
        tracing::info!(
            users = document.data.users.len(),
            books = document.data.books.len(),
            "Backup exported"
        );
        Ok(document)
    }

    /// Replace the whole database with the document's contents, or change nothing
    pub async fn import(&self, value: serde_json::Value) -> AppResult<RestoreSummary> {
        let document = BackupDocument::from_value(value)?;

        let mut tx = self.repository.pool.begin().await?;
        BackupRepository::clear_all_tx(&mut tx)
            .await
            .map_err(|e| AppError::Integrity(format!("Restore failed while clearing data: {}", e)))?;
        BackupRepository::insert_all_tx(&mut tx, &document.data)
            .await
            .map_err(|e| AppError::Integrity(format!("Restore failed while inserting data: {}", e)))?;
        tx.commit()
            .await
            .map_err(|e| AppError::Integrity(format!("Restore failed to commit: {}", e)))?;

        let summary = RestoreSummary::from(&document.data);
        tracing::info!(?summary, exported_at = %document.exported_at, "Backup restored");
        Ok(summary)
    }
}
