//! Invite code issuance

use crate::{
    error::{AppError, AppResult},
    models::invite_code::{InviteCode, InviteCodeDetails},
    repository::Repository,
};

/// Attempts before giving up on finding an unused code value
pub const MAX_CODE_ATTEMPTS: usize = 100;

/// Eight uppercase hex digits from four random bytes
pub fn random_code() -> String {
    let bytes: [u8; 4] = rand::random();
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

#[derive(Clone)]
pub struct InviteCodesService {
    repository: Repository,
}

impl InviteCodesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<InviteCodeDetails>> {
        self.repository.invite_codes.list_with_people().await
    }

    pub async fn create(&self, created_by_id: i64) -> AppResult<InviteCode> {
        self.create_with(created_by_id, random_code).await
    }

    /// Issue a code drawn from `next_code`, retrying on collisions
    pub async fn create_with<F>(&self, created_by_id: i64, mut next_code: F) -> AppResult<InviteCode>
    where
        F: FnMut() -> String + Send,
    {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = next_code();
            match self.repository.invite_codes.create(&code, created_by_id).await {
                Ok(invite) => {
                    tracing::info!(invite_id = invite.id, created_by_id, "Invite code created");
                    return Ok(invite);
                }
                Err(AppError::Conflict(_)) => {
                    tracing::debug!(attempt, "Invite code collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::CodeGenerationExhausted(MAX_CODE_ATTEMPTS))
    }

    /// Delete a code that has not been redeemed
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let invite = self.repository.invite_codes.get_by_id(id).await?;
        if invite.is_used() || !self.repository.invite_codes.delete_unused(id).await? {
            return Err(AppError::InvalidState(format!(
                "Invite code {} has been redeemed and cannot be deleted",
                invite.code
            )));
        }
        tracing::info!(invite_id = id, "Invite code deleted");
        Ok(())
    }
}
