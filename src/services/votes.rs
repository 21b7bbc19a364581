//! Next-pick poll

use crate::{
    error::{AppError, AppResult},
    models::vote::{Vote, VoteWithBook},
    repository::{books::BooksRepository, votes::VotesRepository, Repository},
};

#[derive(Clone)]
pub struct VotesService {
    repository: Repository,
}

impl VotesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Cast or move the caller's single vote
    pub async fn cast(&self, user_id: i64, book_id: i64) -> AppResult<Vote> {
        let mut tx = self.repository.pool.begin().await?;

        let Some(vote) = VotesRepository::upsert_suggestion_tx(&mut tx, user_id, book_id).await? else {
            return Err(match BooksRepository::find_by_id_tx(&mut tx, book_id).await? {
                Some(book) => AppError::InvalidState(format!(
                    "Only suggestions can receive votes; \"{}\" is {}",
                    book.title, book.status
                )),
                None => AppError::NotFound(format!("Book with id {} not found", book_id)),
            });
        };

        tx.commit().await?;
        tracing::info!(user_id, book_id, "Vote cast");
        Ok(vote)
    }

    pub async fn mine(&self, user_id: i64) -> AppResult<Option<VoteWithBook>> {
        self.repository.votes.for_user(user_id).await
    }

    /// Withdraw the caller's vote; a no-op when there is none
    pub async fn withdraw(&self, user_id: i64) -> AppResult<()> {
        let removed = self.repository.votes.delete_for_user(user_id).await?;
        tracing::debug!(user_id, removed, "Vote withdrawn");
        Ok(())
    }
}
