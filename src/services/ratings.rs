//! Book ratings

use crate::{
    error::AppResult,
    models::{
        rating::{validate_rating_value, RateBook, Rating, RatingWithBook},
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct RatingsService {
    repository: Repository,
}

impl RatingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create or replace the caller's rating of a book
    pub async fn rate(&self, user_id: i64, request: &RateBook) -> AppResult<Rating> {
        validate_rating_value(request.rating)?;
        self.repository.books.get_by_id(request.book_id).await?;

        let rating = self
            .repository
            .ratings
            .upsert(user_id, request.book_id, request.rating)
            .await?;
        tracing::info!(user_id, book_id = request.book_id, value = rating.value, "Book rated");
        Ok(rating)
    }

    pub async fn delete(&self, id: i64, claims: &UserClaims) -> AppResult<()> {
        let rating = self.repository.ratings.get_by_id(id).await?;
        claims.require_owner_or_admin(Some(rating.user_id))?;
        self.repository.ratings.delete(id).await
    }

    /// The caller's rating history, newest first
    pub async fn for_user(&self, user_id: i64) -> AppResult<Vec<RatingWithBook>> {
        self.repository.ratings.by_user(user_id).await
    }
}
