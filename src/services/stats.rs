//! Dashboard aggregation

use crate::{
    error::AppResult,
    models::{
        book::BookStatus,
        dashboard::{ClubStats, CurrentBook, Dashboard, RankedSuggestion},
    },
    repository::Repository,
};

/// Size of the recent-ratings activity feed
pub const RECENT_RATINGS_LIMIT: i64 = 10;

/// Most votes first, then the most recently added, then the highest id
pub fn rank_suggestions(mut suggestions: Vec<RankedSuggestion>) -> Vec<RankedSuggestion> {
    suggestions.sort_by(|a, b| {
        b.vote_count
            .cmp(&a.vote_count)
            .then_with(|| b.added_at.cmp(&a.added_at))
            .then_with(|| b.id.cmp(&a.id))
    });
    suggestions
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Everything the home page shows, from the viewer's perspective
    pub async fn dashboard(&self, user_id: i64) -> AppResult<Dashboard> {
        let repo = &self.repository;

        let mut current_books = Vec::new();
        for item in repo.books.list(Some(BookStatus::Current)).await? {
            let ratings = repo.ratings.for_book(item.book.id).await?;
            let user_rating = repo.ratings.value_for(user_id, item.book.id).await?;
            current_books.push(CurrentBook {
                book: item.book,
                ratings,
                average_rating: item.average_rating,
                rating_count: item.rating_count,
                user_rating,
            });
        }

        let suggestions = rank_suggestions(repo.books.suggestions_with_votes().await?);
        let user_vote_book_id = repo.votes.for_user(user_id).await?.map(|v| v.book_id);
        let recent_ratings = repo.ratings.recent(RECENT_RATINGS_LIMIT).await?;

        let (total_books, completed_books) = repo.books.counts().await?;
        let stats = ClubStats {
            total_books,
            completed_books,
            total_ratings: repo.ratings.count().await?,
        };

        Ok(Dashboard {
            current_books,
            suggestions,
            user_vote_book_id,
            recent_ratings,
            stats,
        })
    }
}
