//! Dashboard view types

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{
    book::Book,
    rating::{RatingWithUser, RecentRating},
    user::UserSummary,
};

/// Book currently being read, with the caller's rating
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentBook {
    #[serde(flatten)]
    pub book: Book,
    pub ratings: Vec<RatingWithUser>,
    pub average_rating: Option<f64>,
    pub rating_count: i64,
    pub user_rating: Option<f64>,
}

/// Suggestion with its vote tally
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankedSuggestion {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub cover_url: Option<String>,
    pub added_at: DateTime<Utc>,
    pub added_by: UserSummary,
    pub vote_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClubStats {
    pub total_books: i64,
    pub completed_books: i64,
    pub total_ratings: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub current_books: Vec<CurrentBook>,
    pub suggestions: Vec<RankedSuggestion>,
    pub user_vote_book_id: Option<i64>,
    pub recent_ratings: Vec<RecentRating>,
    pub stats: ClubStats,
}
