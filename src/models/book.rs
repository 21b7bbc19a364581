//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    question::QuestionView,
    rating::RatingWithUser,
    user::UserSummary,
};

/// Reading lifecycle of a book
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookStatus {
    Suggestion,
    Current,
    Completed,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Suggestion => "SUGGESTION",
            BookStatus::Current => "CURRENT",
            BookStatus::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUGGESTION" => Ok(BookStatus::Suggestion),
            "CURRENT" => Ok(BookStatus::Current),
            "COMPLETED" => Ok(BookStatus::Completed),
            _ => Err(format!(
                "Invalid status '{}': expected SUGGESTION, CURRENT or COMPLETED",
                s
            )),
        }
    }
}

/// Book model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub isbn13: Option<String>,
    pub cover_url: Option<String>,
    pub synopsis: Option<String>,
    pub open_library_key: Option<String>,
    pub page_count: Option<i64>,
    pub publish_year: Option<i64>,
    pub status: BookStatus,
    pub added_by_id: i64,
    pub added_at: DateTime<Utc>,
}

/// Short book reference embedded in ratings, votes and the activity feed
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub cover_url: Option<String>,
    pub status: BookStatus,
}

/// Book row with its rating aggregate
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookListItem {
    #[serde(flatten)]
    pub book: Book,
    pub added_by: UserSummary,
    /// Mean of all ratings, null when unrated
    pub average_rating: Option<f64>,
    pub rating_count: i64,
}

/// Full book page
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: Book,
    pub added_by: UserSummary,
    pub ratings: Vec<RatingWithUser>,
    pub questions: Vec<QuestionView>,
    pub average_rating: Option<f64>,
    pub rating_count: i64,
    /// The caller's own rating
    pub user_rating: Option<f64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookQuery {
    /// Filter by lifecycle status
    pub status: Option<BookStatus>,
}

/// Create book request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[validate(length(min = 1, message = "is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "is required"))]
    pub author: String,
    pub isbn: Option<String>,
    pub isbn13: Option<String>,
    pub cover_url: Option<String>,
    pub synopsis: Option<String>,
    pub open_library_key: Option<String>,
    #[validate(range(min = 1, message = "must be positive"))]
    pub page_count: Option<i64>,
    pub publish_year: Option<i64>,
    /// Must be a known status; non-admin submitters always get SUGGESTION
    pub status: Option<String>,
}

/// Partial book update
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    pub status: Option<String>,
    /// Absent leaves the synopsis alone, `null` clears it
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub synopsis: Option<Option<String>>,
}

/// Book found through the metadata provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookSearchResult {
    pub open_library_key: String,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub isbn13: Option<String>,
    pub cover_url: Option<String>,
    pub publish_year: Option<i64>,
    pub page_count: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct EditionQuery {
    /// Work key such as `/works/OL45883W`
    pub work_key: String,
}

/// ISBNs of the preferred edition of a work
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditionIsbns {
    pub isbn: Option<String>,
    pub isbn13: Option<String>,
}
