//! Rating model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{book::BookSummary, user::UserSummary};
use crate::error::{AppError, AppResult};

pub const MIN_RATING: f64 = 0.5;
pub const MAX_RATING: f64 = 5.0;

/// Rating model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub value: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateBook {
    pub book_id: i64,
    /// Half-point value between 0.5 and 5
    pub rating: f64,
}

/// Rating shown on a book page
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingWithUser {
    pub id: i64,
    pub value: f64,
    pub created_at: DateTime<Utc>,
    pub user: UserSummary,
}

/// Rating in a member's history
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingWithBook {
    pub id: i64,
    pub value: f64,
    pub created_at: DateTime<Utc>,
    pub book: BookSummary,
}

/// Entry of the dashboard activity feed
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentRating {
    pub id: i64,
    pub value: f64,
    pub created_at: DateTime<Utc>,
    pub user: UserSummary,
    pub book: BookSummary,
}

/// Accept only half-point steps within the scale
pub fn validate_rating_value(value: f64) -> AppResult<()> {
    let in_range = (MIN_RATING..=MAX_RATING).contains(&value);
    let half_step = (value * 2.0).fract() == 0.0;
    if value.is_finite() && in_range && half_step {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Rating must be between {} and {} in steps of 0.5",
            MIN_RATING, MAX_RATING
        )))
    }
}
