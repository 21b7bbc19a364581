//! Discussion question model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::user::UserSummary;
use crate::markup::{self, Segment};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionQuestion {
    pub id: i64,
    pub book_id: i64,
    /// Cleared when the author's account is removed
    pub user_id: Option<i64>,
    pub question: String,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Question as rendered, with spoiler segments split out
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    #[serde(flatten)]
    pub question: DiscussionQuestion,
    pub author: Option<UserSummary>,
    pub segments: Vec<Segment>,
}

impl QuestionView {
    pub fn new(question: DiscussionQuestion, author: Option<UserSummary>) -> Self {
        let segments = markup::spoiler_segments(&question.question);
        Self {
            question,
            author,
            segments,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateQuestion {
    pub question: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestion {
    pub question: Option<String>,
    pub sort_order: Option<i64>,
}

/// Complete ordering of a book's questions
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderQuestions {
    pub question_ids: Vec<i64>,
}
