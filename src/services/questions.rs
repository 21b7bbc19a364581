//! Discussion questions and their manual ordering

use std::collections::BTreeSet;

use crate::{
    error::{AppError, AppResult},
    models::{
        question::{DiscussionQuestion, QuestionView, UpdateQuestion},
        user::{UserClaims, UserSummary},
    },
    repository::{questions::QuestionsRepository, Repository},
};

/// Accept `requested` only if it is a permutation of `existing`
pub fn check_exact_order(existing: &[i64], requested: &[i64]) -> AppResult<()> {
    let stored: BTreeSet<i64> = existing.iter().copied().collect();
    let supplied: BTreeSet<i64> = requested.iter().copied().collect();

    if supplied.len() != requested.len() {
        return Err(AppError::PartialSet("Question ids must not repeat".to_string()));
    }

    let foreign: Vec<i64> = supplied.difference(&stored).copied().collect();
    if !foreign.is_empty() {
        return Err(AppError::PartialSet(format!(
            "Questions {:?} do not belong to this book",
            foreign
        )));
    }

    let missing: Vec<i64> = stored.difference(&supplied).copied().collect();
    if !missing.is_empty() {
        return Err(AppError::PartialSet(format!(
            "Ordering omits questions {:?}",
            missing
        )));
    }

    Ok(())
}

fn clean_text(text: &str) -> AppResult<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Question text is required".to_string()));
    }
    Ok(text)
}

#[derive(Clone)]
pub struct QuestionsService {
    repository: Repository,
}

impl QuestionsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, book_id: i64) -> AppResult<Vec<QuestionView>> {
        self.repository.books.get_by_id(book_id).await?;
        self.repository.questions.list_for_book(book_id).await
    }

    /// Append a question to the end of the book's list
    pub async fn create(&self, book_id: i64, text: &str, claims: &UserClaims) -> AppResult<QuestionView> {
        claims.require_admin()?;
        let text = clean_text(text)?;
        self.repository.books.get_by_id(book_id).await?;

        let mut tx = self.repository.pool.begin().await?;
        let question = QuestionsRepository::append_tx(&mut tx, book_id, claims.user_id, text).await?;
        tx.commit().await?;

        tracing::info!(question_id = question.id, book_id, "Discussion question added");
        Ok(QuestionView::new(
            question,
            Some(UserSummary {
                id: claims.user_id,
                name: claims.name.clone(),
            }),
        ))
    }

    pub async fn update(
        &self,
        id: i64,
        request: &UpdateQuestion,
        claims: &UserClaims,
    ) -> AppResult<QuestionView> {
        let existing = self.repository.questions.get_by_id(id).await?;
        claims.require_owner_or_admin(existing.user_id)?;

        let text = request.question.as_deref().map(clean_text).transpose()?;
        let updated = self
            .repository
            .questions
            .update(id, text, request.sort_order)
            .await?;
        self.view(updated).await
    }

    pub async fn delete(&self, id: i64, claims: &UserClaims) -> AppResult<()> {
        let existing = self.repository.questions.get_by_id(id).await?;
        claims.require_owner_or_admin(existing.user_id)?;
        self.repository.questions.delete(id).await?;
        tracing::info!(question_id = id, book_id = existing.book_id, "Discussion question deleted");
        Ok(())
    }

    /// Renumber the book's questions to follow `question_ids`
    pub async fn reorder(
        &self,
        book_id: i64,
        question_ids: &[i64],
        claims: &UserClaims,
    ) -> AppResult<Vec<QuestionView>> {
        claims.require_admin()?;
        if question_ids.is_empty() {
            return Err(AppError::Validation("questionIds must not be empty".to_string()));
        }
        self.repository.books.get_by_id(book_id).await?;

        let mut tx = self.repository.pool.begin().await?;
        let existing = QuestionsRepository::ids_for_book_tx(&mut tx, book_id).await?;
        check_exact_order(&existing, question_ids)?;

        for (position, id) in question_ids.iter().enumerate() {
            QuestionsRepository::set_sort_order_tx(&mut tx, *id, position as i64).await?;
        }
        tx.commit().await?;

        tracing::info!(book_id, count = question_ids.len(), "Discussion questions reordered");
        self.repository.questions.list_for_book(book_id).await
    }

    async fn view(&self, question: DiscussionQuestion) -> AppResult<QuestionView> {
        let author = match question.user_id {
            Some(user_id) => self
                .repository
                .users
                .find_by_id(user_id)
                .await?
                .map(|user| UserSummary::from(&user)),
            None => None,
        };
        Ok(QuestionView::new(question, author))
    }
}
