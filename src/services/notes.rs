//! Private per-book notes

use crate::{error::AppResult, models::note::BookNote, repository::Repository};

#[derive(Clone)]
pub struct NotesService {
    repository: Repository,
}

impl NotesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get(&self, user_id: i64, book_id: i64) -> AppResult<Option<BookNote>> {
        self.repository.books.get_by_id(book_id).await?;
        self.repository.notes.find(user_id, book_id).await
    }

    /// Store the note, or remove it when the content is blank
    pub async fn save(&self, user_id: i64, book_id: i64, content: &str) -> AppResult<Option<BookNote>> {
        self.repository.books.get_by_id(book_id).await?;

        let content = content.trim();
        if content.is_empty() {
            self.repository.notes.delete(user_id, book_id).await?;
            return Ok(None);
        }

        let note = self.repository.notes.upsert(user_id, book_id, content).await?;
        Ok(Some(note))
    }
}
