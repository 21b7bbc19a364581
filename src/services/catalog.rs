//! Book catalog service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{
            Book, BookDetail, BookListItem, BookSearchResult, BookStatus, CreateBook, EditionIsbns,
            UpdateBook,
        },
        user::UserClaims,
    },
    repository::{books::BooksRepository, books::NewBook, votes::VotesRepository, Repository},
};

use super::metadata::{self, MetadataProvider};

/// Shortest query sent to the metadata provider
const MIN_QUERY_LEN: usize = 2;

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    metadata: Arc<dyn MetadataProvider>,
}

/// Status a submitter ends up with. An unknown status is rejected for
/// everyone; after that members always suggest and admins choose.
pub fn resolve_new_status(requested: Option<&str>, is_admin: bool) -> AppResult<BookStatus> {
    let status = match requested {
        Some(raw) => raw.trim().parse().map_err(AppError::Validation)?,
        None => BookStatus::Suggestion,
    };
    Ok(if is_admin { status } else { BookStatus::Suggestion })
}

impl CatalogService {
    pub fn new(repository: Repository, metadata: Arc<dyn MetadataProvider>) -> Self {
        Self {
            repository,
            metadata,
        }
    }

    pub async fn list(&self, status: Option<BookStatus>) -> AppResult<Vec<BookListItem>> {
        self.repository.books.list(status).await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Book page with ratings, questions and the viewer's own rating
    pub async fn detail(&self, id: i64, viewer_id: i64) -> AppResult<BookDetail> {
        let item = self.repository.books.get_with_aggregate(id).await?;
        let ratings = self.repository.ratings.for_book(id).await?;
        let questions = self.repository.questions.list_for_book(id).await?;
        let user_rating = self.repository.ratings.value_for(viewer_id, id).await?;

        let mut book = item.book;
        if book.synopsis.as_deref().map_or(true, |s| s.trim().is_empty()) {
            book.synopsis = self.lookup_synopsis(&book).await;
        }

        Ok(BookDetail {
            book,
            added_by: item.added_by,
            ratings,
            questions,
            average_rating: item.average_rating,
            rating_count: item.rating_count,
            user_rating,
        })
    }

    /// Try the work key, then ISBN-13, then ISBN-10. Never fails.
    async fn lookup_synopsis(&self, book: &Book) -> Option<String> {
        let attempts = [
            book.open_library_key.as_deref().map(|k| (true, k)),
            book.isbn13.as_deref().map(|i| (false, i)),
            book.isbn.as_deref().map(|i| (false, i)),
        ];

        for (is_work, key) in attempts.into_iter().flatten() {
            let found = if is_work {
                self.metadata.work_description(key).await
            } else {
                self.metadata.isbn_description(key).await
            };
            match found {
                Ok(Some(text)) if !text.trim().is_empty() => return Some(text),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(book_id = book.id, error = %e, "Synopsis lookup failed");
                }
            }
        }
        None
    }

    pub async fn create(&self, request: CreateBook, claims: &UserClaims) -> AppResult<Book> {
        request.validate()?;
        if request.title.trim().is_empty() || request.author.trim().is_empty() {
            return Err(AppError::Validation("title and author are required".to_string()));
        }
        let status = resolve_new_status(request.status.as_deref(), claims.is_admin)?;

        let book = self
            .repository
            .books
            .create(NewBook {
                request: &request,
                status,
                added_by_id: claims.user_id,
            })
            .await?;

        tracing::info!(book_id = book.id, user_id = claims.user_id, %status, "Book added");
        Ok(book)
    }

    /// Apply a status and/or synopsis change. Moving a book to CURRENT resets
    /// the poll for every suggestion.
    pub async fn update(&self, id: i64, request: UpdateBook, claims: &UserClaims) -> AppResult<Book> {
        let status = match request.status.as_deref() {
            Some(raw) => {
                claims.require_admin()?;
                Some(raw.trim().parse::<BookStatus>().map_err(AppError::Validation)?)
            }
            None => None,
        };

        let mut tx = self.repository.pool.begin().await?;

        if let Some(status) = status {
            if !BooksRepository::set_status_tx(&mut tx, id, status).await? {
                return Err(AppError::NotFound(format!("Book with id {} not found", id)));
            }
            if status == BookStatus::Current {
                let cleared = VotesRepository::clear_all_tx(&mut tx).await?;
                tracing::info!(book_id = id, cleared, "Poll reset");
            }
        }

        if let Some(synopsis) = &request.synopsis {
            let synopsis = synopsis.as_deref().map(str::trim).filter(|s| !s.is_empty());
            BooksRepository::set_synopsis_tx(&mut tx, id, synopsis).await?;
        }

        tx.commit().await?;

        let book = self.repository.books.get_by_id(id).await?;
        tracing::info!(book_id = id, user_id = claims.user_id, status = %book.status, "Book updated");
        Ok(book)
    }

    /// Admins delete anything; members only their own suggestions
    pub async fn delete(&self, id: i64, claims: &UserClaims) -> AppResult<()> {
        let book = self.repository.books.get_by_id(id).await?;
        let own_suggestion =
            book.added_by_id == claims.user_id && book.status == BookStatus::Suggestion;
        if !claims.is_admin && !own_suggestion {
            return Err(AppError::Authorization(
                "Only your own suggestions can be deleted".to_string(),
            ));
        }

        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, user_id = claims.user_id, "Book deleted");
        Ok(())
    }

    /// Search the metadata provider with a few spellings of the query
    pub async fn search(&self, query: &str) -> Vec<BookSearchResult> {
        if query.trim().chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        let mut batches = Vec::new();
        for variation in metadata::search_variations(query) {
            match self.metadata.search(&variation).await {
                Ok(results) => batches.push(results),
                Err(e) => tracing::warn!(query = %variation, error = %e, "Book search failed"),
            }
        }
        metadata::merge_results(batches)
    }

    /// ISBNs of the English edition of a work, if one can be found
    pub async fn english_isbn(&self, work_key: &str) -> AppResult<EditionIsbns> {
        let work_key = metadata::normalize_work_key(work_key)?;
        match self.metadata.editions(&work_key).await {
            Ok(editions) => Ok(metadata::preferred_edition(&editions)),
            Err(e) => {
                tracing::warn!(%work_key, error = %e, "Edition lookup failed");
                Ok(EditionIsbns::default())
            }
        }
    }
}
