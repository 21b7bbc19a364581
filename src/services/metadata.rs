//! Book metadata lookups against Open Library
//!
//! Lookups are best effort: callers log failures and carry on without the
//! metadata.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::{
    config::MetadataConfig,
    error::{AppError, AppResult},
    models::book::{BookSearchResult, EditionIsbns},
};

/// Query variations tried per search
pub const MAX_VARIATIONS: usize = 3;
pub const MAX_RESULTS: usize = 10;

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("valid regex"));
static WORK_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:/works/)?(OL\d+W)$").expect("valid regex"));

/// One edition of a work as listed by the provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Edition {
    /// Language keys such as `/languages/eng`
    pub languages: Vec<String>,
    pub isbn_10: Vec<String>,
    pub isbn_13: Vec<String>,
}

impl Edition {
    fn is_english(&self) -> bool {
        self.languages
            .iter()
            .any(|l| l == "/languages/eng" || l == "/languages/en")
    }

    fn has_isbn(&self) -> bool {
        !self.isbn_10.is_empty() || !self.isbn_13.is_empty()
    }

    fn isbns(&self) -> EditionIsbns {
        EditionIsbns {
            isbn: self.isbn_10.first().cloned(),
            isbn13: self.isbn_13.first().cloned(),
        }
    }
}

/// Read-only book metadata source
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Run one search query
    async fn search(&self, query: &str) -> AppResult<Vec<BookSearchResult>>;

    /// Description of a work, by work key
    async fn work_description(&self, work_key: &str) -> AppResult<Option<String>>;

    /// Description of the work an ISBN belongs to
    async fn isbn_description(&self, isbn: &str) -> AppResult<Option<String>>;

    async fn editions(&self, work_key: &str) -> AppResult<Vec<Edition>>;
}

/// Provider used when lookups are switched off
pub struct DisabledMetadata;

#[async_trait]
impl MetadataProvider for DisabledMetadata {
    async fn search(&self, _query: &str) -> AppResult<Vec<BookSearchResult>> {
        Ok(Vec::new())
    }

    async fn work_description(&self, _work_key: &str) -> AppResult<Option<String>> {
        Ok(None)
    }

    async fn isbn_description(&self, _isbn: &str) -> AppResult<Option<String>> {
        Ok(None)
    }

    async fn editions(&self, _work_key: &str) -> AppResult<Vec<Edition>> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchDoc {
    key: Option<String>,
    title: Option<String>,
    #[serde(default)]
    author_name: Vec<String>,
    #[serde(default)]
    isbn: Vec<String>,
    cover_i: Option<i64>,
    first_publish_year: Option<i64>,
    number_of_pages_median: Option<i64>,
}

/// Open Library returns descriptions either as a string or as `{type, value}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Description {
    Text(String),
    Typed { value: String },
}

impl Description {
    fn into_text(self) -> String {
        match self {
            Description::Text(text) | Description::Typed { value: text } => text,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WorkResponse {
    description: Option<Description>,
}

#[derive(Debug, Deserialize)]
struct KeyRef {
    key: String,
}

#[derive(Debug, Deserialize)]
struct IsbnResponse {
    description: Option<Description>,
    #[serde(default)]
    works: Vec<KeyRef>,
}

#[derive(Debug, Deserialize)]
struct EditionsResponse {
    #[serde(default)]
    entries: Vec<EditionEntry>,
}

#[derive(Debug, Deserialize)]
struct EditionEntry {
    #[serde(default)]
    languages: Vec<KeyRef>,
    #[serde(default)]
    isbn_10: Vec<String>,
    #[serde(default)]
    isbn_13: Vec<String>,
}

/// HTTP client for the Open Library JSON API
#[derive(Clone)]
pub struct OpenLibraryClient {
    http: reqwest::Client,
    base_url: String,
    covers_url: String,
}

impl OpenLibraryClient {
    pub fn new(config: &MetadataConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("bookclub-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            covers_url: config.covers_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("GET {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "GET {} returned {}",
                url,
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::ExternalService(format!("Invalid response from {}: {}", url, e)))
    }

    fn to_result(&self, doc: SearchDoc) -> Option<BookSearchResult> {
        let key = doc.key?;
        let title = doc.title?;
        let isbn = doc.isbn.iter().find(|i| i.len() == 10).cloned();
        let isbn13 = doc.isbn.iter().find(|i| i.len() == 13).cloned();
        let cover_url = match (doc.cover_i, &isbn13) {
            (Some(id), _) => Some(format!("{}/b/id/{}-M.jpg", self.covers_url, id)),
            (None, Some(isbn13)) => Some(format!("{}/b/isbn/{}-M.jpg", self.covers_url, isbn13)),
            (None, None) => None,
        };

        Some(BookSearchResult {
            open_library_key: key,
            title,
            author: doc
                .author_name
                .into_iter()
                .next()
                .unwrap_or_else(|| "Unknown Author".to_string()),
            isbn,
            isbn13,
            cover_url,
            publish_year: doc.first_publish_year,
            page_count: doc.number_of_pages_median,
        })
    }
}

#[async_trait]
impl MetadataProvider for OpenLibraryClient {
    async fn search(&self, query: &str) -> AppResult<Vec<BookSearchResult>> {
        let limit = MAX_RESULTS.to_string();
        let response: SearchResponse = self
            .get_json(
                "/search.json",
                &[
                    ("q", query),
                    ("limit", limit.as_str()),
                    (
                        "fields",
                        "key,title,author_name,isbn,cover_i,first_publish_year,number_of_pages_median",
                    ),
                ],
            )
            .await?;

        Ok(response
            .docs
            .into_iter()
            .filter_map(|doc| self.to_result(doc))
            .collect())
    }

    async fn work_description(&self, work_key: &str) -> AppResult<Option<String>> {
        let key = normalize_work_key(work_key)?;
        let work: WorkResponse = self.get_json(&format!("{}.json", key), &[]).await?;
        Ok(work.description.map(Description::into_text))
    }

    async fn isbn_description(&self, isbn: &str) -> AppResult<Option<String>> {
        let isbn: String = isbn.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        if isbn.is_empty() {
            return Ok(None);
        }
        let edition: IsbnResponse = self.get_json(&format!("/isbn/{}.json", isbn), &[]).await?;
        if let Some(description) = edition.description {
            return Ok(Some(description.into_text()));
        }
        match edition.works.first() {
            Some(work) => self.work_description(&work.key).await,
            None => Ok(None),
        }
    }

    async fn editions(&self, work_key: &str) -> AppResult<Vec<Edition>> {
        let key = normalize_work_key(work_key)?;
        let response: EditionsResponse = self
            .get_json(&format!("{}/editions.json", key), &[("limit", "50")])
            .await?;

        Ok(response
            .entries
            .into_iter()
            .map(|e| Edition {
                languages: e.languages.into_iter().map(|l| l.key).collect(),
                isbn_10: e.isbn_10,
                isbn_13: e.isbn_13,
            })
            .collect())
    }
}

/// Accept `OL123W` or `/works/OL123W`, returning the path form
pub fn normalize_work_key(work_key: &str) -> AppResult<String> {
    WORK_KEY
        .captures(work_key.trim())
        .and_then(|caps| caps.get(1))
        .map(|id| format!("/works/{}", id.as_str()))
        .ok_or_else(|| AppError::Validation(format!("Invalid work key '{}'", work_key)))
}

/// Alternative spellings of a search query, original first
pub fn search_variations(query: &str) -> Vec<String> {
    let original = query.trim().to_string();
    let candidates = [
        original.clone(),
        CAMEL_BOUNDARY.replace_all(&original, "$1 $2").into_owned(),
        original.split_whitespace().collect::<String>(),
    ];

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| !c.is_empty() && seen.insert(c.to_lowercase()))
        .take(MAX_VARIATIONS)
        .collect()
}

/// Concatenate result lists, keeping the first hit per work key
pub fn merge_results(batches: Vec<Vec<BookSearchResult>>) -> Vec<BookSearchResult> {
    let mut seen = HashSet::new();
    batches
        .into_iter()
        .flatten()
        .filter(|r| seen.insert(r.open_library_key.clone()))
        .take(MAX_RESULTS)
        .collect()
}

/// First English edition, else the first edition carrying any ISBN
pub fn preferred_edition(editions: &[Edition]) -> EditionIsbns {
    editions
        .iter()
        .find(|e| e.is_english() && e.has_isbn())
        .or_else(|| editions.iter().find(|e| e.has_isbn()))
        .map(Edition::isbns)
        .unwrap_or_default()
}
