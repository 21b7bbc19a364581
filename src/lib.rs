//! Bookclub membership server
//!
//! REST JSON API for a small private book club: invite-only registration,
//! book suggestions and ratings, a next-pick poll, discussion questions,
//! meeting announcements and full database backup.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod markup;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Embedded schema migrations
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
