//! API handlers for the bookclub REST endpoints

pub mod announcements;
pub mod auth;
pub mod backup;
pub mod books;
pub mod dashboard;
pub mod health;
pub mod invite_codes;
pub mod notes;
pub mod openapi;
pub mod profile;
pub mod questions;
pub mod ratings;
pub mod settings;
pub mod users;
pub mod votes;

use axum::{
    async_trait,
    extract::{DefaultBodyLimit, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
    routing::{delete, get, patch, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Restores arrive as one document, however large the club has grown
    let backup_limit = state.config.server.backup_limit_mb * 1024 * 1024;

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/me", get(auth::me))
        // Own profile
        .route("/profile/email", put(profile::update_email))
        .route("/profile/password", put(profile::change_password))
        .route("/profile/ratings", get(profile::my_ratings))
        // Members
        .route("/users", get(users::list_users))
        .route("/users/:id", delete(users::delete_user))
        .route("/users/:id/password", put(users::reset_password))
        // Invite codes
        .route(
            "/invite-codes",
            get(invite_codes::list_invite_codes).post(invite_codes::create_invite_code),
        )
        .route("/invite-codes/:id", delete(invite_codes::delete_invite_code))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/search", get(books::search_books))
        .route("/books/english-isbn", get(books::english_isbn))
        .route(
            "/books/:id",
            get(books::get_book)
                .patch(books::update_book)
                .delete(books::delete_book),
        )
        // Discussion questions
        .route(
            "/books/:id/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route("/books/:id/questions/order", put(questions::reorder_questions))
        .route(
            "/questions/:id",
            patch(questions::update_question).delete(questions::delete_question),
        )
        // Notes
        .route("/books/:id/note", get(notes::get_note).put(notes::save_note))
        // Ratings
        .route("/ratings", post(ratings::rate_book))
        .route("/ratings/:id", delete(ratings::delete_rating))
        // Votes
        .route("/votes", post(votes::cast_vote))
        .route("/votes/mine", get(votes::my_vote).delete(votes::withdraw_vote))
        // Announcements
        .route("/announcements", post(announcements::create_announcement))
        .route(
            "/announcements/active",
            get(announcements::active_announcement).delete(announcements::deactivate_announcement),
        )
        // Settings
        .route("/settings", get(settings::get_settings).put(settings::update_setting))
        .route("/settings/branding", get(settings::get_branding))
        .route("/settings/:key", get(settings::get_setting))
        // Dashboard
        .route("/dashboard", get(dashboard::get_dashboard))
        // Backup
        .route(
            "/backup",
            get(backup::export_backup)
                .post(backup::import_backup)
                .layer(DefaultBodyLimit::max(backup_limit)),
        )
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CompressionLayer::new()),
        )
}
