//! OpenAPI documentation

use axum::{routing::get, Json, Router};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::api::{
    announcements, auth, backup, books, dashboard, health, invite_codes, notes, profile,
    questions, ratings, settings, users, votes,
};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookclub API",
        version = "1.0.0",
        description = "Membership server for a small private book club"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    modifiers(&BearerAuth),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::register,
        auth::me,
        // Profile
        profile::update_email,
        profile::change_password,
        profile::my_ratings,
        // Users
        users::list_users,
        users::delete_user,
        users::reset_password,
        // Invite codes
        invite_codes::list_invite_codes,
        invite_codes::create_invite_code,
        invite_codes::delete_invite_code,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::search_books,
        books::english_isbn,
        // Questions
        questions::list_questions,
        questions::create_question,
        questions::reorder_questions,
        questions::update_question,
        questions::delete_question,
        // Notes
        notes::get_note,
        notes::save_note,
        // Ratings
        ratings::rate_book,
        ratings::delete_rating,
        // Votes
        votes::cast_vote,
        votes::my_vote,
        votes::withdraw_vote,
        // Announcements
        announcements::active_announcement,
        announcements::create_announcement,
        announcements::deactivate_announcement,
        // Settings
        settings::get_settings,
        settings::get_branding,
        settings::get_setting,
        settings::update_setting,
        // Dashboard
        dashboard::get_dashboard,
        // Backup
        backup::export_backup,
        backup::import_backup,
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            health::HealthResponse,
            crate::markup::Segment,
            // Users
            crate::models::user::User,
            crate::models::user::UserSummary,
            crate::models::user::UserContact,
            crate::models::user::LoginRequest,
            crate::models::user::RegisterRequest,
            crate::models::user::AuthResponse,
            crate::models::user::UpdateEmail,
            crate::models::user::ChangePassword,
            crate::models::user::ResetPassword,
            // Invite codes
            crate::models::invite_code::InviteCode,
            crate::models::invite_code::InviteCodeDetails,
            // Books
            crate::models::book::BookStatus,
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::BookListItem,
            crate::models::book::BookDetail,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::BookSearchResult,
            crate::models::book::EditionIsbns,
            // Ratings and votes
            crate::models::rating::Rating,
            crate::models::rating::RateBook,
            crate::models::rating::RatingWithUser,
            crate::models::rating::RatingWithBook,
            crate::models::rating::RecentRating,
            crate::models::vote::Vote,
            crate::models::vote::CastVote,
            crate::models::vote::VoteWithBook,
            // Questions and notes
            crate::models::question::DiscussionQuestion,
            crate::models::question::QuestionView,
            crate::models::question::CreateQuestion,
            crate::models::question::UpdateQuestion,
            crate::models::question::ReorderQuestions,
            crate::models::note::BookNote,
            crate::models::note::SaveNote,
            // Announcements and settings
            crate::models::announcement::Announcement,
            crate::models::announcement::CreateAnnouncement,
            crate::models::setting::SiteSetting,
            crate::models::setting::UpdateSetting,
            crate::models::setting::SettingValue,
            crate::models::setting::Branding,
            // Dashboard
            crate::models::dashboard::Dashboard,
            crate::models::dashboard::CurrentBook,
            crate::models::dashboard::RankedSuggestion,
            crate::models::dashboard::ClubStats,
            // Backup
            crate::models::backup::BackupDocument,
            crate::models::backup::BackupData,
            crate::models::backup::UserRecord,
            crate::models::backup::RestoreSummary,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "profile", description = "Own account"),
        (name = "users", description = "Member management"),
        (name = "invite-codes", description = "Invite code management"),
        (name = "books", description = "Book catalog"),
        (name = "questions", description = "Discussion questions"),
        (name = "notes", description = "Private reading notes"),
        (name = "ratings", description = "Book ratings"),
        (name = "votes", description = "Next-pick poll"),
        (name = "announcements", description = "Meeting announcements"),
        (name = "settings", description = "Site settings"),
        (name = "dashboard", description = "Home page aggregate"),
        (name = "backup", description = "Full export and restore")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}
