//! Data models for the bookclub server

pub mod announcement;
pub mod backup;
pub mod book;
pub mod dashboard;
pub mod invite_code;
pub mod note;
pub mod question;
pub mod rating;
pub mod setting;
pub mod user;
pub mod vote;

// Re-export commonly used types
pub use announcement::Announcement;
pub use book::{Book, BookStatus, BookSummary};
pub use invite_code::InviteCode;
pub use note::BookNote;
pub use question::DiscussionQuestion;
pub use rating::Rating;
pub use setting::SiteSetting;
pub use user::{User, UserSummary};
pub use vote::Vote;
