//! API integration tests
//!
//! Each test boots the full router on an ephemeral port against a fresh
//! in-memory database and talks to it over HTTP.

mod common;

mod auth;
mod backup;
mod books;
mod membership;
mod questions;
