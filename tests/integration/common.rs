//! Shared test harness

use std::{str::FromStr, sync::Arc};

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use bookclub_server::{
    api,
    config::AppConfig,
    error::AppResult,
    models::book::BookSearchResult,
    repository::Repository,
    services::{
        metadata::{Edition, MetadataProvider},
        Services,
    },
    AppState, MIGRATOR,
};

/// Work key the stub provider knows about
pub const KNOWN_WORK: &str = "/works/OL27448W";
pub const KNOWN_SYNOPSIS: &str = "A hobbit is swept into a quest for dragon gold.";

/// Canned metadata so tests never reach the network
pub struct StubMetadata;

#[async_trait]
impl MetadataProvider for StubMetadata {
    async fn search(&self, query: &str) -> AppResult<Vec<BookSearchResult>> {
        if !query.to_lowercase().contains("hobbit") {
            return Ok(Vec::new());
        }
        Ok(vec![BookSearchResult {
            open_library_key: KNOWN_WORK.to_string(),
            title: "The Hobbit".to_string(),
            author: "J.R.R. Tolkien".to_string(),
            isbn: Some("0261102214".to_string()),
            isbn13: None,
            cover_url: None,
            publish_year: Some(1937),
            page_count: Some(310),
        }])
    }

    async fn work_description(&self, work_key: &str) -> AppResult<Option<String>> {
        Ok((work_key == KNOWN_WORK).then(|| KNOWN_SYNOPSIS.to_string()))
    }

    async fn isbn_description(&self, _isbn: &str) -> AppResult<Option<String>> {
        Ok(None)
    }

    async fn editions(&self, work_key: &str) -> AppResult<Vec<Edition>> {
        if work_key != KNOWN_WORK {
            return Ok(Vec::new());
        }
        Ok(vec![
            Edition {
                languages: vec!["/languages/fre".to_string()],
                isbn_10: vec!["2070612880".to_string()],
                isbn_13: vec![],
            },
            Edition {
                languages: vec!["/languages/eng".to_string()],
                isbn_10: vec!["0261102214".to_string()],
                isbn_13: vec!["9780261102217".to_string()],
            },
        ])
    }
}

/// A signed-in club member
pub struct Member {
    pub id: i64,
    pub token: String,
}

pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    pub services: Arc<Services>,
    pub repository: Repository,
    pub admin: Member,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "test-secret".to_string();
        config.admin.email = "admin@club.test".to_string();
        config.admin.password = "admin-password".to_string();
        config.admin.name = "Admin".to_string();
        config.club.time_zone = "Europe/Paris".to_string();

        // One connection keeps the in-memory database alive for the whole test
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .expect("in-memory database");
        MIGRATOR.run(&pool).await.expect("migrations");

        let repository = Repository::new(pool);
        let services = Services::new(repository.clone(), &config, Arc::new(StubMetadata));
        let admin_user = services
            .users
            .ensure_admin(&config.admin)
            .await
            .unwrap()
            .expect("bootstrap admin");
        let admin = Member {
            id: admin_user.id,
            token: services.users.create_token_for_user(&admin_user).unwrap(),
        };

        let services = Arc::new(services);
        let state = AppState {
            config: Arc::new(config),
            services: services.clone(),
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, api::create_router(state)).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            client: Client::new(),
            services,
            repository,
            admin,
        }
    }

    /// Send a request and return the status code with the JSON body (null when empty)
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (u16, Value) {
        let mut request = self
            .client
            .request(method, format!("{}/api/v1{}", self.base_url, path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.expect("request sent");
        let status = response.status().as_u16();
        let text = response.text().await.expect("response body");
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).expect("JSON body")
        };
        (status, body)
    }

    pub async fn get(&self, path: &str, token: &str) -> (u16, Value) {
        self.request(Method::GET, path, Some(token), None).await
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> (u16, Value) {
        self.request(Method::POST, path, Some(token), Some(body)).await
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> (u16, Value) {
        self.request(Method::PUT, path, Some(token), Some(body)).await
    }

    pub async fn patch(&self, path: &str, token: &str, body: Value) -> (u16, Value) {
        self.request(Method::PATCH, path, Some(token), Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: &str) -> (u16, Value) {
        self.request(Method::DELETE, path, Some(token), None).await
    }

    /// Register a new member through a fresh invite code
    pub async fn register_member(&self, name: &str) -> Member {
        let invite = self.services.invite_codes.create(self.admin.id).await.unwrap();
        let (status, body) = self
            .request(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({
                    "name": name,
                    "email": format!("{}@club.test", name.to_lowercase()),
                    "password": "reading-is-fun",
                    "inviteCode": invite.code,
                })),
            )
            .await;
        assert_eq!(status, 201, "{body}");

        Member {
            id: body["user"]["id"].as_i64().unwrap(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Add a book as the given member and return its id
    pub async fn add_book(&self, token: &str, title: &str, status: Option<&str>) -> i64 {
        let (code, body) = self
            .post(
                "/books",
                token,
                json!({ "title": title, "author": "Some Author", "status": status }),
            )
            .await;
        assert_eq!(code, 201, "{body}");
        body["id"].as_i64().unwrap()
    }
}
