use std::str::FromStr;

use bookclub_server::{
    models::book::{BookStatus, CreateBook},
    repository::{backup::BackupRepository, books::NewBook, Repository},
    MIGRATOR,
};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::common::TestApp;

async fn export(app: &TestApp) -> Value {
    let response = app
        .client
        .get(format!("{}/api/v1/backup", app.base_url))
        .bearer_auth(&app.admin.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"bookclub-backup-"));
    assert!(disposition.ends_with(".json\""));

    response.json().await.unwrap()
}

async fn populate(app: &TestApp) {
    let member = app.register_member("Bea").await;
    let book = app.add_book(&member.token, "Persuasion", None).await;
    let current = app.add_book(&app.admin.token, "Emma", Some("CURRENT")).await;
    app.post("/votes", &member.token, json!({ "bookId": book })).await;
    app.post("/ratings", &member.token, json!({ "bookId": current, "rating": 3.5 }))
        .await;
    app.put(
        &format!("/books/{}/note", current),
        &member.token,
        json!({ "content": "Harriet..." }),
    )
    .await;
    app.post(
        &format!("/books/{}/questions", current),
        &app.admin.token,
        json!({ "question": "Is [Frank] sincere?" }),
    )
    .await;
    app.post(
        "/announcements",
        &app.admin.token,
        json!({ "location": "Cafe", "dateTime": "2024-09-01T19:00:00Z" }),
    )
    .await;
    app.put("/settings", &app.admin.token, json!({ "key": "theme", "value": "rose" }))
        .await;
}

#[tokio::test]
async fn export_delete_import_restores_everything() {
    let app = TestApp::spawn().await;
    populate(&app).await;

    let document = export(&app).await;
    assert_eq!(document["version"], 1);
    assert!(document["exportedAt"].is_string());
    for table in [
        "users",
        "books",
        "ratings",
        "votes",
        "inviteCodes",
        "discussionQuestions",
        "announcements",
        "siteSettings",
        "bookNotes",
    ] {
        assert!(!document["data"][table].as_array().unwrap().is_empty(), "{table}");
    }

    let books_before = app.repository.books.list(None).await.unwrap();
    for book in &books_before {
        let (status, _) = app
            .delete(&format!("/books/{}", book.book.id), &app.admin.token)
            .await;
        assert_eq!(status, 204);
    }
    assert!(app.repository.books.list(None).await.unwrap().is_empty());

    let (status, summary) = app.post("/backup", &app.admin.token, document.clone()).await;
    assert_eq!(status, 200, "{summary}");
    assert_eq!(summary["books"], 2);
    assert_eq!(summary["users"], 2);

    let books_after = app.repository.books.list(None).await.unwrap();
    let before: Vec<_> = books_before.iter().map(|b| b.book.clone()).collect();
    let after: Vec<_> = books_after.iter().map(|b| b.book.clone()).collect();
    assert_eq!(before, after);

    let again = export(&app).await;
    assert_eq!(again["data"], document["data"]);

    // Restored credentials still work
    let (status, _) = app
        .request(
            reqwest::Method::POST,
            "/auth/login",
            None,
            Some(json!({ "login": "bea@club.test", "password": "reading-is-fun" })),
        )
        .await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn failed_restore_changes_nothing() {
    let app = TestApp::spawn().await;
    populate(&app).await;
    let before = export(&app).await;

    let mut broken = before.clone();
    broken["data"]["ratings"]
        .as_array_mut()
        .unwrap()
        .push(json!({
            "id": 999,
            "userId": 1,
            "bookId": 424242,
            "value": 4.0,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        }));

    let (status, body) = app.post("/backup", &app.admin.token, broken).await;
    assert_eq!(status, 500, "{body}");
    assert_eq!(body["error"], "IntegrityFailure");

    let after = export(&app).await;
    assert_eq!(after["data"], before["data"]);
}

#[tokio::test]
async fn malformed_documents_are_rejected() {
    let app = TestApp::spawn().await;
    let member = app.register_member("Max").await;

    let (status, _) = app
        .post(
            "/backup",
            &app.admin.token,
            json!({ "version": 2, "exportedAt": "2024-01-01T00:00:00Z", "data": {} }),
        )
        .await;
    assert_eq!(status, 400);

    let (status, _) = app
        .post("/backup", &app.admin.token, json!({ "version": 1 }))
        .await;
    assert_eq!(status, 400);

    let (status, _) = app.get("/backup", &member.token).await;
    assert_eq!(status, 403);

    assert_eq!(app.repository.users.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn restores_exports_larger_than_two_megabytes() {
    let app = TestApp::spawn().await;
    let synopsis = "All happy families are alike. ".repeat(700);
    for i in 0..120 {
        let (status, body) = app
            .post(
                "/books",
                &app.admin.token,
                json!({ "title": format!("Volume {}", i), "author": "Tolstoy", "synopsis": synopsis }),
            )
            .await;
        assert_eq!(status, 201, "{body}");
    }

    let document = export(&app).await;
    let size = serde_json::to_vec(&document).unwrap().len();
    assert!(size > 2 * 1024 * 1024, "export is only {size} bytes");

    let (status, summary) = app.post("/backup", &app.admin.token, document.clone()).await;
    assert_eq!(status, 200, "{summary}");
    assert_eq!(summary["books"], 120);

    let again = export(&app).await;
    assert_eq!(again["data"], document["data"]);
}

#[tokio::test]
async fn export_reads_a_single_snapshot() {
    let path = std::env::temp_dir().join(format!("bookclub-snapshot-{}.db", std::process::id()));
    remove_database(&path);
    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))
        .unwrap()
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(2)
        .connect_with(options)
        .await
        .unwrap();
    MIGRATOR.run(&pool).await.unwrap();

    let repository = Repository::new(pool.clone());
    let reader = repository
        .users
        .create("Reader", "reader@club.test", "hash", false)
        .await
        .unwrap();

    let mut snapshot = pool.begin().await.unwrap();
    let books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
        .fetch_one(&mut *snapshot)
        .await
        .unwrap();
    assert_eq!(books, 0);

    // Written on the other connection while the snapshot is open
    let request = CreateBook {
        title: "Anna Karenina".to_string(),
        author: "Tolstoy".to_string(),
        ..Default::default()
    };
    let book = repository
        .books
        .create(NewBook {
            request: &request,
            status: BookStatus::Suggestion,
            added_by_id: reader.id,
        })
        .await
        .unwrap();
    repository.ratings.upsert(reader.id, book.id, 4.0).await.unwrap();

    let data = BackupRepository::export_all_tx(&mut snapshot).await.unwrap();
    assert_eq!(data.users.len(), 1);
    assert!(data.books.is_empty());
    assert!(data.ratings.is_empty());
    snapshot.commit().await.unwrap();

    let data = repository.backup.export_all().await.unwrap();
    assert_eq!(data.books.len(), 1);
    assert_eq!(data.ratings.len(), 1);

    pool.close().await;
    remove_database(&path);
}

fn remove_database(path: &std::path::Path) {
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }
}
