use bookclub_server::repository::votes::VotesRepository;
use reqwest::Method;
use serde_json::json;

use crate::common::{TestApp, KNOWN_SYNOPSIS, KNOWN_WORK};

#[tokio::test]
async fn suggestion_becomes_current_and_gets_rated() {
    let app = TestApp::spawn().await;
    let alice = app.register_member("Alice").await;
    let bob = app.register_member("Bob").await;
    let carl = app.register_member("Carl").await;

    // Members cannot pick a status for their submissions
    let x = app.add_book(&alice.token, "Book X", Some("CURRENT")).await;
    let y = app.add_book(&carl.token, "Book Y", None).await;
    let (_, book) = app.get(&format!("/books/{}", x), &alice.token).await;
    assert_eq!(book["status"], "SUGGESTION");

    let (status, _) = app.post("/votes", &bob.token, json!({ "bookId": x })).await;
    assert_eq!(status, 200);
    let (status, _) = app.post("/votes", &carl.token, json!({ "bookId": y })).await;
    assert_eq!(status, 200);

    let (status, book) = app
        .patch(&format!("/books/{}", x), &app.admin.token, json!({ "status": "CURRENT" }))
        .await;
    assert_eq!(status, 200, "{book}");
    assert_eq!(book["status"], "CURRENT");

    // The poll resets for every suggestion, not just the promoted one
    assert_eq!(app.repository.votes.count().await.unwrap(), 0);
    let (_, mine) = app.get("/votes/mine", &carl.token).await;
    assert!(mine.is_null());

    let (status, _) = app
        .post("/ratings", &alice.token, json!({ "bookId": x, "rating": 4.5 }))
        .await;
    assert_eq!(status, 200);

    let (_, detail) = app.get(&format!("/books/{}", x), &bob.token).await;
    assert_eq!(detail["averageRating"], 4.5);
    assert_eq!(detail["ratingCount"], 1);
    assert!(detail["userRating"].is_null());
    assert_eq!(detail["ratings"][0]["user"]["name"], "Alice");
}

#[tokio::test]
async fn one_vote_per_member_and_only_for_suggestions() {
    let app = TestApp::spawn().await;
    let member = app.register_member("Dora").await;
    let first = app.add_book(&member.token, "First", None).await;
    let second = app.add_book(&member.token, "Second", None).await;
    let current = app.add_book(&app.admin.token, "Now Reading", Some("CURRENT")).await;

    app.post("/votes", &member.token, json!({ "bookId": first })).await;
    let (status, vote) = app.post("/votes", &member.token, json!({ "bookId": second })).await;
    assert_eq!(status, 200);
    assert_eq!(vote["bookId"], second);
    assert_eq!(app.repository.votes.count().await.unwrap(), 1);

    let (_, mine) = app.get("/votes/mine", &member.token).await;
    assert_eq!(mine["book"]["title"], "Second");

    let (status, body) = app.post("/votes", &member.token, json!({ "bookId": current })).await;
    assert_eq!(status, 422);
    assert_eq!(body["error"], "InvalidState");
    let (_, mine) = app.get("/votes/mine", &member.token).await;
    assert_eq!(mine["book"]["title"], "Second", "rejected vote leaves the old one");

    let (status, _) = app.post("/votes", &member.token, json!({ "bookId": 424242 })).await;
    assert_eq!(status, 404);

    let (status, _) = app.delete("/votes/mine", &member.token).await;
    assert_eq!(status, 204);
    let (_, mine) = app.get("/votes/mine", &member.token).await;
    assert!(mine.is_null());
}

#[tokio::test]
async fn vote_write_refuses_books_that_left_the_poll() {
    let app = TestApp::spawn().await;
    let member = app.register_member("Ezra").await;
    let book = app.add_book(&member.token, "Middlemarch", None).await;

    // The book moves on between the member loading the poll and voting
    let (status, _) = app
        .patch(&format!("/books/{}", book), &app.admin.token, json!({ "status": "CURRENT" }))
        .await;
    assert_eq!(status, 200);

    let mut conn = app.repository.pool.acquire().await.unwrap();
    let vote = VotesRepository::upsert_suggestion_tx(&mut conn, member.id, book)
        .await
        .unwrap();
    assert!(vote.is_none());
    let vote = VotesRepository::upsert_suggestion_tx(&mut conn, member.id, 424242)
        .await
        .unwrap();
    assert!(vote.is_none());
    drop(conn);

    assert_eq!(app.repository.votes.count().await.unwrap(), 0);
}

#[tokio::test]
async fn ratings_upsert_and_average() {
    let app = TestApp::spawn().await;
    let ann = app.register_member("Ann").await;
    let ben = app.register_member("Ben").await;
    let book = app.add_book(&app.admin.token, "Averaged", Some("COMPLETED")).await;
    let unrated = app.add_book(&app.admin.token, "Unrated", Some("COMPLETED")).await;

    app.post("/ratings", &ann.token, json!({ "bookId": book, "rating": 1.0 }))
        .await;
    let (status, rating) = app
        .post("/ratings", &ann.token, json!({ "bookId": book, "rating": 3.0 }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(rating["value"], 3.0);
    app.post("/ratings", &ben.token, json!({ "bookId": book, "rating": 4.0 }))
        .await;

    let (_, books) = app.get("/books?status=COMPLETED", &ann.token).await;
    let books = books.as_array().unwrap();
    assert_eq!(books.len(), 2);
    let averaged = books.iter().find(|b| b["id"] == book).unwrap();
    assert_eq!(averaged["averageRating"], 3.5);
    assert_eq!(averaged["ratingCount"], 2);
    let empty = books.iter().find(|b| b["id"] == unrated).unwrap();
    assert!(empty["averageRating"].is_null());
    assert_eq!(empty["ratingCount"], 0);

    let (_, detail) = app.get(&format!("/books/{}", book), &ann.token).await;
    assert_eq!(detail["userRating"], 3.0);

    for bad in [0.0, 5.5, 3.3] {
        let (status, _) = app
            .post("/ratings", &ann.token, json!({ "bookId": book, "rating": bad }))
            .await;
        assert_eq!(status, 400, "{bad}");
    }

    let (_, history) = app.get("/profile/ratings", &ann.token).await;
    assert_eq!(history[0]["book"]["title"], "Averaged");

    let rating_id = rating["id"].as_i64().unwrap();
    let (status, _) = app.delete(&format!("/ratings/{}", rating_id), &ben.token).await;
    assert_eq!(status, 403);
    let (status, _) = app.delete(&format!("/ratings/{}", rating_id), &ann.token).await;
    assert_eq!(status, 204);
}

#[tokio::test]
async fn book_permissions() {
    let app = TestApp::spawn().await;
    let owner = app.register_member("Olga").await;
    let other = app.register_member("Pete").await;
    let book = app.add_book(&owner.token, "Mine", None).await;

    let (status, body) = app
        .post(
            "/books",
            &owner.token,
            json!({ "title": "Typo", "author": "Someone", "status": "bogus" }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "BadValue");
    assert_eq!(app.repository.books.list(None).await.unwrap().len(), 1);

    let (status, _) = app
        .patch(&format!("/books/{}", book), &owner.token, json!({ "status": "CURRENT" }))
        .await;
    assert_eq!(status, 403);

    let (status, _) = app
        .patch(&format!("/books/{}", book), &app.admin.token, json!({ "status": "READING" }))
        .await;
    assert_eq!(status, 400);

    let (status, _) = app.delete(&format!("/books/{}", book), &other.token).await;
    assert_eq!(status, 403);
    let (status, _) = app.delete(&format!("/books/{}", book), &owner.token).await;
    assert_eq!(status, 204);
    let (status, _) = app.get(&format!("/books/{}", book), &owner.token).await;
    assert_eq!(status, 404);

    let current = app.add_book(&app.admin.token, "Club Pick", Some("CURRENT")).await;
    let (status, _) = app.delete(&format!("/books/{}", current), &app.admin.token).await;
    assert_eq!(status, 204);

    let (status, _) = app
        .post("/books", &owner.token, json!({ "title": " ", "author": "Someone" }))
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn synopsis_falls_back_to_metadata_and_can_be_edited() {
    let app = TestApp::spawn().await;
    let (status, created) = app
        .post(
            "/books",
            &app.admin.token,
            json!({ "title": "The Hobbit", "author": "Tolkien", "openLibraryKey": KNOWN_WORK }),
        )
        .await;
    assert_eq!(status, 201);
    let id = created["id"].as_i64().unwrap();
    assert!(created["synopsis"].is_null());

    let (_, detail) = app.get(&format!("/books/{}", id), &app.admin.token).await;
    assert_eq!(detail["synopsis"], KNOWN_SYNOPSIS);

    let (_, updated) = app
        .patch(&format!("/books/{}", id), &app.admin.token, json!({ "synopsis": "Our summary" }))
        .await;
    assert_eq!(updated["synopsis"], "Our summary");
    assert_eq!(updated["status"], "SUGGESTION", "status untouched");

    let (_, cleared) = app
        .patch(&format!("/books/{}", id), &app.admin.token, json!({ "synopsis": null }))
        .await;
    assert!(cleared["synopsis"].is_null());
}

#[tokio::test]
async fn external_lookups_are_public_and_best_effort() {
    let app = TestApp::spawn().await;

    let (status, results) = app.request(Method::GET, "/books/search?q=h", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(results, json!([]));

    let (_, results) = app
        .request(Method::GET, "/books/search?q=TheHobbit", None, None)
        .await;
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1, "variations merge into one hit");
    assert_eq!(results[0]["openLibraryKey"], KNOWN_WORK);

    let (_, isbns) = app
        .request(Method::GET, "/books/english-isbn?workKey=OL27448W", None, None)
        .await;
    assert_eq!(isbns["isbn"], "0261102214");
    assert_eq!(isbns["isbn13"], "9780261102217");

    let (status, _) = app
        .request(Method::GET, "/books/english-isbn?workKey=not-a-key", None, None)
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn notes_are_private_and_blank_content_removes_them() {
    let app = TestApp::spawn().await;
    let reader = app.register_member("Rae").await;
    let book = app.add_book(&app.admin.token, "Noted", Some("CURRENT")).await;
    let path = format!("/books/{}/note", book);

    let (status, note) = app.get(&path, &reader.token).await;
    assert_eq!(status, 200);
    assert!(note.is_null());

    let (_, note) = app.put(&path, &reader.token, json!({ "content": "<p>Chapter 3!</p>" })).await;
    assert_eq!(note["content"], "<p>Chapter 3!</p>");

    let (_, others) = app.get(&path, &app.admin.token).await;
    assert!(others.is_null());

    let (status, note) = app.put(&path, &reader.token, json!({ "content": "   " })).await;
    assert_eq!(status, 200);
    assert!(note.is_null());
    assert!(app.repository.notes.find(reader.id, book).await.unwrap().is_none());

    let (status, _) = app.get("/books/999/note", &reader.token).await;
    assert_eq!(status, 404);
}
