use bookclub_server::{
    error::AppError,
    repository::questions::QuestionsRepository,
    services::invite_codes::MAX_CODE_ATTEMPTS,
};
use reqwest::Method;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn admin_issues_and_lists_invite_codes() {
    let app = TestApp::spawn().await;

    let (status, invite) = app.post("/invite-codes", &app.admin.token, json!({})).await;
    assert_eq!(status, 201, "{invite}");
    let code = invite["code"].as_str().unwrap();
    assert_eq!(code.len(), 8);
    assert!(code.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));

    let (status, list) = app.get("/invite-codes", &app.admin.token).await;
    assert_eq!(status, 200);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2, "bootstrap code plus the new one");
    assert_eq!(list[0]["code"], code, "newest first");
    assert_eq!(list[0]["createdBy"]["name"], "Admin");
    assert!(list[0]["usedBy"].is_null());
}

#[tokio::test]
async fn only_unused_codes_can_be_deleted() {
    let app = TestApp::spawn().await;
    let member = app.register_member("Ivy").await;

    let codes = app.repository.invite_codes.list_with_people().await.unwrap();
    let used = codes
        .iter()
        .find(|c| c.used_by.as_ref().map(|u| u.id) == Some(member.id))
        .unwrap();
    let (status, body) = app
        .delete(&format!("/invite-codes/{}", used.invite.id), &app.admin.token)
        .await;
    assert_eq!(status, 422, "{body}");
    assert_eq!(body["error"], "InvalidState");

    let fresh = app.services.invite_codes.create(app.admin.id).await.unwrap();
    let (status, _) = app
        .delete(&format!("/invite-codes/{}", fresh.id), &app.admin.token)
        .await;
    assert_eq!(status, 204);

    let (status, _) = app
        .delete(&format!("/invite-codes/{}", fresh.id), &app.admin.token)
        .await;
    assert_eq!(status, 404);

    let (status, _) = app.post("/invite-codes", &member.token, json!({})).await;
    assert_eq!(status, 403);
}

#[tokio::test]
async fn code_generation_gives_up_after_the_cap() {
    let app = TestApp::spawn().await;

    let mut calls = 0;
    let first = app
        .services
        .invite_codes
        .create_with(app.admin.id, || {
            calls += 1;
            "DEADBEEF".to_string()
        })
        .await;
    assert!(first.is_ok());
    assert_eq!(calls, 1);

    let mut calls = 0;
    let second = app
        .services
        .invite_codes
        .create_with(app.admin.id, || {
            calls += 1;
            "DEADBEEF".to_string()
        })
        .await;
    assert!(matches!(second, Err(AppError::CodeGenerationExhausted(n)) if n == MAX_CODE_ATTEMPTS));
    assert_eq!(calls, MAX_CODE_ATTEMPTS);
}

#[tokio::test]
async fn deleting_a_member_reassigns_and_detaches_their_data() {
    let app = TestApp::spawn().await;
    let target = app.register_member("Tom").await;
    let friend = app.register_member("Fay").await;

    // Codes issued by the member: one stays unused, one gets redeemed
    let unused = app.services.invite_codes.create(target.id).await.unwrap();
    let redeemed = app.services.invite_codes.create(target.id).await.unwrap();
    let (status, body) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": "Kit",
                "email": "kit@club.test",
                "password": "long-enough",
                "inviteCode": redeemed.code,
            })),
        )
        .await;
    assert_eq!(status, 201, "{body}");

    let book_id = app.add_book(&target.token, "Middlemarch", None).await;
    app.post("/ratings", &target.token, json!({ "bookId": book_id, "rating": 4.0 }))
        .await;
    app.post("/ratings", &friend.token, json!({ "bookId": book_id, "rating": 2.0 }))
        .await;
    app.post("/votes", &target.token, json!({ "bookId": book_id })).await;
    app.put(
        &format!("/books/{}/note", book_id),
        &target.token,
        json!({ "content": "Dorothea!" }),
    )
    .await;

    let question_id = {
        let mut conn = app.repository.pool.acquire().await.unwrap();
        QuestionsRepository::append_tx(&mut conn, book_id, target.id, "Is Casaubon [doomed]?")
            .await
            .unwrap()
            .id
    };

    let own_code_id = app
        .repository
        .invite_codes
        .list_with_people()
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.invite.used_by_id == Some(target.id))
        .map(|c| c.invite.id)
        .unwrap();

    let (status, body) = app
        .delete(&format!("/users/{}", target.id), &app.admin.token)
        .await;
    assert_eq!(status, 204, "{body}");

    assert!(app.repository.users.find_by_id(target.id).await.unwrap().is_none());

    let question = app.repository.questions.get_by_id(question_id).await.unwrap();
    assert_eq!(question.user_id, None);
    assert_eq!(question.question, "Is Casaubon [doomed]?");

    assert!(matches!(
        app.repository.invite_codes.get_by_id(unused.id).await,
        Err(AppError::NotFound(_))
    ));
    let reassigned = app.repository.invite_codes.get_by_id(redeemed.id).await.unwrap();
    assert_eq!(reassigned.created_by_id, app.admin.id);
    assert!(reassigned.is_used());

    let own_code = app.repository.invite_codes.get_by_id(own_code_id).await.unwrap();
    assert_eq!(own_code.used_by_id, None);
    assert_eq!(own_code.used_at, None);

    let book = app.repository.books.get_by_id(book_id).await.unwrap();
    assert_eq!(book.added_by_id, app.admin.id);

    let ratings = app.repository.ratings.for_book(book_id).await.unwrap();
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0].user.id, friend.id);
    assert!(app.repository.votes.for_user(target.id).await.unwrap().is_none());
    assert!(app.repository.notes.find(target.id, book_id).await.unwrap().is_none());
}

#[tokio::test]
async fn admins_cannot_delete_themselves_or_missing_users() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .delete(&format!("/users/{}", app.admin.id), &app.admin.token)
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "SelfDeletion");

    let (status, _) = app.delete("/users/9999", &app.admin.token).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn admin_lists_members_and_resets_passwords() {
    let app = TestApp::spawn().await;
    let member = app.register_member("Uma").await;

    let (status, users) = app.get("/users", &app.admin.token).await;
    assert_eq!(status, 200);
    let names: Vec<&str> = users
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Admin", "Uma"]);

    let (status, _) = app
        .put(
            &format!("/users/{}/password", member.id),
            &app.admin.token,
            json!({ "password": "reset-by-admin" }),
        )
        .await;
    assert_eq!(status, 204);

    let (status, _) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "login": "uma@club.test", "password": "reset-by-admin" })),
        )
        .await;
    assert_eq!(status, 200);
}
