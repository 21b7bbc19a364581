use reqwest::Method;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn health_and_readiness() {
    let app = TestApp::spawn().await;

    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.request(Method::GET, "/ready", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn login_accepts_email_in_any_case_or_exact_name() {
    let app = TestApp::spawn().await;

    for login in ["admin@club.test", "ADMIN@Club.Test", "Admin"] {
        let (status, body) = app
            .request(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "login": login, "password": "admin-password" })),
            )
            .await;
        assert_eq!(status, 200, "{login}: {body}");
        assert_eq!(body["tokenType"], "Bearer");
        assert_eq!(body["user"]["isAdmin"], true);
        assert!(body["user"].get("passwordHash").is_none());
    }

    let (status, _) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "login": "admin", "password": "admin-password" })),
        )
        .await;
    assert_eq!(status, 401, "name match is exact");

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "login": "admin@club.test", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "NotAuthenticated");
}

#[tokio::test]
async fn bootstrap_code_registers_exactly_one_member() {
    let app = TestApp::spawn().await;

    let register = |email: &'static str| {
        json!({
            "name": "Grace",
            "email": email,
            "password": "long-enough",
            "inviteCode": "welcome1",
        })
    };

    let (status, body) = app
        .request(Method::POST, "/auth/register", None, Some(register("Grace@Club.Test")))
        .await;
    assert_eq!(status, 201, "{body}");
    assert_eq!(body["user"]["email"], "grace@club.test");
    assert_eq!(body["user"]["isAdmin"], false);

    let token = body["token"].as_str().unwrap().to_string();
    let (status, me) = app.get("/auth/me", &token).await;
    assert_eq!(status, 200);
    assert_eq!(me["name"], "Grace");

    let (status, body) = app
        .request(Method::POST, "/auth/register", None, Some(register("other@club.test")))
        .await;
    assert_eq!(status, 409, "{body}");
}

#[tokio::test]
async fn failed_registration_leaves_the_code_unused() {
    let app = TestApp::spawn().await;
    let invite = app.services.invite_codes.create(app.admin.id).await.unwrap();

    let (status, _) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": "Copycat",
                "email": "admin@club.test",
                "password": "long-enough",
                "inviteCode": invite.code,
            })),
        )
        .await;
    assert_eq!(status, 409);

    let stored = app.repository.invite_codes.get_by_id(invite.id).await.unwrap();
    assert!(!stored.is_used());
    assert_eq!(app.repository.users.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn registration_rejects_bad_input() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": "Ned",
                "email": "ned@club.test",
                "password": "long-enough",
                "inviteCode": "NOPE1234",
            })),
        )
        .await;
    assert_eq!(status, 404);

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": "Ned",
                "email": "ned@club.test",
                "password": "short",
                "inviteCode": "WELCOME1",
            })),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let app = TestApp::spawn().await;

    let (status, _) = app.request(Method::GET, "/dashboard", None, None).await;
    assert_eq!(status, 401);

    let (status, _) = app.get("/dashboard", "not-a-jwt").await;
    assert_eq!(status, 401);

    let member = app.register_member("Mia").await;
    let (status, body) = app.get("/users", &member.token).await;
    assert_eq!(status, 403);
    assert_eq!(body["error"], "NotAuthorized");
}

#[tokio::test]
async fn profile_email_and_password_changes() {
    let app = TestApp::spawn().await;
    let member = app.register_member("Leo").await;

    let (status, body) = app
        .put("/profile/email", &member.token, json!({ "email": "Leo.New@Club.Test" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["email"], "leo.new@club.test");

    let (status, _) = app
        .put("/profile/email", &member.token, json!({ "email": "admin@club.test" }))
        .await;
    assert_eq!(status, 409);

    let (status, _) = app
        .put(
            "/profile/password",
            &member.token,
            json!({ "currentPassword": "wrong", "newPassword": "brand-new-pass" }),
        )
        .await;
    assert_eq!(status, 403);

    let (status, _) = app
        .put(
            "/profile/password",
            &member.token,
            json!({ "currentPassword": "reading-is-fun", "newPassword": "brand-new-pass" }),
        )
        .await;
    assert_eq!(status, 204);

    let (status, _) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "login": "leo.new@club.test", "password": "brand-new-pass" })),
        )
        .await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn padded_emails_are_trimmed_before_validation() {
    let app = TestApp::spawn().await;
    let invite = app.services.invite_codes.create(app.admin.id).await.unwrap();

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": "Cy",
                "email": "  Cy@Club.test ",
                "password": "reading-is-fun",
                "inviteCode": invite.code,
            })),
        )
        .await;
    assert_eq!(status, 201, "{body}");
    assert_eq!(body["user"]["email"], "cy@club.test");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = app
        .put("/profile/email", &token, json!({ "email": " Cyrus@Club.Test  " }))
        .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["email"], "cyrus@club.test");

    let (status, body) = app
        .put("/profile/email", &token, json!({ "email": "   " }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "BadValue");
}
