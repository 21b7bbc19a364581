use serde_json::{json, Value};

use crate::common::TestApp;

fn ids(questions: &Value) -> Vec<i64> {
    questions
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_i64().unwrap())
        .collect()
}

async fn seed_questions(app: &TestApp, book: i64) -> Vec<i64> {
    let mut created = Vec::new();
    for text in ["Who narrates?", "Why does [Gatsby] die?", "Favourite scene?"] {
        let (status, question) = app
            .post(
                &format!("/books/{}/questions", book),
                &app.admin.token,
                json!({ "question": text }),
            )
            .await;
        assert_eq!(status, 201, "{question}");
        created.push(question["id"].as_i64().unwrap());
    }
    created
}

#[tokio::test]
async fn questions_append_in_order_with_spoiler_segments() {
    let app = TestApp::spawn().await;
    let book = app.add_book(&app.admin.token, "Gatsby", Some("CURRENT")).await;
    let created = seed_questions(&app, book).await;

    let (status, questions) = app
        .get(&format!("/books/{}/questions", book), &app.admin.token)
        .await;
    assert_eq!(status, 200);
    assert_eq!(ids(&questions), created);

    let orders: Vec<i64> = questions
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["sortOrder"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![0, 1, 2]);

    let spoiler = &questions[1];
    assert_eq!(spoiler["question"], "Why does [Gatsby] die?");
    assert_eq!(spoiler["author"]["name"], "Admin");
    assert_eq!(
        spoiler["segments"],
        json!([
            { "kind": "text", "text": "Why does " },
            { "kind": "spoiler", "text": "Gatsby" },
            { "kind": "text", "text": " die?" },
        ])
    );

    let (_, detail) = app.get(&format!("/books/{}", book), &app.admin.token).await;
    assert_eq!(ids(&detail["questions"]), created);
}

#[tokio::test]
async fn reorder_requires_the_exact_id_set() {
    let app = TestApp::spawn().await;
    let book = app.add_book(&app.admin.token, "Ulysses", Some("CURRENT")).await;
    let other_book = app.add_book(&app.admin.token, "Dubliners", Some("COMPLETED")).await;
    let created = seed_questions(&app, book).await;
    let foreign = seed_questions(&app, other_book).await;
    let path = format!("/books/{}/questions/order", book);

    let (status, body) = app
        .put(&path, &app.admin.token, json!({ "questionIds": [created[2], created[0]] }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "PartialSet");

    let (status, _) = app
        .put(
            &path,
            &app.admin.token,
            json!({ "questionIds": [created[2], created[1], created[0], foreign[0]] }),
        )
        .await;
    assert_eq!(status, 400);

    let (_, unchanged) = app
        .get(&format!("/books/{}/questions", book), &app.admin.token)
        .await;
    assert_eq!(ids(&unchanged), created);

    let reversed: Vec<i64> = created.iter().rev().copied().collect();
    let (status, reordered) = app
        .put(&path, &app.admin.token, json!({ "questionIds": reversed }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(ids(&reordered), reversed);
    assert_eq!(reordered[0]["sortOrder"], 0);

    let (status, _) = app
        .put(&path, &app.admin.token, json!({ "questionIds": [] }))
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn members_read_but_do_not_manage_questions() {
    let app = TestApp::spawn().await;
    let member = app.register_member("Quinn").await;
    let book = app.add_book(&app.admin.token, "Dracula", Some("CURRENT")).await;
    let created = seed_questions(&app, book).await;

    let (status, questions) = app
        .get(&format!("/books/{}/questions", book), &member.token)
        .await;
    assert_eq!(status, 200);
    assert_eq!(ids(&questions).len(), 3);

    let (status, _) = app
        .post(
            &format!("/books/{}/questions", book),
            &member.token,
            json!({ "question": "Mine?" }),
        )
        .await;
    assert_eq!(status, 403);

    let (status, _) = app
        .patch(
            &format!("/questions/{}", created[0]),
            &member.token,
            json!({ "question": "Hijacked" }),
        )
        .await;
    assert_eq!(status, 403);

    let (status, _) = app
        .post(
            &format!("/books/{}/questions", book),
            &app.admin.token,
            json!({ "question": "   " }),
        )
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn questions_are_edited_and_deleted() {
    let app = TestApp::spawn().await;
    let book = app.add_book(&app.admin.token, "Emma", Some("CURRENT")).await;
    let created = seed_questions(&app, book).await;

    let (status, edited) = app
        .patch(
            &format!("/questions/{}", created[0]),
            &app.admin.token,
            json!({ "question": "Who is [Mr. Knightley]?" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(edited["question"], "Who is [Mr. Knightley]?");
    assert_eq!(edited["sortOrder"], 0);
    assert_eq!(edited["segments"][1]["kind"], "spoiler");

    let (status, _) = app
        .delete(&format!("/questions/{}", created[1]), &app.admin.token)
        .await;
    assert_eq!(status, 204);

    let (_, remaining) = app
        .get(&format!("/books/{}/questions", book), &app.admin.token)
        .await;
    assert_eq!(ids(&remaining), vec![created[0], created[2]]);

    let (status, _) = app.delete("/questions/9999", &app.admin.token).await;
    assert_eq!(status, 404);
}
