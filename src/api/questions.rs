//! Discussion question endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::question::{CreateQuestion, QuestionView, ReorderQuestions, UpdateQuestion},
    AppState,
};

use super::AuthenticatedUser;

/// Questions of a book in display order
#[utoipa::path(
    get,
    path = "/books/{id}/questions",
    tag = "questions",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Questions with spoiler segments", body = Vec<QuestionView>),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_questions(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(book_id): Path<i64>,
) -> AppResult<Json<Vec<QuestionView>>> {
    let questions = state.services.questions.list(book_id).await?;
    Ok(Json(questions))
}

/// Add a question at the end of the list
#[utoipa::path(
    post,
    path = "/books/{id}/questions",
    tag = "questions",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = CreateQuestion,
    responses(
        (status = 201, description = "Question created", body = QuestionView),
        (status = 400, description = "Empty question", body = crate::error::ErrorResponse),
        (status = 403, description = "Not an administrator", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_question(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i64>,
    Json(request): Json<CreateQuestion>,
) -> AppResult<(StatusCode, Json<QuestionView>)> {
    let question = state
        .services
        .questions
        .create(book_id, &request.question, &claims)
        .await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// Replace the order of all questions of a book
#[utoipa::path(
    put,
    path = "/books/{id}/questions/order",
    tag = "questions",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = ReorderQuestions,
    responses(
        (status = 200, description = "Questions in their new order", body = Vec<QuestionView>),
        (status = 400, description = "Ids do not match the book's questions", body = crate::error::ErrorResponse)
    )
)]
pub async fn reorder_questions(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i64>,
    Json(request): Json<ReorderQuestions>,
) -> AppResult<Json<Vec<QuestionView>>> {
    let questions = state
        .services
        .questions
        .reorder(book_id, &request.question_ids, &claims)
        .await?;
    Ok(Json(questions))
}

/// Edit a question
#[utoipa::path(
    patch,
    path = "/questions/{id}",
    tag = "questions",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Question ID")
    ),
    request_body = UpdateQuestion,
    responses(
        (status = 200, description = "Question updated", body = QuestionView),
        (status = 403, description = "Not the author", body = crate::error::ErrorResponse),
        (status = 404, description = "Question not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_question(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateQuestion>,
) -> AppResult<Json<QuestionView>> {
    let question = state.services.questions.update(id, &request, &claims).await?;
    Ok(Json(question))
}

/// Delete a question
#[utoipa::path(
    delete,
    path = "/questions/{id}",
    tag = "questions",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Question ID")
    ),
    responses(
        (status = 204, description = "Question deleted"),
        (status = 403, description = "Not the author", body = crate::error::ErrorResponse),
        (status = 404, description = "Question not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_question(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.questions.delete(id, &claims).await?;
    Ok(StatusCode::NO_CONTENT)
}
