use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{can_manage_question, CurrentStaff, CurrentUser};
use crate::api::pagination::{PageParams, PaginatedResponse};
use crate::api::validation;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::question::{
    QuestionCreate, QuestionListQuery, QuestionResponse, QuestionUpdate,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_questions).post(create_question))
        .route("/:id", get(get_question).put(update_question).delete(delete_question))
}

async fn create_question(
    State(state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Json(payload): Json<QuestionCreate>,
) -> Result<(StatusCode, Json<QuestionResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    validation::validate_mark_value(payload.marks)?;
    validation::validate_difficulty(payload.difficulty)?;

    let subject = repositories::subjects::get_or_create(state.db(), payload.subject.trim())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve subject"))?;
    let topic = repositories::topics::get_or_create(state.db(), subject.id, payload.topic.trim())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve topic"))?;

    let question = repositories::questions::create(
        state.db(),
        repositories::questions::CreateQuestion {
            user_id: Some(user.id),
            subject_id: subject.id,
            topic_id: topic.id,
            prompt: payload.prompt.trim(),
            answer: payload.answer.as_deref(),
            marks: payload.marks,
            difficulty: payload.difficulty,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create question"))?;

    let row = repositories::questions::find_by_id(state.db(), question.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load created question"))?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    Ok((StatusCode::CREATED, Json(QuestionResponse::from_row(row, true))))
}

async fn list_questions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<PageParams>,
    Query(filters): Query<QuestionListQuery>,
) -> Result<Json<PaginatedResponse<QuestionResponse>>, ApiError> {
    let rows = repositories::questions::list(
        state.db(),
        repositories::questions::ListQuestions {
            subject_id: filters.subject_id,
            topic_id: filters.topic_id,
            marks: filters.marks,
            user_id: if filters.mine.unwrap_or(false) { Some(user.id) } else { None },
            skip: page.skip,
            limit: page.limit,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list questions"))?;

    let total = rows.first().map(|row| row.total_count).unwrap_or(0);
    let items = rows
        .into_iter()
        .map(|row| {
            let include_answer =
                user.role.is_staff() || row.question.user_id == Some(user.id);
            QuestionResponse::from_row(
                repositories::questions::QuestionDetailRow {
                    question: row.question,
                    subject_name: row.subject_name,
                    topic_name: row.topic_name,
                },
                include_answer,
            )
        })
        .collect();

    Ok(Json(PaginatedResponse::new(items, total, &page)))
}

async fn get_question(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let row = repositories::questions::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load question"))?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    let include_answer = user.role.is_staff() || row.question.user_id == Some(user.id);
    Ok(Json(QuestionResponse::from_row(row, include_answer)))
}

async fn update_question(
    State(state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<i64>,
    Json(payload): Json<QuestionUpdate>,
) -> Result<Json<QuestionResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if let Some(marks) = payload.marks {
        validation::validate_mark_value(marks)?;
    }
    if let Some(difficulty) = payload.difficulty {
        validation::validate_difficulty(difficulty)?;
    }

    let existing = repositories::questions::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load question"))?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    if !can_manage_question(&user, existing.question.user_id) {
        return Err(ApiError::Forbidden("Only the question's author can modify it"));
    }

    let topic_id = match payload.topic.as_deref() {
        Some(name) => {
            let topic = repositories::topics::get_or_create(
                state.db(),
                existing.question.subject_id,
                name.trim(),
            )
            .await
            .map_err(|e| ApiError::internal(e, "Failed to resolve topic"))?;
            Some(topic.id)
        }
        None => None,
    };

    repositories::questions::update(
        state.db(),
        id,
        repositories::questions::UpdateQuestion {
            topic_id,
            prompt: payload.prompt.as_deref(),
            answer: payload.answer.as_deref(),
            marks: payload.marks,
            difficulty: payload.difficulty,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update question"))?
    .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    let row = repositories::questions::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load updated question"))?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    Ok(Json(QuestionResponse::from_row(row, true)))
}

async fn delete_question(
    State(state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let existing = repositories::questions::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load question"))?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    if !can_manage_question(&user, existing.question.user_id) {
        return Err(ApiError::Forbidden("Only the question's author can delete it"));
    }

    let deleted = repositories::questions::delete(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete question"))?;
    if !deleted {
        return Err(ApiError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
