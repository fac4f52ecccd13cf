use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::pagination::{PageParams, PaginatedResponse};
use crate::core::state::AppState;
use crate::db::models::GeneratedPaper;
use crate::paper::{render, Block};
use crate::repositories;
use crate::schemas::paper::{
    GeneratedPaperCreate, GeneratedPaperDetail, GeneratedPaperSummary, GeneratedPaperUpdate,
    RenderedPaperResponse,
};
use crate::schemas::question::QuestionBrief;
use crate::services::generated_papers as records;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_papers).post(create_paper))
        .route("/:id", get(get_paper).put(update_paper).delete(delete_paper))
        .route("/:id/render", get(render_paper))
}

async fn create_paper(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<GeneratedPaperCreate>,
) -> Result<(StatusCode, Json<GeneratedPaperDetail>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let resolved = records::resolve_questions(state.db(), &payload.question_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve questions"))?;
    let (total_marks, question_count) = records::snapshot_totals(&resolved);

    let encoded = records::encode_question_ids(&payload.question_ids);
    let paper = repositories::generated_papers::create(
        state.db(),
        repositories::generated_papers::CreateGeneratedPaper {
            student_id: user.id,
            title: &payload.title,
            total_marks,
            question_count,
            question_ids: &encoded,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to save generated paper"))?;

    let missing = payload.question_ids.len() - resolved.len();
    Ok((StatusCode::CREATED, Json(detail(paper, resolved, missing))))
}

async fn list_papers(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<PageParams>,
) -> Result<Json<PaginatedResponse<GeneratedPaperSummary>>, ApiError> {
    let rows = repositories::generated_papers::list_for_student(
        state.db(),
        user.id,
        page.skip,
        page.limit,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list generated papers"))?;

    let total = rows.first().map(|row| row.total_count).unwrap_or(0);
    let items = rows.into_iter().map(|row| GeneratedPaperSummary::from_db(row.paper)).collect();

    Ok(Json(PaginatedResponse::new(items, total, &page)))
}

async fn get_paper(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<GeneratedPaperDetail>, ApiError> {
    let paper = find_owned(&state, id, user.id).await?;

    let ids = records::parse_question_ids(&paper.question_ids);
    let resolved = records::resolve_questions(state.db(), &ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve questions"))?;
    let missing = ids.len() - resolved.len();

    Ok(Json(detail(paper, resolved, missing)))
}

async fn update_paper(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<GeneratedPaperUpdate>,
) -> Result<Json<GeneratedPaperDetail>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let existing = find_owned(&state, id, user.id).await?;

    let ids = match &payload.question_ids {
        Some(ids) => ids.clone(),
        None => records::parse_question_ids(&existing.question_ids),
    };

    let resolved = records::resolve_questions(state.db(), &ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve questions"))?;
    let (total_marks, question_count) = records::snapshot_totals(&resolved);
    let missing = ids.len() - resolved.len();

    let encoded = records::encode_question_ids(&ids);
    let paper = repositories::generated_papers::update_for_student(
        state.db(),
        id,
        user.id,
        repositories::generated_papers::UpdateGeneratedPaper {
            title: payload.title.as_deref(),
            total_marks,
            question_count,
            question_ids: &encoded,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update generated paper"))?
    .ok_or_else(|| ApiError::NotFound("Generated paper not found".to_string()))?;

    Ok(Json(detail(paper, resolved, missing)))
}

async fn delete_paper(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::generated_papers::delete_for_student(state.db(), id, user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete generated paper"))?;
    if !deleted {
        return Err(ApiError::NotFound("Generated paper not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn render_paper(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<RenderedPaperResponse>, ApiError> {
    let paper = find_owned(&state, id, user.id).await?;

    let ids = records::parse_question_ids(&paper.question_ids);
    let resolved = records::resolve_questions(state.db(), &ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve questions"))?;
    let missing = ids.len() - resolved.len();

    let mut blocks = Vec::with_capacity(resolved.len() + 1);
    for (index, question) in resolved.iter().enumerate() {
        blocks.push(Block::Line { number: index as u32 + 1, text: question.prompt.clone() });
    }
    if missing > 0 {
        blocks.push(Block::Note {
            text: format!("{missing} question(s) from this paper are no longer available"),
        });
    }

    let pages =
        render::paginate(&paper.title, "", &blocks, state.settings().paper().lines_per_page);

    Ok(Json(RenderedPaperResponse { title: paper.title, pages }))
}

async fn find_owned(
    state: &AppState,
    id: i64,
    student_id: i64,
) -> Result<GeneratedPaper, ApiError> {
    repositories::generated_papers::find_for_student(state.db(), id, student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load generated paper"))?
        .ok_or_else(|| ApiError::NotFound("Generated paper not found".to_string()))
}

fn detail(
    paper: GeneratedPaper,
    resolved: Vec<crate::db::models::Question>,
    missing: usize,
) -> GeneratedPaperDetail {
    GeneratedPaperDetail {
        summary: GeneratedPaperSummary::from_db(paper),
        questions: resolved.into_iter().map(QuestionBrief::from_db).collect(),
        missing_count: missing,
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use tower::ServiceExt;

    use crate::test_support::{self, json_request, read_json};

    async fn seed_three_questions(ctx: &test_support::TestContext, staff_id: i64) -> Vec<i64> {
        let (subject_id, topic_id) =
            test_support::insert_subject_with_topic(&ctx.state, "Maths", "Calculus").await;
        let mut ids = Vec::new();
        for (n, marks) in [(1, 2), (2, 5), (3, 10)] {
            ids.push(
                test_support::insert_question(
                    &ctx.state,
                    staff_id,
                    subject_id,
                    topic_id,
                    &format!("Prompt {n}"),
                    marks,
                    3,
                )
                .await,
            );
        }
        ids
    }

    #[tokio::test]
    async fn saved_paper_preserves_question_order() {
        let ctx = test_support::setup_test_context().await;
        let staff =
            test_support::insert_user(&ctx.state, "prof", "password-123", "Prof", "staff").await;
        let student =
            test_support::insert_user(&ctx.state, "stud", "password-123", "Stud", "student").await;
        let ids = seed_three_questions(&ctx, staff.id).await;
        let token = test_support::bearer_token(&ctx.state, student.id);

        let reordered = vec![ids[2], ids[0], ids[1]];
        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/generated",
                serde_json::json!({ "title": "Practice", "question_ids": reordered }),
                Some(&token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        assert_eq!(body["total_marks"], 17);
        assert_eq!(body["question_count"], 3);
        assert_eq!(body["questions"][0]["prompt"], "Prompt 3");
        assert_eq!(body["questions"][1]["prompt"], "Prompt 1");
    }

    #[tokio::test]
    async fn deleted_questions_are_skipped_silently() {
        let ctx = test_support::setup_test_context().await;
        let staff =
            test_support::insert_user(&ctx.state, "prof", "password-123", "Prof", "staff").await;
        let student =
            test_support::insert_user(&ctx.state, "stud", "password-123", "Stud", "student").await;
        let ids = seed_three_questions(&ctx, staff.id).await;
        let student_token = test_support::bearer_token(&ctx.state, student.id);
        let staff_token = test_support::bearer_token(&ctx.state, staff.id);

        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/generated",
                serde_json::json!({ "title": "Practice", "question_ids": ids }),
                Some(&student_token),
            ))
            .await
            .unwrap();
        let paper_id = read_json(response).await["id"].as_i64().unwrap();

        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                Method::DELETE,
                &format!("/api/v1/questions/{}", ids[1]),
                serde_json::Value::Null,
                Some(&staff_token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                Method::GET,
                &format!("/api/v1/generated/{paper_id}"),
                serde_json::Value::Null,
                Some(&student_token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["questions"].as_array().unwrap().len(), 2);
        assert_eq!(body["missing_count"], 1);
        // Stored totals reflect the snapshot at save time.
        assert_eq!(body["total_marks"], 17);
    }

    #[tokio::test]
    async fn students_only_see_their_own_papers() {
        let ctx = test_support::setup_test_context().await;
        let staff =
            test_support::insert_user(&ctx.state, "prof", "password-123", "Prof", "staff").await;
        let owner =
            test_support::insert_user(&ctx.state, "owner", "password-123", "Owner", "student")
                .await;
        let intruder =
            test_support::insert_user(&ctx.state, "other", "password-123", "Other", "student")
                .await;
        let ids = seed_three_questions(&ctx, staff.id).await;
        let owner_token = test_support::bearer_token(&ctx.state, owner.id);
        let intruder_token = test_support::bearer_token(&ctx.state, intruder.id);

        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/generated",
                serde_json::json!({ "title": "Private", "question_ids": ids }),
                Some(&owner_token),
            ))
            .await
            .unwrap();
        let paper_id = read_json(response).await["id"].as_i64().unwrap();

        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                Method::GET,
                &format!("/api/v1/generated/{paper_id}"),
                serde_json::Value::Null,
                Some(&intruder_token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                Method::GET,
                "/api/v1/generated",
                serde_json::Value::Null,
                Some(&intruder_token),
            ))
            .await
            .unwrap();
        let body = read_json(response).await;
        assert_eq!(body["total"], 0);
    }

    #[tokio::test]
    async fn update_reorders_and_retitles() {
        let ctx = test_support::setup_test_context().await;
        let staff =
            test_support::insert_user(&ctx.state, "prof", "password-123", "Prof", "staff").await;
        let student =
            test_support::insert_user(&ctx.state, "stud", "password-123", "Stud", "student").await;
        let ids = seed_three_questions(&ctx, staff.id).await;
        let token = test_support::bearer_token(&ctx.state, student.id);

        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/generated",
                serde_json::json!({ "title": "Before", "question_ids": ids }),
                Some(&token),
            ))
            .await
            .unwrap();
        let paper_id = read_json(response).await["id"].as_i64().unwrap();

        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                &format!("/api/v1/generated/{paper_id}"),
                serde_json::json!({
                    "title": "After",
                    "question_ids": [ids[1], ids[0]]
                }),
                Some(&token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["title"], "After");
        assert_eq!(body["question_count"], 2);
        assert_eq!(body["total_marks"], 7);
        assert_eq!(body["questions"][0]["prompt"], "Prompt 2");
    }

    #[tokio::test]
    async fn render_marks_missing_questions() {
        let ctx = test_support::setup_test_context().await;
        let staff =
            test_support::insert_user(&ctx.state, "prof", "password-123", "Prof", "staff").await;
        let student =
            test_support::insert_user(&ctx.state, "stud", "password-123", "Stud", "student").await;
        let ids = seed_three_questions(&ctx, staff.id).await;
        let student_token = test_support::bearer_token(&ctx.state, student.id);
        let staff_token = test_support::bearer_token(&ctx.state, staff.id);

        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/generated",
                serde_json::json!({ "title": "Render Me", "question_ids": ids }),
                Some(&student_token),
            ))
            .await
            .unwrap();
        let paper_id = read_json(response).await["id"].as_i64().unwrap();

        ctx.app
            .clone()
            .oneshot(json_request(
                Method::DELETE,
                &format!("/api/v1/questions/{}", ids[0]),
                serde_json::Value::Null,
                Some(&staff_token),
            ))
            .await
            .unwrap();

        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                Method::GET,
                &format!("/api/v1/generated/{paper_id}/render"),
                serde_json::Value::Null,
                Some(&student_token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        let page: Vec<String> = body["pages"][0]
            .as_array()
            .unwrap()
            .iter()
            .map(|line| line.as_str().unwrap().to_string())
            .collect();
        assert!(page.iter().any(|line| line.contains("no longer available")));
        assert!(page.iter().any(|line| line.starts_with("Q.1 ")));
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let ctx = test_support::setup_test_context().await;
        let staff =
            test_support::insert_user(&ctx.state, "prof", "password-123", "Prof", "staff").await;
        let student =
            test_support::insert_user(&ctx.state, "stud", "password-123", "Stud", "student").await;
        let ids = seed_three_questions(&ctx, staff.id).await;
        let token = test_support::bearer_token(&ctx.state, student.id);

        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/generated",
                serde_json::json!({ "title": "Gone Soon", "question_ids": ids }),
                Some(&token),
            ))
            .await
            .unwrap();
        let paper_id = read_json(response).await["id"].as_i64().unwrap();

        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                Method::DELETE,
                &format!("/api/v1/generated/{paper_id}"),
                serde_json::Value::Null,
                Some(&token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                Method::GET,
                &format!("/api/v1/generated/{paper_id}"),
                serde_json::Value::Null,
                Some(&token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
