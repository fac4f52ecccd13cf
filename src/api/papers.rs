use std::collections::HashMap;

use axum::{extract::State, routing::post, Json, Router};
use rand::rngs::StdRng;
use rand::SeedableRng;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::paper::{assembler, render, sufficiency};
use crate::repositories;
use crate::schemas::paper::{
    GenerateRequest, PaperResponse, SufficiencyRequest, SufficiencyResponse,
};
use crate::services::generated_papers as paper_records;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/sufficiency", post(check_sufficiency)).route("/generate", post(generate))
}

async fn check_sufficiency(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(payload): Json<SufficiencyRequest>,
) -> Result<Json<SufficiencyResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let topic_ids = resolve_topics(&state, payload.subject_id, &payload.topic_ids).await?;

    let counts = repositories::questions::count_by_marks(state.db(), payload.subject_id, &topic_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count questions"))?;
    let counts: HashMap<i64, usize> =
        counts.into_iter().map(|(marks, count)| (marks, count as usize)).collect();

    let template = payload.template.template();
    let tiers = sufficiency::check(&counts, template);
    let satisfied = sufficiency::all_satisfied(&tiers);

    Ok(Json(SufficiencyResponse { template: payload.template, satisfied, tiers }))
}

async fn generate(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<PaperResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let topic_ids = resolve_topics(&state, payload.subject_id, &payload.topic_ids).await?;

    // Single pool read; sufficiency and assembly see the same snapshot.
    let pool = repositories::questions::list_pool(state.db(), payload.subject_id, &topic_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load question pool"))?;

    let mut counts: HashMap<i64, usize> = HashMap::new();
    for question in &pool {
        *counts.entry(question.marks).or_insert(0) += 1;
    }

    let template = payload.template.template();
    let tiers = sufficiency::check(&counts, template);

    let assembled = match payload.seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            assembler::assemble(template, &pool, &mut rng)
        }
        None => assembler::assemble(template, &pool, &mut rand::thread_rng()),
    }
    .map_err(|e| ApiError::internal(e, "Paper template configuration is invalid"))?;

    let subtitle = payload.subtitle.unwrap_or_default();
    let pages = render::paginate(
        &payload.title,
        &subtitle,
        &assembled.blocks,
        state.settings().paper().lines_per_page,
    );

    let saved_paper_id =
        save_student_history(&state, &user, &payload.title, &assembled, &pool).await?;

    Ok(Json(PaperResponse {
        title: payload.title,
        subtitle,
        template: payload.template,
        sufficiency: tiers,
        blocks: assembled.blocks,
        pages,
        question_ids: assembled.question_ids,
        saved_paper_id,
    }))
}

/// Students keep every generated paper in their history; staff runs are
/// one-off previews and are not recorded.
async fn save_student_history(
    state: &AppState,
    user: &User,
    title: &str,
    assembled: &assembler::AssembledPaper,
    pool: &[crate::db::models::Question],
) -> Result<Option<i64>, ApiError> {
    if user.role != UserRole::Student {
        return Ok(None);
    }

    let by_id: HashMap<i64, i64> = pool.iter().map(|q| (q.id, q.marks)).collect();
    let total_marks: i64 =
        assembled.question_ids.iter().filter_map(|id| by_id.get(id)).sum();

    let encoded = paper_records::encode_question_ids(&assembled.question_ids);
    let record = repositories::generated_papers::create(
        state.db(),
        repositories::generated_papers::CreateGeneratedPaper {
            student_id: user.id,
            title,
            total_marks,
            question_count: assembled.question_ids.len() as i64,
            question_ids: &encoded,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to save generated paper"))?;

    Ok(Some(record.id))
}

async fn resolve_topics(
    state: &AppState,
    subject_id: i64,
    requested: &[i64],
) -> Result<Vec<i64>, ApiError> {
    repositories::subjects::find_by_id(state.db(), subject_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load subject"))?
        .ok_or_else(|| ApiError::NotFound("Subject not found".to_string()))?;

    let topic_ids =
        repositories::topics::filter_ids_for_subject(state.db(), subject_id, requested)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to resolve topics"))?;

    if topic_ids.is_empty() {
        return Err(ApiError::BadRequest(
            "No valid topics selected for this subject".to_string(),
        ));
    }

    Ok(topic_ids)
}
