use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::db::models::Topic;
use crate::repositories;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(list_subjects)).route("/:id/topics", get(list_topics))
}

#[derive(Debug, Serialize)]
struct SubjectResponse {
    id: i64,
    name: String,
    topics: Vec<TopicResponse>,
}

#[derive(Debug, Serialize)]
struct TopicResponse {
    id: i64,
    name: String,
}

impl TopicResponse {
    fn from_db(topic: Topic) -> Self {
        Self { id: topic.id, name: topic.name }
    }
}

async fn list_subjects(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Vec<SubjectResponse>>, ApiError> {
    let subjects = repositories::subjects::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list subjects"))?;

    let mut response = Vec::with_capacity(subjects.len());
    for subject in subjects {
        let topics = repositories::topics::list_for_subject(state.db(), subject.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list topics"))?;
        response.push(SubjectResponse {
            id: subject.id,
            name: subject.name,
            topics: topics.into_iter().map(TopicResponse::from_db).collect(),
        });
    }

    Ok(Json(response))
}

async fn list_topics(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<TopicResponse>>, ApiError> {
    repositories::subjects::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load subject"))?
        .ok_or_else(|| ApiError::NotFound("Subject not found".to_string()))?;

    let topics = repositories::topics::list_for_subject(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list topics"))?;

    Ok(Json(topics.into_iter().map(TopicResponse::from_db).collect()))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use tower::ServiceExt;

    use crate::test_support::{self, json_request, read_json};

    #[tokio::test]
    async fn subjects_list_includes_topics() {
        let ctx = test_support::setup_test_context().await;
        let user =
            test_support::insert_user(&ctx.state, "s1", "password-123", "S One", "student").await;
        let token = test_support::bearer_token(&ctx.state, user.id);
        let (subject_id, _topic_id) =
            test_support::insert_subject_with_topic(&ctx.state, "Databases", "Indexing").await;

        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                Method::GET,
                "/api/v1/subjects",
                serde_json::Value::Null,
                Some(&token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body[0]["id"], subject_id);
        assert_eq!(body[0]["name"], "Databases");
        assert_eq!(body[0]["topics"][0]["name"], "Indexing");
    }

    #[tokio::test]
    async fn topics_of_unknown_subject_is_not_found() {
        let ctx = test_support::setup_test_context().await;
        let user =
            test_support::insert_user(&ctx.state, "s2", "password-123", "S Two", "student").await;
        let token = test_support::bearer_token(&ctx.state, user.id);

        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                Method::GET,
                "/api/v1/subjects/999/topics",
                serde_json::Value::Null,
                Some(&token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
