use std::sync::{Arc, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::api;
use crate::core::{config::Settings, security, state::AppState};
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::repositories;

const TEST_DATABASE_URL: &str = "sqlite::memory:";
const TEST_SECRET_KEY: &str = "test-secret";

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: Router,
    _guard: OwnedMutexGuard<()>,
}

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn set_test_env() {
    std::env::set_var("QPAPERGEN_ENV", "test");
    std::env::set_var("QPAPERGEN_STRICT_CONFIG", "0");
    std::env::set_var("SECRET_KEY", TEST_SECRET_KEY);
    std::env::set_var("DATABASE_URL", TEST_DATABASE_URL);
    std::env::set_var("PROMETHEUS_ENABLED", "0");
    std::env::remove_var("FIRST_SUPERUSER_PASSWORD");
    std::env::remove_var("LINES_PER_PAGE");
    std::env::remove_var("BACKEND_CORS_ORIGINS");
}

pub(crate) async fn setup_test_context() -> TestContext {
    let guard = env_lock().await;
    set_test_env();

    let settings = Settings::load().expect("settings");
    let db = crate::db::init_pool(&settings).await.expect("db pool");
    crate::db::run_migrations(&db).await.expect("migrations");

    let state = AppState::new(settings, db);
    let app = api::router::router(state.clone());

    TestContext { state, app, _guard: guard }
}

pub(crate) async fn insert_user(
    state: &AppState,
    username: &str,
    password: &str,
    full_name: &str,
    role: &str,
) -> User {
    let role = match role {
        "admin" => UserRole::Admin,
        "staff" => UserRole::Staff,
        _ => UserRole::Student,
    };
    let hashed_password = security::hash_password(password).expect("hash password");

    repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            username,
            hashed_password: &hashed_password,
            full_name,
            role,
        },
    )
    .await
    .expect("insert user")
}

pub(crate) async fn insert_subject_with_topic(
    state: &AppState,
    subject: &str,
    topic: &str,
) -> (i64, i64) {
    let subject = repositories::subjects::get_or_create(state.db(), subject)
        .await
        .expect("insert subject");
    let topic = repositories::topics::get_or_create(state.db(), subject.id, topic)
        .await
        .expect("insert topic");
    (subject.id, topic.id)
}

pub(crate) async fn insert_question(
    state: &AppState,
    user_id: i64,
    subject_id: i64,
    topic_id: i64,
    prompt: &str,
    marks: i64,
    difficulty: i64,
) -> i64 {
    repositories::questions::create(
        state.db(),
        repositories::questions::CreateQuestion {
            user_id: Some(user_id),
            subject_id,
            topic_id,
            prompt,
            answer: Some("reference answer"),
            marks,
            difficulty,
        },
    )
    .await
    .expect("insert question")
    .id
}

pub(crate) fn bearer_token(state: &AppState, user_id: i64) -> String {
    security::create_access_token(user_id, state.settings(), None).expect("token")
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    if body.is_null() {
        builder.body(Body::empty()).expect("request body")
    } else {
        let bytes = serde_json::to_vec(&body).expect("serialize body");
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(bytes))
            .expect("request body")
    }
}

pub(crate) async fn read_json(response: axum::response::Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        let body_text = String::from_utf8_lossy(&body);
        panic!("json parse: {err}; body: {body_text}");
    })
}
