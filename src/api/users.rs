use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::pagination::{PageParams, PaginatedResponse};
use crate::api::validation;
use crate::core::security;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::user::{AdminUserCreate, AdminUserUpdate, UserListQuery, UserResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

async fn list_users(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Query(page): Query<PageParams>,
    Query(filters): Query<UserListQuery>,
) -> Result<Json<PaginatedResponse<UserResponse>>, ApiError> {
    let rows = repositories::users::list(
        state.db(),
        repositories::users::ListUsers {
            role: filters.role,
            username_like: filters.username.as_deref(),
            skip: page.skip,
            limit: page.limit,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list users"))?;

    let total = rows.first().map(|row| row.total_count).unwrap_or(0);
    let items = rows.into_iter().map(|row| UserResponse::from_db(row.user)).collect();

    Ok(Json(PaginatedResponse::new(items, total, &page)))
}

async fn create_user(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Json(payload): Json<AdminUserCreate>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    validation::validate_username(&payload.username)?;
    validation::validate_password(&payload.password)?;

    let exists = repositories::users::exists_by_username(state.db(), &payload.username)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check existing user"))?;
    if exists {
        return Err(ApiError::Conflict("Username already taken".to_string()));
    }

    let hashed_password = security::hash_password(&payload.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let user = repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            username: &payload.username,
            hashed_password: &hashed_password,
            full_name: &payload.full_name,
            role: payload.role,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create user"))?;

    Ok((StatusCode::CREATED, Json(UserResponse::from_db(user))))
}

async fn get_user(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = repositories::users::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from_db(user)))
}

async fn update_user(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(id): Path<i64>,
    Json(payload): Json<AdminUserUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if admin.id == id && payload.is_active == Some(false) {
        return Err(ApiError::BadRequest("Cannot deactivate your own account".to_string()));
    }

    let hashed_password = match payload.password.as_deref() {
        Some(password) => {
            validation::validate_password(password)?;
            Some(
                security::hash_password(password)
                    .map_err(|e| ApiError::internal(e, "Failed to hash password"))?,
            )
        }
        None => None,
    };

    let user = repositories::users::update(
        state.db(),
        id,
        repositories::users::UpdateUser {
            hashed_password: hashed_password.as_deref(),
            full_name: payload.full_name.as_deref(),
            role: payload.role,
            is_active: payload.is_active,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update user"))?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from_db(user)))
}

async fn delete_user(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if admin.id == id {
        return Err(ApiError::BadRequest("Cannot delete your own account".to_string()));
    }

    let deleted = repositories::users::delete(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete user"))?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
