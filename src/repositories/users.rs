use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::db::models::User;
use crate::db::types::UserRole;

const COLUMNS: &str = "id, username, hashed_password, full_name, role, is_active, \
                       created_at, updated_at";

pub(crate) struct CreateUser<'a> {
    pub(crate) username: &'a str,
    pub(crate) hashed_password: &'a str,
    pub(crate) full_name: &'a str,
    pub(crate) role: UserRole,
}

#[derive(Default)]
pub(crate) struct UpdateUser<'a> {
    pub(crate) hashed_password: Option<&'a str>,
    pub(crate) full_name: Option<&'a str>,
    pub(crate) role: Option<UserRole>,
    pub(crate) is_active: Option<bool>,
}

pub(crate) async fn find_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE username = $1"))
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn exists_by_username(pool: &SqlitePool, username: &str) -> sqlx::Result<bool> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(exists.is_some())
}

pub(crate) async fn create(pool: &SqlitePool, params: CreateUser<'_>) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (username, hashed_password, full_name, role) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {COLUMNS}"
    ))
    .bind(params.username)
    .bind(params.hashed_password)
    .bind(params.full_name)
    .bind(params.role)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update(
    pool: &SqlitePool,
    id: i64,
    params: UpdateUser<'_>,
) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET \
            hashed_password = COALESCE($2, hashed_password), \
            full_name = COALESCE($3, full_name), \
            role = COALESCE($4, role), \
            is_active = COALESCE($5, is_active), \
            updated_at = CURRENT_TIMESTAMP \
         WHERE id = $1 \
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(params.hashed_password)
    .bind(params.full_name)
    .bind(params.role)
    .bind(params.is_active)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserListRow {
    #[sqlx(flatten)]
    pub(crate) user: User,
    pub(crate) total_count: i64,
}

pub(crate) struct ListUsers<'a> {
    pub(crate) role: Option<UserRole>,
    pub(crate) username_like: Option<&'a str>,
    pub(crate) skip: i64,
    pub(crate) limit: i64,
}

pub(crate) async fn list(pool: &SqlitePool, params: ListUsers<'_>) -> sqlx::Result<Vec<UserListRow>> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {COLUMNS}, COUNT(*) OVER() AS total_count FROM users WHERE 1=1"
    ));

    if let Some(role) = params.role {
        builder.push(" AND role = ").push_bind(role);
    }
    if let Some(pattern) = params.username_like {
        builder.push(" AND username LIKE ").push_bind(format!("%{pattern}%"));
    }

    builder
        .push(" ORDER BY id")
        .push(" LIMIT ")
        .push_bind(params.limit.clamp(1, 500))
        .push(" OFFSET ")
        .push_bind(params.skip.max(0));

    builder.build_query_as::<UserListRow>().fetch_all(pool).await
}
