use sqlx::SqlitePool;

use crate::db::models::Subject;

const COLUMNS: &str = "id, name";

pub(crate) async fn get_or_create(pool: &SqlitePool, name: &str) -> sqlx::Result<Subject> {
    // The no-op DO UPDATE makes RETURNING yield the existing row on conflict.
    sqlx::query_as::<_, Subject>(&format!(
        "INSERT INTO subjects (name) VALUES ($1) \
         ON CONFLICT(name) DO UPDATE SET name = excluded.name \
         RETURNING {COLUMNS}"
    ))
    .bind(name)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Subject>> {
    sqlx::query_as::<_, Subject>(&format!("SELECT {COLUMNS} FROM subjects WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(pool: &SqlitePool) -> sqlx::Result<Vec<Subject>> {
    sqlx::query_as::<_, Subject>(&format!("SELECT {COLUMNS} FROM subjects ORDER BY name"))
        .fetch_all(pool)
        .await
}
