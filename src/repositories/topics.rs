use sqlx::SqlitePool;

use crate::db::models::Topic;

const COLUMNS: &str = "id, subject_id, name";

pub(crate) async fn get_or_create(
    pool: &SqlitePool,
    subject_id: i64,
    name: &str,
) -> sqlx::Result<Topic> {
    sqlx::query_as::<_, Topic>(&format!(
        "INSERT INTO topics (subject_id, name) VALUES ($1, $2) \
         ON CONFLICT(subject_id, name) DO UPDATE SET name = excluded.name \
         RETURNING {COLUMNS}"
    ))
    .bind(subject_id)
    .bind(name)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_for_subject(pool: &SqlitePool, subject_id: i64) -> sqlx::Result<Vec<Topic>> {
    sqlx::query_as::<_, Topic>(&format!(
        "SELECT {COLUMNS} FROM topics WHERE subject_id = $1 ORDER BY name"
    ))
    .bind(subject_id)
    .fetch_all(pool)
    .await
}

/// Keeps only the ids that actually belong to the subject.
pub(crate) async fn filter_ids_for_subject(
    pool: &SqlitePool,
    subject_id: i64,
    topic_ids: &[i64],
) -> sqlx::Result<Vec<i64>> {
    if topic_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder: sqlx::QueryBuilder<sqlx::Sqlite> =
        sqlx::QueryBuilder::new("SELECT id FROM topics WHERE subject_id = ");
    builder.push_bind(subject_id).push(" AND id IN (");
    let mut separated = builder.separated(", ");
    for id in topic_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    builder.build_query_scalar::<i64>().fetch_all(pool).await
}
