use sqlx::SqlitePool;

use crate::db::models::GeneratedPaper;

const COLUMNS: &str =
    "id, student_id, title, total_marks, question_count, question_ids, created_at, updated_at";

pub(crate) struct CreateGeneratedPaper<'a> {
    pub(crate) student_id: i64,
    pub(crate) title: &'a str,
    pub(crate) total_marks: i64,
    pub(crate) question_count: i64,
    pub(crate) question_ids: &'a str,
}

pub(crate) struct UpdateGeneratedPaper<'a> {
    pub(crate) title: Option<&'a str>,
    pub(crate) total_marks: i64,
    pub(crate) question_count: i64,
    pub(crate) question_ids: &'a str,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    params: CreateGeneratedPaper<'_>,
) -> sqlx::Result<GeneratedPaper> {
    sqlx::query_as::<_, GeneratedPaper>(&format!(
        "INSERT INTO generated_papers (student_id, title, total_marks, question_count, question_ids) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {COLUMNS}"
    ))
    .bind(params.student_id)
    .bind(params.title)
    .bind(params.total_marks)
    .bind(params.question_count)
    .bind(params.question_ids)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_for_student(
    pool: &SqlitePool,
    id: i64,
    student_id: i64,
) -> sqlx::Result<Option<GeneratedPaper>> {
    sqlx::query_as::<_, GeneratedPaper>(&format!(
        "SELECT {COLUMNS} FROM generated_papers WHERE id = $1 AND student_id = $2"
    ))
    .bind(id)
    .bind(student_id)
    .fetch_optional(pool)
    .await
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct GeneratedPaperListRow {
    #[sqlx(flatten)]
    pub(crate) paper: GeneratedPaper,
    pub(crate) total_count: i64,
}

pub(crate) async fn list_for_student(
    pool: &SqlitePool,
    student_id: i64,
    skip: i64,
    limit: i64,
) -> sqlx::Result<Vec<GeneratedPaperListRow>> {
    sqlx::query_as::<_, GeneratedPaperListRow>(&format!(
        "SELECT {COLUMNS}, COUNT(*) OVER() AS total_count \
         FROM generated_papers WHERE student_id = $1 \
         ORDER BY created_at DESC, id DESC \
         LIMIT $2 OFFSET $3"
    ))
    .bind(student_id)
    .bind(limit.clamp(1, 500))
    .bind(skip.max(0))
    .fetch_all(pool)
    .await
}

pub(crate) async fn update_for_student(
    pool: &SqlitePool,
    id: i64,
    student_id: i64,
    params: UpdateGeneratedPaper<'_>,
) -> sqlx::Result<Option<GeneratedPaper>> {
    sqlx::query_as::<_, GeneratedPaper>(&format!(
        "UPDATE generated_papers SET \
            title = COALESCE($3, title), \
            total_marks = $4, \
            question_count = $5, \
            question_ids = $6, \
            updated_at = CURRENT_TIMESTAMP \
         WHERE id = $1 AND student_id = $2 \
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(student_id)
    .bind(params.title)
    .bind(params.total_marks)
    .bind(params.question_count)
    .bind(params.question_ids)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete_for_student(
    pool: &SqlitePool,
    id: i64,
    student_id: i64,
) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM generated_papers WHERE id = $1 AND student_id = $2")
        .bind(id)
        .bind(student_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
