use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::db::models::Question;

const COLUMNS: &str = "q.id, q.user_id, q.subject_id, q.topic_id, q.prompt, q.answer, \
                       q.marks, q.difficulty, q.created_at, q.updated_at";

pub(crate) struct CreateQuestion<'a> {
    pub(crate) user_id: Option<i64>,
    pub(crate) subject_id: i64,
    pub(crate) topic_id: i64,
    pub(crate) prompt: &'a str,
    pub(crate) answer: Option<&'a str>,
    pub(crate) marks: i64,
    pub(crate) difficulty: i64,
}

#[derive(Default)]
pub(crate) struct UpdateQuestion<'a> {
    pub(crate) topic_id: Option<i64>,
    pub(crate) prompt: Option<&'a str>,
    pub(crate) answer: Option<&'a str>,
    pub(crate) marks: Option<i64>,
    pub(crate) difficulty: Option<i64>,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct QuestionDetailRow {
    #[sqlx(flatten)]
    pub(crate) question: Question,
    pub(crate) subject_name: String,
    pub(crate) topic_name: String,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct QuestionListRow {
    #[sqlx(flatten)]
    pub(crate) question: Question,
    pub(crate) subject_name: String,
    pub(crate) topic_name: String,
    pub(crate) total_count: i64,
}

pub(crate) struct ListQuestions {
    pub(crate) subject_id: Option<i64>,
    pub(crate) topic_id: Option<i64>,
    pub(crate) marks: Option<i64>,
    pub(crate) user_id: Option<i64>,
    pub(crate) skip: i64,
    pub(crate) limit: i64,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    params: CreateQuestion<'_>,
) -> sqlx::Result<Question> {
    sqlx::query_as::<_, Question>(
        "INSERT INTO questions (user_id, subject_id, topic_id, prompt, answer, marks, difficulty) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING id, user_id, subject_id, topic_id, prompt, answer, marks, difficulty, \
                   created_at, updated_at",
    )
    .bind(params.user_id)
    .bind(params.subject_id)
    .bind(params.topic_id)
    .bind(params.prompt)
    .bind(params.answer)
    .bind(params.marks)
    .bind(params.difficulty)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &SqlitePool,
    id: i64,
) -> sqlx::Result<Option<QuestionDetailRow>> {
    sqlx::query_as::<_, QuestionDetailRow>(&format!(
        "SELECT {COLUMNS}, s.name AS subject_name, t.name AS topic_name \
         FROM questions q \
         JOIN subjects s ON s.id = q.subject_id \
         JOIN topics t ON t.id = q.topic_id \
         WHERE q.id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn update(
    pool: &SqlitePool,
    id: i64,
    params: UpdateQuestion<'_>,
) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        "UPDATE questions SET \
            topic_id = COALESCE($2, topic_id), \
            prompt = COALESCE($3, prompt), \
            answer = COALESCE($4, answer), \
            marks = COALESCE($5, marks), \
            difficulty = COALESCE($6, difficulty), \
            updated_at = CURRENT_TIMESTAMP \
         WHERE id = $1 \
         RETURNING id, user_id, subject_id, topic_id, prompt, answer, marks, difficulty, \
                   created_at, updated_at",
    )
    .bind(id)
    .bind(params.topic_id)
    .bind(params.prompt)
    .bind(params.answer)
    .bind(params.marks)
    .bind(params.difficulty)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list(
    pool: &SqlitePool,
    params: ListQuestions,
) -> sqlx::Result<Vec<QuestionListRow>> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {COLUMNS}, s.name AS subject_name, t.name AS topic_name, \
                COUNT(*) OVER() AS total_count \
         FROM questions q \
         JOIN subjects s ON s.id = q.subject_id \
         JOIN topics t ON t.id = q.topic_id \
         WHERE 1=1"
    ));

    if let Some(subject_id) = params.subject_id {
        builder.push(" AND q.subject_id = ").push_bind(subject_id);
    }
    if let Some(topic_id) = params.topic_id {
        builder.push(" AND q.topic_id = ").push_bind(topic_id);
    }
    if let Some(marks) = params.marks {
        builder.push(" AND q.marks = ").push_bind(marks);
    }
    if let Some(user_id) = params.user_id {
        builder.push(" AND q.user_id = ").push_bind(user_id);
    }

    builder
        .push(" ORDER BY q.id")
        .push(" LIMIT ")
        .push_bind(params.limit.clamp(1, 500))
        .push(" OFFSET ")
        .push_bind(params.skip.max(0));

    builder.build_query_as::<QuestionListRow>().fetch_all(pool).await
}

/// Per-mark pool sizes for a subject restricted to the given topics.
pub(crate) async fn count_by_marks(
    pool: &SqlitePool,
    subject_id: i64,
    topic_ids: &[i64],
) -> sqlx::Result<Vec<(i64, i64)>> {
    if topic_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT marks, COUNT(*) FROM questions WHERE subject_id = ");
    builder.push_bind(subject_id).push(" AND topic_id IN (");
    let mut separated = builder.separated(", ");
    for id in topic_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
    builder.push(" GROUP BY marks");

    builder.build_query_as::<(i64, i64)>().fetch_all(pool).await
}

/// Full candidate pool for a subject restricted to the given topics.
pub(crate) async fn list_pool(
    pool: &SqlitePool,
    subject_id: i64,
    topic_ids: &[i64],
) -> sqlx::Result<Vec<Question>> {
    if topic_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT id, user_id, subject_id, topic_id, prompt, answer, marks, difficulty, \
                created_at, updated_at \
         FROM questions WHERE subject_id = ",
    );
    builder.push_bind(subject_id).push(" AND topic_id IN (");
    let mut separated = builder.separated(", ");
    for id in topic_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
    builder.push(" ORDER BY id");

    builder.build_query_as::<Question>().fetch_all(pool).await
}

/// Fetches the surviving subset of `ids`; callers restore their own order.
pub(crate) async fn list_by_ids(pool: &SqlitePool, ids: &[i64]) -> sqlx::Result<Vec<Question>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT id, user_id, subject_id, topic_id, prompt, answer, marks, difficulty, \
                created_at, updated_at \
         FROM questions WHERE id IN (",
    );
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    builder.build_query_as::<Question>().fetch_all(pool).await
}
