use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::db::models::Question;
use crate::repositories::questions;

/// Decodes a stored JSON id list. Malformed payloads resolve to an empty
/// paper rather than an error; the row stays readable either way.
pub(crate) fn parse_question_ids(raw: &str) -> Vec<i64> {
    match serde_json::from_str::<Vec<i64>>(raw) {
        Ok(ids) => ids,
        Err(err) => {
            tracing::warn!(error = %err, "Malformed question id list in stored paper");
            Vec::new()
        }
    }
}

pub(crate) fn encode_question_ids(ids: &[i64]) -> String {
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}

/// Fetches the questions behind a stored id list, preserving paper order.
/// Ids whose questions were deleted since the paper was saved are silently
/// skipped.
pub(crate) async fn resolve_questions(
    pool: &SqlitePool,
    ids: &[i64],
) -> sqlx::Result<Vec<Question>> {
    let fetched = questions::list_by_ids(pool, ids).await?;
    let mut by_id: HashMap<i64, Question> =
        fetched.into_iter().map(|question| (question.id, question)).collect();
    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

/// Marks total and question count as of the resolved snapshot.
pub(crate) fn snapshot_totals(resolved: &[Question]) -> (i64, i64) {
    let total_marks = resolved.iter().map(|question| question.marks).sum();
    (total_marks, resolved.len() as i64)
}
