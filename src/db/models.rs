use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::UserRole;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) hashed_password: String,
    pub(crate) full_name: String,
    pub(crate) role: UserRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub(crate) struct Subject {
    pub(crate) id: i64,
    pub(crate) name: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub(crate) struct Topic {
    pub(crate) id: i64,
    pub(crate) subject_id: i64,
    pub(crate) name: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub(crate) struct Question {
    pub(crate) id: i64,
    pub(crate) user_id: Option<i64>,
    pub(crate) subject_id: i64,
    pub(crate) topic_id: i64,
    pub(crate) prompt: String,
    pub(crate) answer: Option<String>,
    pub(crate) marks: i64,
    pub(crate) difficulty: i64,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// A student's saved paper. `question_ids` is a JSON array of question ids in
/// paper order; questions may have been deleted since the paper was saved.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub(crate) struct GeneratedPaper {
    pub(crate) id: i64,
    pub(crate) student_id: i64,
    pub(crate) title: String,
    pub(crate) total_marks: i64,
    pub(crate) question_count: i64,
    pub(crate) question_ids: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}
