use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Question;
use crate::repositories::questions::QuestionDetailRow;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionCreate {
    #[validate(length(min = 1, max = 128))]
    pub(crate) subject: String,
    #[validate(length(min = 1, max = 128))]
    pub(crate) topic: String,
    #[serde(alias = "question")]
    #[validate(length(min = 1, max = 4000))]
    pub(crate) prompt: String,
    #[validate(length(max = 8000))]
    pub(crate) answer: Option<String>,
    pub(crate) marks: i64,
    pub(crate) difficulty: i64,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub(crate) struct QuestionUpdate {
    #[validate(length(min = 1, max = 128))]
    pub(crate) topic: Option<String>,
    #[serde(alias = "question")]
    #[validate(length(min = 1, max = 4000))]
    pub(crate) prompt: Option<String>,
    #[validate(length(max = 8000))]
    pub(crate) answer: Option<String>,
    pub(crate) marks: Option<i64>,
    pub(crate) difficulty: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionListQuery {
    pub(crate) subject_id: Option<i64>,
    pub(crate) topic_id: Option<i64>,
    pub(crate) marks: Option<i64>,
    pub(crate) mine: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionResponse {
    pub(crate) id: i64,
    pub(crate) subject_id: i64,
    pub(crate) subject: String,
    pub(crate) topic_id: i64,
    pub(crate) topic: String,
    pub(crate) prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) answer: Option<String>,
    pub(crate) marks: i64,
    pub(crate) difficulty: i64,
    pub(crate) created_by: Option<i64>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl QuestionResponse {
    /// `include_answer` is false for students browsing the bank; answers
    /// are visible to staff and to the question's owner only.
    pub(crate) fn from_row(row: QuestionDetailRow, include_answer: bool) -> Self {
        let question = row.question;
        Self {
            id: question.id,
            subject_id: question.subject_id,
            subject: row.subject_name,
            topic_id: question.topic_id,
            topic: row.topic_name,
            prompt: question.prompt,
            answer: if include_answer { question.answer } else { None },
            marks: question.marks,
            difficulty: question.difficulty,
            created_by: question.user_id,
            created_at: format_primitive(question.created_at),
            updated_at: format_primitive(question.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionBrief {
    pub(crate) id: i64,
    pub(crate) prompt: String,
    pub(crate) marks: i64,
    pub(crate) difficulty: i64,
}

impl QuestionBrief {
    pub(crate) fn from_db(question: Question) -> Self {
        Self {
            id: question.id,
            prompt: question.prompt,
            marks: question.marks,
            difficulty: question.difficulty,
        }
    }
}
