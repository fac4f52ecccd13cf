use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::GeneratedPaper;
use crate::paper::catalog::TemplateKind;
use crate::paper::sufficiency::TierSufficiency;
use crate::paper::Block;
use crate::schemas::question::QuestionBrief;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SufficiencyRequest {
    pub(crate) subject_id: i64,
    pub(crate) template: TemplateKind,
    #[validate(length(min = 1, max = 100))]
    pub(crate) topic_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SufficiencyResponse {
    pub(crate) template: TemplateKind,
    pub(crate) satisfied: bool,
    pub(crate) tiers: Vec<TierSufficiency>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct GenerateRequest {
    pub(crate) subject_id: i64,
    pub(crate) template: TemplateKind,
    #[validate(length(min = 1, max = 100))]
    pub(crate) topic_ids: Vec<i64>,
    #[validate(length(min = 1, max = 200))]
    pub(crate) title: String,
    #[validate(length(max = 200))]
    pub(crate) subtitle: Option<String>,
    /// Fixes the draw for reproducible papers; omitted means random.
    pub(crate) seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PaperResponse {
    pub(crate) title: String,
    pub(crate) subtitle: String,
    pub(crate) template: TemplateKind,
    pub(crate) sufficiency: Vec<TierSufficiency>,
    pub(crate) blocks: Vec<Block>,
    pub(crate) pages: Vec<Vec<String>>,
    pub(crate) question_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) saved_paper_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct GeneratedPaperCreate {
    #[validate(length(min = 1, max = 200))]
    pub(crate) title: String,
    #[validate(length(max = 500))]
    pub(crate) question_ids: Vec<i64>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub(crate) struct GeneratedPaperUpdate {
    #[validate(length(min = 1, max = 200))]
    pub(crate) title: Option<String>,
    #[validate(length(max = 500))]
    pub(crate) question_ids: Option<Vec<i64>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GeneratedPaperSummary {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) total_marks: i64,
    pub(crate) question_count: i64,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl GeneratedPaperSummary {
    pub(crate) fn from_db(paper: GeneratedPaper) -> Self {
        Self {
            id: paper.id,
            title: paper.title,
            total_marks: paper.total_marks,
            question_count: paper.question_count,
            created_at: format_primitive(paper.created_at),
            updated_at: format_primitive(paper.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GeneratedPaperDetail {
    #[serde(flatten)]
    pub(crate) summary: GeneratedPaperSummary,
    /// Questions still present in the bank, in saved paper order.
    pub(crate) questions: Vec<QuestionBrief>,
    /// How many saved ids no longer resolve.
    pub(crate) missing_count: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct RenderedPaperResponse {
    pub(crate) title: String,
    pub(crate) pages: Vec<Vec<String>>,
}
