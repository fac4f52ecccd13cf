use serde::{Deserialize, Serialize};

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageParams {
    #[serde(default)]
    pub(crate) skip: i64,
    #[serde(default = "default_limit")]
    pub(crate) limit: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct PaginatedResponse<T> {
    pub(crate) items: Vec<T>,
    pub(crate) total: i64,
    pub(crate) skip: i64,
    pub(crate) limit: i64,
}

impl<T> PaginatedResponse<T> {
    pub(crate) fn new(items: Vec<T>, total: i64, params: &PageParams) -> Self {
        Self { items, total, skip: params.skip.max(0), limit: params.limit.clamp(1, 500) }
    }
}
