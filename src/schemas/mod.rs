pub(crate) mod auth;
pub(crate) mod paper;
pub(crate) mod question;
pub(crate) mod user;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct RootResponse {
    pub(crate) name: String,
    pub(crate) version: String,
    pub(crate) docs: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) database: &'static str,
}
