use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SignupRequest {
    #[validate(length(min = 3, max = 32))]
    pub(crate) username: String,
    #[validate(length(min = 8, max = 128))]
    pub(crate) password: String,
    #[validate(length(min = 1, max = 128))]
    pub(crate) full_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    pub(crate) token_type: &'static str,
}

impl TokenResponse {
    pub(crate) fn bearer(access_token: String) -> Self {
        Self { access_token, token_type: "bearer" }
    }
}
