use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::User;
use crate::db::types::UserRole;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AdminUserCreate {
    #[validate(length(min = 3, max = 32))]
    pub(crate) username: String,
    #[validate(length(min = 8, max = 128))]
    pub(crate) password: String,
    #[validate(length(min = 1, max = 128))]
    pub(crate) full_name: String,
    pub(crate) role: UserRole,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub(crate) struct AdminUserUpdate {
    #[validate(length(min = 8, max = 128))]
    pub(crate) password: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub(crate) full_name: Option<String>,
    pub(crate) role: Option<UserRole>,
    pub(crate) is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserListQuery {
    pub(crate) role: Option<UserRole>,
    pub(crate) username: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) full_name: String,
    pub(crate) role: UserRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl UserResponse {
    pub(crate) fn from_db(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            role: user.role,
            is_active: user.is_active,
            created_at: format_primitive(user.created_at),
            updated_at: format_primitive(user.updated_at),
        }
    }
}
