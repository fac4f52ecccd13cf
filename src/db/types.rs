use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub(crate) enum UserRole {
    Student,
    Staff,
    Admin,
}

impl UserRole {
    /// Staff privileges cover question authoring and paper generation.
    pub(crate) fn is_staff(self) -> bool {
        matches!(self, Self::Staff | Self::Admin)
    }

    pub(crate) fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}
