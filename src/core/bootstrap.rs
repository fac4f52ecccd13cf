use crate::core::{security, state::AppState};
use crate::db::types::UserRole;
use crate::repositories::users::{self, CreateUser};

/// Creates the default admin account on first start. A blank
/// `FIRST_SUPERUSER_PASSWORD` skips creation entirely.
pub(crate) async fn ensure_superuser(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.first_superuser_password.is_empty() {
        tracing::warn!("FIRST_SUPERUSER_PASSWORD is empty; skipping superuser bootstrap");
        return Ok(());
    }

    let username = admin.first_superuser_username.as_str();
    if users::find_by_username(state.db(), username).await?.is_some() {
        return Ok(());
    }

    let hashed_password = security::hash_password(&admin.first_superuser_password)?;
    let user = users::create(
        state.db(),
        CreateUser {
            username,
            hashed_password: &hashed_password,
            full_name: "Administrator",
            role: UserRole::Admin,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Created default superuser");
    Ok(())
}
