//! Startup provisioning.

use redress_core::account::Registration;
use redress_core::roles::ROLE_ADMIN;
use redress_db::models::user::CreateUser;

use crate::auth::password::hash_password;
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Ensure the configured admin account exists.
///
/// An existing account with the same email is left untouched, whatever its
/// role or password.
pub async fn ensure_admin(state: &AppState, admin: &BootstrapAdmin) -> AppResult<()> {
    let registration = Registration::from_input("Administrator", &admin.email, &admin.password)?;

    if let Some(existing) = state.users.find_user_by_email(&registration.email).await? {
        tracing::info!(user_id = existing.id, role = %existing.role, "Bootstrap admin already present");
        return Ok(());
    }

    let password_hash = hash_password(&registration.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let created = state
        .users
        .create_user(&CreateUser {
            name: registration.name,
            email: registration.email,
            password_hash,
            role: ROLE_ADMIN.to_string(),
        })
        .await?;

    match created {
        Some(user) => tracing::info!(user_id = user.id, "Bootstrap admin created"),
        // Lost a race with another instance.
        None => tracing::info!("Bootstrap admin created concurrently"),
    }
    Ok(())
}
