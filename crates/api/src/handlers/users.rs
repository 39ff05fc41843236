//! Handlers for the caller's own account (`/users`).

use axum::extract::State;
use axum::Json;
use redress_core::account::{validate_password_change, ProfileUpdate};
use redress_core::error::CoreError;
use redress_db::models::user::UserResponse;
use redress_db::store::WriteOutcome;
use serde::Deserialize;

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Request body for `PUT /users/profile`.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Request body for `PUT /users/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// GET /api/v1/users/profile
pub async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = state
        .users
        .find_user_by_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", auth.user_id))?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// PUT /api/v1/users/profile
///
/// Update name and/or email. 409 if the email belongs to another account.
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let update = ProfileUpdate::from_input(input.name.as_deref(), input.email.as_deref())?;

    match state.users.update_profile(auth.user_id, &update).await? {
        WriteOutcome::Applied(user) => {
            tracing::info!(user_id = user.id, "Profile updated");
            Ok(Json(DataResponse { data: user.into() }))
        }
        WriteOutcome::Conflict => Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        ))),
        WriteOutcome::NotFound => Err(AppError::not_found("User", auth.user_id)),
    }
}

/// PUT /api/v1/users/change-password
///
/// Requires the current password. The new one must differ from it.
pub async fn change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    validate_password_change(&input.current_password, &input.new_password)?;

    let user = state
        .users
        .find_user_by_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", auth.user_id))?;

    let current_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Validation(
            "Current password is incorrect".into(),
        )));
    }

    let new_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    if !state.users.update_password(user.id, &new_hash).await? {
        return Err(AppError::not_found("User", user.id));
    }

    tracing::info!(user_id = user.id, "Password changed");
    Ok(Json(MessageResponse {
        message: "Password updated successfully",
    }))
}
