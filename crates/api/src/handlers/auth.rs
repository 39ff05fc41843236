//! Handlers for the `/auth` resource (register, login, current identity).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use redress_core::account::{normalize_email, Registration};
use redress_core::error::CoreError;
use redress_core::roles::ROLE_USER;
use redress_db::models::user::{CreateUser, User, UserResponse};
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a `user` account and log it in. Returns 201 with a token.
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let registration = Registration::from_input(&input.name, &input.email, &input.password)?;

    let password_hash = hash_password(&registration.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = state
        .users
        .create_user(&CreateUser {
            name: registration.name,
            email: registration.email,
            password_hash,
            role: ROLE_USER.to_string(),
        })
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "An account with this email already exists".into(),
            ))
        })?;

    tracing::info!(user_id = user.id, "User registered");

    let response = create_auth_response(&state, user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = state
        .users
        .find_user_by_email(&normalize_email(&input.email))
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid());
    }

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(create_auth_response(&state, user)?))
}

/// GET /api/v1/auth/me
///
/// The caller's account as stored now (role changes apply on next login).
pub async fn me(
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

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn create_auth_response(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let issued = state
        .config
        .jwt
        .issue(user.id, &user.role)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        token: issued.token,
        expires_in: issued.expires_in,
        user: user.into(),
    })
}
