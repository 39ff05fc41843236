//! Admin-only gate.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use redress_core::access::ensure_admin;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An [`AuthUser`] holding the `admin` role; anyone else gets 403.
///
/// Authentication is checked first, so a missing token is still 401.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = AuthUser::from_request_parts(parts, state).await?;
        ensure_admin(&caller.role)?;
        Ok(Self(caller))
    }
}
