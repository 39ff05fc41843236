//! Ownership guard for single-complaint routes.

use redress_core::access::ensure_can_access;
use redress_core::types::DbId;
use redress_db::models::complaint::Complaint;

use super::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Load a complaint and check that `auth` may access it.
///
/// Fails with 404 if it does not exist, then 403 unless the caller is an
/// admin or the owner.
pub async fn load_authorized(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<Complaint> {
    let complaint = state
        .complaints
        .find_complaint(id)
        .await?
        .ok_or_else(|| AppError::not_found("Complaint", id))?;

    authorize(auth, complaint)
}

/// Check access to an already-loaded complaint.
pub fn authorize(auth: &AuthUser, complaint: Complaint) -> AppResult<Complaint> {
    ensure_can_access(auth.user_id, &auth.role, complaint.owner_id)?;
    Ok(complaint)
}
