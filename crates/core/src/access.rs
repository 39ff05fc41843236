//! Ownership and role checks for complaint access.
//!
//! Single-record reads and every mutation go through [`ensure_can_access`]
//! after the record is loaded. Collection queries never load-then-filter;
//! they bake [`owner_scope`] into the query instead.

use crate::error::CoreError;
use crate::roles::is_admin;
use crate::types::DbId;

/// Admins may access any complaint; everyone else only their own.
pub fn ensure_can_access(
    caller_id: DbId,
    caller_role: &str,
    owner_id: DbId,
) -> Result<(), CoreError> {
    if is_admin(caller_role) || caller_id == owner_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "You can only access your own complaints".into(),
        ))
    }
}

/// Gate for admin-only operations.
pub fn ensure_admin(caller_role: &str) -> Result<(), CoreError> {
    if is_admin(caller_role) {
        Ok(())
    } else {
        Err(CoreError::Forbidden("Admin role required".into()))
    }
}

/// Owner filter for scoped collection queries (dashboard, self listing).
///
/// Returns `None` (no restriction) for admins.
pub fn owner_scope(caller_id: DbId, caller_role: &str) -> Option<DbId> {
    if is_admin(caller_role) {
        None
    } else {
        Some(caller_id)
    }
}
