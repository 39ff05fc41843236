//! Well-known role name constants.
//!
//! These must match the `chk_users_role` constraint in
//! `20260301000001_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// All roles a user row may carry.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_USER];

/// Whether the role name grants administrator access.
pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN
}

/// Whether `role` is one a user row may carry.
pub fn is_known_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}
