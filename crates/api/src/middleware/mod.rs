//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`guard::load_authorized`] -- Loads a complaint the caller may access.

pub mod auth;
pub mod guard;
pub mod rbac;
