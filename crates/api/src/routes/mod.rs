pub mod admin;
pub mod auth;
pub mod complaints;
pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                         register (public)
/// /auth/login                            login (public)
/// /auth/me                               current identity
///
/// /users/profile                         get, update own profile
/// /users/change-password                 change own password
///
/// /admin/users                           list users (admin only)
///
/// /complaints                            create, list own
/// /complaints/all                        list all + histogram (admin only)
/// /complaints/dashboard                  counters + recent
/// /complaints/by-reference/{reference}   get by reference code
/// /complaints/{id}                       get, edit, triage (admin), delete (admin)
/// /complaints/{id}/status                change status (admin only)
/// /complaints/{id}/assign                assign (admin only)
/// /complaints/{id}/comments              add, list comments
/// /complaints/{id}/history               status history
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/admin", admin::router())
        .nest("/complaints", complaints::router())
}
