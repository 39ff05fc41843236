//! Mounted at `/admin` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// ```text
/// GET    /users    -> list_users (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/users", get(admin::list_users))
}
