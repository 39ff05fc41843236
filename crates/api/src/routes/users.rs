//! Mounted at `/users` by `api_routes()`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// ```text
/// GET    /profile           -> get_profile
/// PUT    /profile           -> update_profile
/// PUT    /change-password   -> change_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route("/change-password", put(users::change_password))
}
