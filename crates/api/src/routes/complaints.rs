//! Route definitions for complaints.
//!
//! Mounted at `/complaints` by `api_routes()`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::complaints;
use crate::state::AppState;

/// Complaint routes.
///
/// ```text
/// POST   /                          -> create_complaint
/// GET    /                          -> list_my_complaints
/// GET    /all                       -> list_all_complaints (admin only)
/// GET    /dashboard                 -> dashboard
/// GET    /by-reference/{reference}  -> get_complaint_by_reference
/// GET    /{id}                      -> get_complaint
/// PUT    /{id}                      -> update_complaint
/// PATCH  /{id}                      -> triage_complaint (admin only)
/// DELETE /{id}                      -> delete_complaint (admin only)
/// PUT    /{id}/status               -> update_status (admin only)
/// PUT    /{id}/assign               -> assign_complaint (admin only)
/// POST   /{id}/comments             -> add_comment
/// GET    /{id}/comments             -> list_comments
/// GET    /{id}/history              -> get_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(complaints::create_complaint).get(complaints::list_my_complaints),
        )
        .route("/all", get(complaints::list_all_complaints))
        .route("/dashboard", get(complaints::dashboard))
        .route(
            "/by-reference/{reference}",
            get(complaints::get_complaint_by_reference),
        )
        .route(
            "/{id}",
            get(complaints::get_complaint)
                .put(complaints::update_complaint)
                .patch(complaints::triage_complaint)
                .delete(complaints::delete_complaint),
        )
        .route("/{id}/status", put(complaints::update_status))
        .route("/{id}/assign", put(complaints::assign_complaint))
        .route(
            "/{id}/comments",
            post(complaints::add_comment).get(complaints::list_comments),
        )
        .route("/{id}/history", get(complaints::get_history))
}
