//! Admin-only account management.

use axum::extract::State;
use axum::Json;
use redress_core::pagination::{Page, PageRequest};
use redress_db::models::user::UserResponse;
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::AppQuery;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Query parameters for `GET /admin/users`.
#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/v1/admin/users
///
/// All accounts, newest first, paginated.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserListParams>,
) -> AppResult<Json<Page<UserResponse>>> {
    let request = PageRequest::new(params.page, params.limit);

    let users = state
        .users
        .list_users(request.limit, request.offset())
        .await?;
    let total = state.users.count_users().await?;

    let data = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(Page::new(data, total, request)))
}
