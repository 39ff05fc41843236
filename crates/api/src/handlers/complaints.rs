//! Handlers for the `/complaints` resource.
//!
//! Users submit complaints, read and edit their own, and comment on them.
//! Admins see everything and drive the lifecycle: status, priority,
//! assignment, resolution and replies. Every single-record route runs the
//! ownership guard; listings bake the owner scope into the query.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use redress_core::access::{ensure_can_access, owner_scope};
use redress_core::comment::{normalize_message, CommentKind};
use redress_core::complaint::{
    ensure_editable, is_valid_reference, ComplaintDraft, ComplaintStatus, ContentEdit,
};
use redress_core::error::CoreError;
use redress_core::lifecycle::Triage;
use redress_core::pagination::{Page, PageRequest};
use redress_core::types::DbId;
use redress_db::models::complaint::{
    status_histogram, AssignComplaint, Complaint, ComplaintDetail, ComplaintFilter,
    ComplaintListParams, CreateComment, CreateComplaint, TriageComplaint, UpdateComplaint,
    UpdateComplaintStatus,
};
use redress_db::store::WriteOutcome;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::guard::load_authorized;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, HistogramPage};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /complaints
// ---------------------------------------------------------------------------

/// Submit a new complaint owned by the caller.
pub async fn create_complaint(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateComplaint>,
) -> AppResult<impl IntoResponse> {
    let draft = ComplaintDraft::from_input(
        &input.title,
        &input.description,
        input.category.as_deref(),
        input.priority.as_deref(),
    )?;

    let complaint = state.complaints.create_complaint(auth.user_id, &draft).await?;

    tracing::info!(
        complaint_id = complaint.id,
        reference = %complaint.reference,
        user_id = auth.user_id,
        "Complaint submitted",
    );

    let detail = ComplaintDetail {
        complaint,
        comments: Vec::new(),
        status_history: Vec::new(),
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

// ---------------------------------------------------------------------------
// GET /complaints, GET /complaints/all
// ---------------------------------------------------------------------------

/// List the caller's own complaints, newest first.
pub async fn list_my_complaints(
    auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ComplaintListParams>,
) -> AppResult<Json<Page<Complaint>>> {
    let filter = params.to_filter(Some(auth.user_id))?;
    let request = PageRequest::new(params.page, params.limit);

    let complaints = state
        .complaints
        .list_complaints(&filter, request.limit, request.offset())
        .await?;
    let total = state.complaints.count_complaints(&filter).await?;

    Ok(Json(Page::new(complaints, total, request)))
}

/// List every complaint with a status histogram over the same filters.
/// Admin only.
pub async fn list_all_complaints(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ComplaintListParams>,
) -> AppResult<Json<HistogramPage<Complaint>>> {
    let filter = params.to_filter(None)?;
    let request = PageRequest::new(params.page, params.limit);

    let complaints = state
        .complaints
        .list_complaints(&filter, request.limit, request.offset())
        .await?;
    let total = state.complaints.count_complaints(&filter).await?;
    let counts = state.complaints.count_by_status(&filter).await?;

    Ok(Json(HistogramPage {
        page: Page::new(complaints, total, request),
        histogram: status_histogram(&counts),
    }))
}

// ---------------------------------------------------------------------------
// GET /complaints/dashboard
// ---------------------------------------------------------------------------

/// Dashboard counters plus the most recent complaints.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub resolved: i64,
    pub recent: Vec<Complaint>,
}

/// Counters and recent complaints: the caller's own for users, global for
/// admins.
pub async fn dashboard(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let filter = ComplaintFilter {
        owner_id: owner_scope(auth.user_id, &auth.role),
        ..Default::default()
    };

    let histogram = status_histogram(&state.complaints.count_by_status(&filter).await?);
    let count = |status: ComplaintStatus| histogram.get(status.as_str()).copied().unwrap_or(0);

    let recent = state
        .complaints
        .list_complaints(&filter, state.config.dashboard_recent_limit, 0)
        .await?;

    let stats = DashboardStats {
        total: histogram.values().sum(),
        pending: count(ComplaintStatus::Pending),
        in_progress: count(ComplaintStatus::InProgress),
        resolved: count(ComplaintStatus::Resolved),
        recent,
    };
    Ok(Json(DataResponse { data: stats }))
}

// ---------------------------------------------------------------------------
// GET /complaints/{id}, GET /complaints/by-reference/{reference}
// ---------------------------------------------------------------------------

/// Get a complaint with its comments and status history.
pub async fn get_complaint(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ComplaintDetail>>> {
    let detail = state
        .complaints
        .load_detail(id)
        .await?
        .ok_or_else(|| AppError::not_found("Complaint", id))?;

    ensure_can_access(auth.user_id, &auth.role, detail.complaint.owner_id)?;

    Ok(Json(DataResponse { data: detail }))
}

/// Look a complaint up by its reference code (case-insensitive).
pub async fn get_complaint_by_reference(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> AppResult<Json<DataResponse<ComplaintDetail>>> {
    let reference = reference.trim().to_ascii_uppercase();
    if !is_valid_reference(&reference) {
        return Err(AppError::BadRequest(format!(
            "'{reference}' is not a valid complaint reference"
        )));
    }

    let complaint = state
        .complaints
        .find_complaint_by_reference(&reference)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Complaint {reference} not found")))?;

    ensure_can_access(auth.user_id, &auth.role, complaint.owner_id)?;

    let detail = state
        .complaints
        .load_detail(complaint.id)
        .await?
        .ok_or_else(|| AppError::not_found("Complaint", complaint.id))?;
    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// PUT /complaints/{id}
// ---------------------------------------------------------------------------

/// Edit title, description or category while the complaint is unresolved.
pub async fn update_complaint(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateComplaint>,
) -> AppResult<Json<DataResponse<Complaint>>> {
    let current = load_authorized(&state, &auth, id).await?;
    let edit = ContentEdit::from_input(
        input.title.as_deref(),
        input.description.as_deref(),
        input.category.as_deref(),
    )?;
    ensure_editable(current.current_status()?)?;

    match state.complaints.update_content(id, &edit).await? {
        WriteOutcome::Applied(updated) => {
            tracing::info!(complaint_id = id, user_id = auth.user_id, "Complaint edited");
            Ok(Json(DataResponse { data: updated }))
        }
        // Resolved between the check and the write.
        WriteOutcome::Conflict => Err(AppError::Core(CoreError::Conflict(
            "Resolved complaints can no longer be edited".into(),
        ))),
        WriteOutcome::NotFound => Err(AppError::not_found("Complaint", id)),
    }
}

// ---------------------------------------------------------------------------
// PATCH /complaints/{id}, PUT /complaints/{id}/status, PUT /complaints/{id}/assign
// ---------------------------------------------------------------------------

/// Combined admin update of status, priority, assignment, resolution and
/// note.
pub async fn triage_complaint(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<TriageComplaint>,
) -> AppResult<Json<DataResponse<Complaint>>> {
    let current = load_authorized(&state, &admin, id).await?;
    let triage = Triage::from_input(
        input.status.as_deref(),
        input.priority.as_deref(),
        input.assigned_to.as_deref(),
        input.resolution.as_deref(),
        input.note.as_deref(),
    )?;
    apply_triage(&state, &admin, current, triage).await
}

/// Change the status, optionally with a note and (for `Resolved`) a
/// resolution. Admin only.
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateComplaintStatus>,
) -> AppResult<Json<DataResponse<Complaint>>> {
    let current = load_authorized(&state, &admin, id).await?;
    let triage = Triage::from_input(
        Some(&input.status),
        None,
        None,
        input.resolution.as_deref(),
        input.note.as_deref(),
    )?;
    apply_triage(&state, &admin, current, triage).await
}

/// Assign the complaint to a staff member or department. Admin only.
pub async fn assign_complaint(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<AssignComplaint>,
) -> AppResult<Json<DataResponse<Complaint>>> {
    let current = load_authorized(&state, &admin, id).await?;
    let triage = Triage::from_input(None, None, Some(&input.assigned_to), None, None)?;
    apply_triage(&state, &admin, current, triage).await
}

/// Plan `triage` against the loaded status and apply it atomically.
async fn apply_triage(
    state: &AppState,
    admin: &AuthUser,
    current: Complaint,
    triage: Triage,
) -> AppResult<Json<DataResponse<Complaint>>> {
    let id = current.id;
    let plan = triage.plan(current.current_status()?, state.config.transition_policy)?;

    match state.complaints.apply_triage(id, admin.user_id, &plan).await? {
        WriteOutcome::Applied(updated) => {
            if let Some(transition) = &plan.transition {
                tracing::info!(
                    complaint_id = id,
                    from = %transition.from,
                    to = %transition.to,
                    user_id = admin.user_id,
                    "Complaint status updated",
                );
            } else {
                tracing::info!(complaint_id = id, user_id = admin.user_id, "Complaint triaged");
            }
            Ok(Json(DataResponse { data: updated }))
        }
        WriteOutcome::Conflict => Err(AppError::Core(CoreError::Conflict(
            "Complaint status changed concurrently; reload and retry".into(),
        ))),
        WriteOutcome::NotFound => Err(AppError::not_found("Complaint", id)),
    }
}

// ---------------------------------------------------------------------------
// /complaints/{id}/comments, /complaints/{id}/history
// ---------------------------------------------------------------------------

/// Append a comment (owner) or reply (admin).
pub async fn add_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<CreateComment>,
) -> AppResult<impl IntoResponse> {
    load_authorized(&state, &auth, id).await?;
    let message = normalize_message(&input.message)?;

    let kind = CommentKind::for_role(&auth.role);
    let comment = state
        .complaints
        .append_comment(id, auth.user_id, kind, &message)
        .await?
        .ok_or_else(|| AppError::not_found("Complaint", id))?;

    tracing::info!(
        complaint_id = id,
        comment_id = comment.id,
        kind = %kind,
        user_id = auth.user_id,
        "Comment added",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// List comments in insertion order.
pub async fn list_comments(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_authorized(&state, &auth, id).await?;
    let comments = state.complaints.list_comments(id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// List status-history entries, oldest first.
pub async fn get_history(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_authorized(&state, &auth, id).await?;
    let history = state.complaints.list_status_history(id).await?;
    Ok(Json(DataResponse { data: history }))
}

// ---------------------------------------------------------------------------
// DELETE /complaints/{id}
// ---------------------------------------------------------------------------

/// Hard-delete a complaint with its comments and history. Admin only.
pub async fn delete_complaint(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !state.complaints.delete_complaint(id).await? {
        return Err(AppError::not_found("Complaint", id));
    }

    tracing::info!(complaint_id = id, user_id = admin.user_id, "Complaint deleted");
    Ok(StatusCode::NO_CONTENT)
}
