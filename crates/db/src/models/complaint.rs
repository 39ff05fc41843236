//! Complaint entity models and DTOs.
//!
//! A complaint row plus its two append-only child collections: the
//! comment/reply thread and the status-history audit trail.

use std::collections::BTreeMap;

use redress_core::complaint::{ComplaintStatus, Priority};
use redress_core::error::CoreError;
use redress_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `complaints` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Complaint {
    pub id: DbId,
    pub reference: String,
    pub owner_id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub assigned_to: Option<String>,
    pub resolution: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Complaint {
    /// Parse the stored status.
    ///
    /// The column is constrained by `chk_complaints_status`, so a parse
    /// failure means the row was written outside this service.
    pub fn current_status(&self) -> Result<ComplaintStatus, CoreError> {
        self.status.parse().map_err(|_| {
            CoreError::Internal(format!(
                "Complaint {} has unknown status '{}'",
                self.id, self.status
            ))
        })
    }
}

/// A row from the `complaint_comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ComplaintComment {
    pub id: DbId,
    pub complaint_id: DbId,
    pub author_id: DbId,
    /// `comment` (owner) or `reply` (admin).
    pub kind: String,
    pub message: String,
    pub created_at: Timestamp,
}

/// A row from the `complaint_status_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusHistoryEntry {
    pub id: DbId,
    pub complaint_id: DbId,
    pub status: String,
    pub previous_status: String,
    pub actor_id: DbId,
    pub note: Option<String>,
    pub created_at: Timestamp,
}

/// A complaint with its full comment thread and status history, both in
/// insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintDetail {
    #[serde(flatten)]
    pub complaint: Complaint,
    pub comments: Vec<ComplaintComment>,
    pub status_history: Vec<StatusHistoryEntry>,
}

/// Number of complaints currently in one status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Build a `{status -> count}` histogram with every status present.
pub fn status_histogram(counts: &[StatusCount]) -> BTreeMap<String, i64> {
    let mut histogram: BTreeMap<String, i64> = ComplaintStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    for c in counts {
        *histogram.entry(c.status.clone()).or_insert(0) += c.count;
    }
    histogram
}

/// Query-layer filter for complaint listings.
///
/// `owner_id` is the ownership scope: `Some` restricts results to one
/// owner, `None` means all complaints (admin views only).
#[derive(Debug, Clone, Default)]
pub struct ComplaintFilter {
    pub owner_id: Option<DbId>,
    pub status: Option<ComplaintStatus>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
}

impl ComplaintFilter {
    /// Whether `complaint` satisfies every set criterion.
    pub fn matches(&self, complaint: &Complaint) -> bool {
        self.owner_id.map_or(true, |owner| complaint.owner_id == owner)
            && self.status.map_or(true, |s| complaint.status == s.as_str())
            && self
                .category
                .as_deref()
                .map_or(true, |c| complaint.category == c)
            && self
                .priority
                .map_or(true, |p| complaint.priority == p.as_str())
    }
}

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// DTO for submitting a new complaint.
#[derive(Debug, Deserialize)]
pub struct CreateComplaint {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub priority: Option<String>,
}

/// DTO for an owner editing the descriptive fields of a complaint.
#[derive(Debug, Deserialize)]
pub struct UpdateComplaint {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// DTO for a combined admin triage update.
#[derive(Debug, Deserialize)]
pub struct TriageComplaint {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assigned_to: Option<String>,
    pub resolution: Option<String>,
    pub note: Option<String>,
}

/// DTO for changing a complaint's status.
#[derive(Debug, Deserialize)]
pub struct UpdateComplaintStatus {
    pub status: String,
    pub note: Option<String>,
    pub resolution: Option<String>,
}

/// DTO for assigning a complaint to a staff member or department.
#[derive(Debug, Deserialize)]
pub struct AssignComplaint {
    pub assigned_to: String,
}

/// DTO for appending a comment or reply.
#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub message: String,
}

/// Query parameters for complaint listings.
#[derive(Debug, Default, Deserialize)]
pub struct ComplaintListParams {
    pub status: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ComplaintListParams {
    /// Parse the filter fields, scoping the result to `owner_id`.
    ///
    /// Blank values are treated as absent.
    pub fn to_filter(&self, owner_id: Option<DbId>) -> Result<ComplaintFilter, CoreError> {
        let non_blank = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let status = non_blank(&self.status)
            .map(|s| s.parse::<ComplaintStatus>())
            .transpose()?;
        let priority = non_blank(&self.priority)
            .map(|p| p.parse::<Priority>())
            .transpose()?;
        let category = non_blank(&self.category).map(|c| c.to_lowercase());

        Ok(ComplaintFilter {
            owner_id,
            status,
            category,
            priority,
        })
    }
}
