//! Complaint lifecycle: status transition policy and admin triage planning.
//!
//! A triage request (status, priority, assignment, resolution, note) is
//! validated in isolation by [`Triage::from_input`] and then checked against
//! the complaint's current status by [`Triage::plan`]. The resulting
//! [`TriagePlan`] is what the store applies atomically; when it carries a
//! [`StatusTransition`], exactly one status-history entry is appended.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::complaint::{ComplaintStatus, Priority};
use crate::error::{CoreError, FieldViolation};
use crate::validation;

// ---------------------------------------------------------------------------
// Transition policy
// ---------------------------------------------------------------------------

/// Which status transitions admins may perform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Any status may move to any status, including itself.
    #[default]
    Unrestricted,
    /// Status may only stay put or move forward
    /// (`Pending -> InProgress -> Resolved`, skipping allowed).
    ForwardOnly,
}

impl TransitionPolicy {
    pub fn allows(self, from: ComplaintStatus, to: ComplaintStatus) -> bool {
        match self {
            TransitionPolicy::Unrestricted => true,
            TransitionPolicy::ForwardOnly => to.rank() >= from.rank(),
        }
    }

    /// Validate that moving from `from` to `to` is permitted.
    pub fn check(self, from: ComplaintStatus, to: ComplaintStatus) -> Result<(), CoreError> {
        if self.allows(from, to) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Cannot transition complaint from '{from}' to '{to}' under the {self} policy"
            )))
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransitionPolicy::Unrestricted => "unrestricted",
            TransitionPolicy::ForwardOnly => "forward_only",
        }
    }
}

impl fmt::Display for TransitionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "unrestricted" => Ok(TransitionPolicy::Unrestricted),
            "forward_only" => Ok(TransitionPolicy::ForwardOnly),
            other => Err(format!(
                "unknown transition policy '{other}' (expected 'unrestricted' or 'forward_only')"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Triage
// ---------------------------------------------------------------------------

/// A validated admin update, not yet checked against the current status.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct Triage {
    pub status: Option<ComplaintStatus>,
    pub priority: Option<Priority>,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Assignee must be between 1 and 100 characters"
    ))]
    pub assigned_to: Option<String>,
    #[validate(length(
        min = 1,
        max = 2000,
        message = "Resolution must be between 1 and 2000 characters"
    ))]
    pub resolution: Option<String>,
    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}

impl Triage {
    /// Parse and validate raw triage fields, reporting every violation.
    ///
    /// Blank notes are dropped. A note without a status change is rejected
    /// because notes only live on status-history entries.
    pub fn from_input(
        status: Option<&str>,
        priority: Option<&str>,
        assigned_to: Option<&str>,
        resolution: Option<&str>,
        note: Option<&str>,
    ) -> Result<Self, CoreError> {
        let mut violations = Vec::new();

        let status = status.and_then(|raw| match raw.parse::<ComplaintStatus>() {
            Ok(s) => Some(s),
            Err(_) => {
                violations.push(FieldViolation::new(
                    "status",
                    "Status must be one of: Pending, InProgress, Resolved",
                ));
                None
            }
        });

        let priority = priority.and_then(|raw| match raw.parse::<Priority>() {
            Ok(p) => Some(p),
            Err(_) => {
                violations.push(FieldViolation::new(
                    "priority",
                    "Priority must be one of: Low, Medium, High, Urgent",
                ));
                None
            }
        });

        let note = note
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        let triage = Self {
            status,
            priority,
            assigned_to: assigned_to.map(|a| a.trim().to_string()),
            resolution: resolution.map(|r| r.trim().to_string()),
            note,
        };

        violations.extend(validation::violations(&triage));
        validation::finish(violations)?;

        if triage.is_empty() && triage.note.is_none() {
            return Err(CoreError::Validation(
                "At least one of status, priority, assigned_to or resolution must be provided"
                    .into(),
            ));
        }
        if triage.note.is_some() && triage.status.is_none() {
            return Err(CoreError::Validation(
                "A note can only accompany a status change".into(),
            ));
        }

        Ok(triage)
    }

    /// Whether no field would change.
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.assigned_to.is_none()
            && self.resolution.is_none()
    }

    /// Check the update against the complaint's current status.
    ///
    /// - The status change (if any) must be allowed by `policy`.
    /// - A resolution may only be recorded when the resulting status is
    ///   `Resolved`.
    pub fn plan(
        self,
        current: ComplaintStatus,
        policy: TransitionPolicy,
    ) -> Result<TriagePlan, CoreError> {
        if let Some(to) = self.status {
            policy.check(current, to)?;
        }

        let resulting = self.status.unwrap_or(current);
        if self.resolution.is_some() && resulting != ComplaintStatus::Resolved {
            return Err(CoreError::Validation(
                "A resolution can only be recorded on a resolved complaint".into(),
            ));
        }

        let transition = self.status.map(|to| StatusTransition {
            from: current,
            to,
            note: self.note,
        });

        Ok(TriagePlan {
            expected_status: current,
            transition,
            priority: self.priority,
            assigned_to: self.assigned_to,
            resolution: self.resolution,
        })
    }
}

/// One status change, recorded verbatim in the status history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    pub from: ComplaintStatus,
    pub to: ComplaintStatus,
    pub note: Option<String>,
}

/// A triage update checked against a specific current status.
///
/// Plans that change the status or record a resolution were validated
/// against `expected_status`; stores must apply those only while the
/// complaint still has it (see [`TriagePlan::required_status`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriagePlan {
    pub expected_status: ComplaintStatus,
    pub transition: Option<StatusTransition>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<String>,
    pub resolution: Option<String>,
}

impl TriagePlan {
    /// Status the complaint will have once the plan is applied.
    pub fn resulting_status(&self) -> ComplaintStatus {
        self.transition
            .as_ref()
            .map_or(self.expected_status, |t| t.to)
    }

    /// Status the complaint must still have for the plan to apply.
    ///
    /// `None` for priority/assignment-only updates, which hold under any
    /// status.
    pub fn required_status(&self) -> Option<ComplaintStatus> {
        (self.transition.is_some() || self.resolution.is_some()).then_some(self.expected_status)
    }

    /// Whether the stored resolution must be dropped: the complaint is
    /// moving to a status other than `Resolved`.
    pub fn clears_resolution(&self) -> bool {
        self.transition.is_some() && self.resulting_status() != ComplaintStatus::Resolved
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
