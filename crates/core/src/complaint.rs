//! Complaint status/priority vocabularies, content constraints, and
//! reference code generation.
//!
//! Statuses and priorities are persisted as their canonical strings
//! (`as_str`). Parsing is lenient about case and separators so that
//! `"In Progress"`, `"in-progress"` and `"InProgress"` all resolve to the
//! same status.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{CoreError, FieldViolation};
use crate::types::Timestamp;
use crate::validation;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Category used when the submitter leaves it blank.
pub const DEFAULT_CATEGORY: &str = "other";

/// Prefix of every complaint reference code (`CMP-123456-A1B2C3`).
pub const REFERENCE_PREFIX: &str = "CMP";

/// Lowercase a value and drop separators so loose spellings compare equal.
fn normalize_token(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Where a complaint sits in its handling lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [ComplaintStatus; 3] = [
        ComplaintStatus::Pending,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "Pending",
            ComplaintStatus::InProgress => "InProgress",
            ComplaintStatus::Resolved => "Resolved",
        }
    }

    /// Position in the forward lifecycle (`Pending` = 0).
    pub fn rank(self) -> u8 {
        match self {
            ComplaintStatus::Pending => 0,
            ComplaintStatus::InProgress => 1,
            ComplaintStatus::Resolved => 2,
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "pending" => Ok(ComplaintStatus::Pending),
            "inprogress" => Ok(ComplaintStatus::InProgress),
            "resolved" => Ok(ComplaintStatus::Resolved),
            _ => Err(CoreError::Validation(format!(
                "Invalid complaint status '{s}'. Must be one of: Pending, InProgress, Resolved"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Urgency assigned by the submitter and adjustable by admins.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            // Older clients submitted "Critical" for the top tier.
            "urgent" | "critical" => Ok(Priority::Urgent),
            _ => Err(CoreError::Validation(format!(
                "Invalid priority '{s}'. Must be one of: Low, Medium, High, Urgent"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// A validated, normalized complaint submission ready to be stored.
#[derive(Debug, Clone, Validate)]
pub struct ComplaintDraft {
    #[validate(length(
        min = 3,
        max = 200,
        message = "Title must be between 3 and 200 characters"
    ))]
    pub title: String,
    #[validate(length(
        min = 10,
        max = 2000,
        message = "Description must be between 10 and 2000 characters"
    ))]
    pub description: String,
    #[validate(length(
        min = 1,
        max = 50,
        message = "Category must be between 1 and 50 characters"
    ))]
    pub category: String,
    pub priority: Priority,
}

impl ComplaintDraft {
    /// Trim, default and validate raw submission fields.
    ///
    /// Every violated constraint is reported in a single
    /// [`CoreError::InvalidFields`], not just the first one found.
    pub fn from_input(
        title: &str,
        description: &str,
        category: Option<&str>,
        priority: Option<&str>,
    ) -> Result<Self, CoreError> {
        let mut violations = Vec::new();

        let priority = match priority.map(str::trim).filter(|p| !p.is_empty()) {
            None => Priority::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                violations.push(FieldViolation::new(
                    "priority",
                    "Priority must be one of: Low, Medium, High, Urgent",
                ));
                Priority::default()
            }),
        };

        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
            .to_lowercase();

        let draft = Self {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            category,
            priority,
        };

        violations.extend(validation::violations(&draft));
        validation::finish(violations)?;
        Ok(draft)
    }
}

/// Owner edits to the descriptive fields of an unresolved complaint.
#[derive(Debug, Clone, Default, Validate)]
pub struct ContentEdit {
    #[validate(length(
        min = 3,
        max = 200,
        message = "Title must be between 3 and 200 characters"
    ))]
    pub title: Option<String>,
    #[validate(length(
        min = 10,
        max = 2000,
        message = "Description must be between 10 and 2000 characters"
    ))]
    pub description: Option<String>,
    #[validate(length(
        min = 1,
        max = 50,
        message = "Category must be between 1 and 50 characters"
    ))]
    pub category: Option<String>,
}

impl ContentEdit {
    pub fn from_input(
        title: Option<&str>,
        description: Option<&str>,
        category: Option<&str>,
    ) -> Result<Self, CoreError> {
        let edit = Self {
            title: title.map(|t| t.trim().to_string()),
            description: description.map(|d| d.trim().to_string()),
            category: category.map(|c| c.trim().to_lowercase()),
        };

        if edit.is_empty() {
            return Err(CoreError::Validation(
                "At least one of title, description or category must be provided".into(),
            ));
        }

        validation::finish(validation::violations(&edit))?;
        Ok(edit)
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.category.is_none()
    }
}

/// Owners may only edit complaints that have not been resolved yet.
pub fn ensure_editable(status: ComplaintStatus) -> Result<(), CoreError> {
    if status == ComplaintStatus::Resolved {
        return Err(CoreError::Conflict(
            "Resolved complaints can no longer be edited".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Reference codes
// ---------------------------------------------------------------------------

/// Generate a human-readable complaint reference such as `CMP-482913-9F3A0C`.
///
/// The middle segment is the last six digits of the creation time in
/// milliseconds, the tail is 24 random bits. Uniqueness is enforced by the
/// store (`uq_complaints_reference`), which regenerates on collision.
pub fn generate_reference(now: Timestamp) -> String {
    let millis = now.timestamp_millis().rem_euclid(1_000_000);
    let suffix: u32 = rand::rng().random_range(0..0x0100_0000);
    format!("{REFERENCE_PREFIX}-{millis:06}-{suffix:06X}")
}

/// Whether `value` has the shape produced by [`generate_reference`].
pub fn is_valid_reference(value: &str) -> bool {
    let mut parts = value.split('-');
    let (Some(prefix), Some(stamp), Some(suffix), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    prefix == REFERENCE_PREFIX
        && stamp.len() == 6
        && stamp.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == 6
        && suffix
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
