//! Comment/reply message rules.
//!
//! Owners write comments, admins write replies; both land in the same
//! append-only thread and differ only in [`CommentKind`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::is_admin;

/// Maximum length of a comment or reply, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    /// Written by the complaint owner.
    Comment,
    /// Written by an administrator.
    Reply,
}

impl CommentKind {
    /// Kind of entry written by an author with the given role.
    pub fn for_role(role: &str) -> Self {
        if is_admin(role) {
            CommentKind::Reply
        } else {
            CommentKind::Comment
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CommentKind::Comment => "comment",
            CommentKind::Reply => "reply",
        }
    }
}

impl fmt::Display for CommentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trim a message and check it is non-empty and within the length cap.
pub fn normalize_message(raw: &str) -> Result<String, CoreError> {
    let message = raw.trim();
    if message.is_empty() {
        return Err(CoreError::Validation("Comment message is required".into()));
    }
    let length = message.chars().count();
    if length > MAX_MESSAGE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment exceeds maximum length of {MAX_MESSAGE_LENGTH} characters (got {length})"
        )));
    }
    Ok(message.to_string())
}
