//! Account input rules: registration, profile edits, password changes.

use validator::Validate;

use crate::error::CoreError;
use crate::validation;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: u64 = 6;

/// Normalize an email address for storage and lookup.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A validated self-service registration.
#[derive(Debug, Clone, Validate)]
pub struct Registration {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

impl Registration {
    pub fn from_input(name: &str, email: &str, password: &str) -> Result<Self, CoreError> {
        let registration = Self {
            name: name.trim().to_string(),
            email: normalize_email(email),
            password: password.to_string(),
        };
        validation::check(&registration)?;
        Ok(registration)
    }
}

/// Changes a user may make to their own profile.
#[derive(Debug, Clone, Default, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,
}

impl ProfileUpdate {
    pub fn from_input(name: Option<&str>, email: Option<&str>) -> Result<Self, CoreError> {
        let update = Self {
            name: name.map(|n| n.trim().to_string()),
            email: email.map(normalize_email),
        };
        if update.name.is_none() && update.email.is_none() {
            return Err(CoreError::Validation(
                "At least one of name or email must be provided".into(),
            ));
        }
        validation::check(&update)?;
        Ok(update)
    }
}

/// Check a password change before the current password is verified.
///
/// The new password must meet the minimum length and differ from the
/// current one.
pub fn validate_password_change(current: &str, new: &str) -> Result<(), CoreError> {
    if (new.chars().count() as u64) < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    if current == new {
        return Err(CoreError::Validation(
            "New password must be different from current password".into(),
        ));
    }
    Ok(())
}
