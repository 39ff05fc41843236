//! Bridges `validator` derive output into [`CoreError`].
//!
//! Field errors are flattened into [`FieldViolation`]s and sorted by field
//! name so responses are stable regardless of hash-map iteration order.

use validator::{Validate, ValidationErrors};

use crate::error::{CoreError, FieldViolation};

/// Run the derived validations on `input` and collect every violation.
pub fn violations(input: &impl Validate) -> Vec<FieldViolation> {
    match input.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => flatten(&errors),
    }
}

/// Flatten a `validator` error tree into one entry per failed rule.
pub fn flatten(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut out = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for err in field_errors {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{field} is invalid ({})", err.code));
            out.push(FieldViolation::new(field.to_string(), message));
        }
    }
    out
}

/// Turn a list of violations into a result: `Ok` when empty, otherwise a
/// single [`CoreError::InvalidFields`] carrying all of them.
pub fn finish(mut violations: Vec<FieldViolation>) -> Result<(), CoreError> {
    if violations.is_empty() {
        return Ok(());
    }
    violations.sort_by(|a, b| a.field.cmp(&b.field));
    Err(CoreError::InvalidFields(violations))
}

/// Validate `input`, failing with every violated constraint at once.
pub fn check(input: &impl Validate) -> Result<(), CoreError> {
    finish(violations(input))
}
