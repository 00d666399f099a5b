//! Field constraints for item payloads.
//!
//! All rules are checked on every call so that callers can report the full
//! set of problems at once instead of one field per round trip.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::models::NewItem;

/// Maximum name length in characters.
pub const MAX_NAME_LENGTH: usize = 50;

/// Maximum description length in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every constraint an item payload violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_violations(.violations))]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Returns true if the given field has at least one violation.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl From<Vec<FieldViolation>> for ValidationErrors {
    fn from(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }
}

/// Returns true if the string matches the accepted `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Validates an item payload against all field constraints.
pub fn validate_item(item: &NewItem) -> Result<(), ValidationErrors> {
    let mut violations = Vec::new();

    if item.name.trim().is_empty() {
        violations.push(FieldViolation::new("name", "Name cannot be blank"));
    } else if item.name.chars().count() > MAX_NAME_LENGTH {
        violations.push(FieldViolation::new(
            "name",
            format!(
                "Name can have a maximum of {} characters",
                MAX_NAME_LENGTH
            ),
        ));
    }

    if let Some(description) = &item.description
        && description.chars().count() > MAX_DESCRIPTION_LENGTH
    {
        violations.push(FieldViolation::new(
            "description",
            format!(
                "Description can have a maximum of {} characters",
                MAX_DESCRIPTION_LENGTH
            ),
        ));
    }

    if item.status.trim().is_empty() {
        violations.push(FieldViolation::new("status", "Status cannot be blank"));
    }

    if let Some(email) = &item.email
        && !is_valid_email(email)
    {
        violations.push(FieldViolation::new("email", "Invalid email format"));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations.into())
    }
}
