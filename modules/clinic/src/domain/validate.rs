//! Field-level validation for pet submissions.
//!
//! Failures are accumulated, never raised: the web layer re-renders the
//! form with the collected messages while the user's input is preserved.

use crate::domain::model::PetSubmission;

pub const DUPLICATE_NAME: &str = "This pet name already exists for this owner.";
pub const FUTURE_BIRTH_DATE: &str = "Birth date cannot be in the future.";
pub const REQUIRED: &str = "required";

/// Per-field error accumulator, kept in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<(String, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(&mut self, field: &str, message: &str) {
        self.errors.push((field.to_string(), message.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First message recorded for `field`, if any.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }
}

/// Standard field rules, run before the service's business rules:
/// a pet without a name or without a type is invalid.
pub fn validate_pet(submission: &PetSubmission, errors: &mut FieldErrors) {
    if submission.name.trim().is_empty() {
        errors.reject("name", REQUIRED);
    }
    if submission.type_id.is_none() {
        errors.reject("type", REQUIRED);
    }
}
