//! Field-level validation errors.
//!
//! Account validation reports every failing field in one pass, the way the
//! signup form expects — not first-error-wins, and never as a panic or a
//! bare string.

use serde::Serialize;
use std::fmt;

/// One failed check on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Accumulated validation failures, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Messages recorded against one field, in check order.
    #[must_use]
    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|error| error.field == field)
            .map(|error| error.message.as_str())
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed")?;
        for (index, error) in self.errors.iter().enumerate() {
            let separator = if index == 0 { ": " } else { "; " };
            write!(f, "{separator}{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_in_check_order() {
        let mut errors = ValidationErrors::new();
        errors.push("username", "Username is required");
        errors.push("email", "Email is not valid");
        errors.push("username", "Username is already in use");

        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.messages_for("username"),
            vec!["Username is required", "Username is already in use"]
        );
    }

    #[test]
    fn display_lists_every_field() {
        let mut errors = ValidationErrors::new();
        errors.push("password", "Password is required");
        errors.push("confirmation", "Passwords do not match");

        assert_eq!(
            errors.to_string(),
            "validation failed: password: Password is required; \
             confirmation: Passwords do not match"
        );
    }

    #[test]
    fn serializes_as_a_plain_list() {
        let mut errors = ValidationErrors::new();
        errors.push("email", "Email is required");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "field": "email", "message": "Email is required" }])
        );
    }
}
