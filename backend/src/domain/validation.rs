//! Field-level validation failures for form-backed value objects.
//!
//! Form constructors collect every failing field in one pass so a
//! re-rendered form can show all problems at once rather than the first.

/// A single user-correctable problem attributed to a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Stable form field name the message belongs to.
    pub field: &'static str,
    /// Human-readable message shown next to the field.
    pub message: String,
}

impl FieldError {
    /// Create a field error for `field` with the given message.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
