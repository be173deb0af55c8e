//! # Error Hierarchy
//!
//! Structured error types for patient validation, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Field-level failures carry the dotted path of the offending field and the
//! reason it was rejected. Record-level failures are raised only after every
//! field validated and the record was assembled.

use thiserror::Error;

/// Top-level error type for the patient management crates.
#[derive(Error, Debug)]
pub enum PmsError {
    /// Patient validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a single field was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldErrorKind {
    /// A required field was absent from the input.
    #[error("field required")]
    Missing,

    /// The raw value has the wrong JSON type.
    #[error("expected {expected}")]
    WrongType {
        /// Human-readable name of the expected type.
        expected: &'static str,
    },

    /// The value has the right type but violates a declared range or
    /// length constraint.
    #[error("{0}")]
    Constraint(String),

    /// The value is not a syntactically valid email address.
    #[error("value is not a valid email address: {0}")]
    InvalidEmail(String),

    /// The email is well-formed but its domain is not whitelisted.
    #[error("email domain \"{domain}\" is not allowed (expected one of {allowed:?})")]
    InvalidDomain {
        /// The rejected domain.
        domain: String,
        /// The whitelisted domains.
        allowed: &'static [&'static str],
    },
}

/// A single field failure.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{field}: {kind}")]
pub struct FieldError {
    /// Dotted path to the field, e.g. `age` or `address.city`.
    pub field: String,
    /// Reason for the rejection.
    pub kind: FieldErrorKind,
}

impl FieldError {
    /// Build a field error for `field`.
    pub fn new(field: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }

    /// Shorthand for a [`FieldErrorKind::Constraint`] failure.
    pub fn constraint(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, FieldErrorKind::Constraint(message.into()))
    }

    /// Prefix the field path with a parent field, for nested models.
    pub fn nested_in(mut self, parent: &str) -> Self {
        self.field = format!("{parent}.{}", self.field);
        self
    }
}

/// Record-level (cross-field) failures, evaluated on the assembled record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// Patients over 60 must list an emergency contact.
    #[error("patients over 60 need an emergency contact (age {age})")]
    MissingEmergencyContact {
        /// Age of the rejected patient.
        age: u32,
    },
}

/// Outcome of a failed validation attempt.
///
/// Either one or more field failures (fields never reached assembly) or a
/// single record-level failure (every field was valid).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// One or more fields were rejected. Never empty.
    #[error("{} field error(s): {}", .0.len(), join_fields(.0))]
    Fields(Vec<FieldError>),

    /// The assembled record violated a cross-field rule.
    #[error(transparent)]
    Record(#[from] RecordError),
}

impl ValidationError {
    /// Field failures, empty for record-level errors.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Fields(errors) => errors,
            Self::Record(_) => &[],
        }
    }
}

impl From<FieldError> for ValidationError {
    fn from(err: FieldError) -> Self {
        Self::Fields(vec![err])
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
