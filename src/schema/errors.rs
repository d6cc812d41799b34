//! Schema error types
//!
//! Error codes:
//! - MOVIE_SCHEMA_NOT_OBJECT (REJECT)
//! - MOVIE_SCHEMA_VALIDATION_FAILED (REJECT)
//!
//! Validation collects every failing field instead of stopping at the first.

use std::fmt;

use serde::Serialize;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Candidate is not a JSON object
    NotObject,
    /// One or more fields violate the schema
    ValidationFailed,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::NotObject => "MOVIE_SCHEMA_NOT_OBJECT",
            SchemaErrorCode::ValidationFailed => "MOVIE_SCHEMA_VALIDATION_FAILED",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One failing field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetails {
    /// Field path (e.g., "genre[1]")
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(field, expected, actual)
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// Structured validation error
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    details: Vec<ValidationDetails>,
}

impl SchemaError {
    /// Candidate was not an object
    pub fn not_object(actual: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::NotObject,
            details: vec![ValidationDetails::type_mismatch("$root", "object", actual)],
        }
    }

    /// One or more fields failed
    pub fn validation_failed(details: Vec<ValidationDetails>) -> Self {
        Self {
            code: SchemaErrorCode::ValidationFailed,
            details,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns every failing field
    pub fn details(&self) -> &[ValidationDetails] {
        &self.details
    }

    /// Whether `field` is among the failures
    pub fn has_field(&self, field: &str) -> bool {
        self.details.iter().any(|d| d.field == field)
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        for (i, details) in self.details.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, details)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
