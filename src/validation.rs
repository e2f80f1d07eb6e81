//! Validation Support
//!
//! Payload types implement [`Validatable`]; the controller runs it before any
//! write. [`MinNumber`] and [`MaxNumber`] are the numeric range rules used to
//! build those checks.
//!
//! # Example
//!
//! ```rust,ignore
//! use crudkit::validation::{MaxNumber, MinNumber, Validatable, ValidationErrors};
//!
//! impl Validatable for NoteInput {
//!     fn validate(&self) -> Result<(), ValidationErrors> {
//!         let mut errors = ValidationErrors::new();
//!         errors.check(MinNumber::new(1).check("priority", Some(self.priority)));
//!         errors.check(MaxNumber::new(5).check("priority", Some(self.priority)));
//!         errors.result()
//!     }
//! }
//! ```

use serde::Serialize;
use serde_json::Value;
use std::fmt;

const NOT_INTEGER: &str = "Field is not integer";

/// Validation error with field name and message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Record the outcome of a single rule, keeping only failures.
    pub fn check(&mut self, outcome: Result<(), ValidationError>) {
        if let Err(error) = outcome {
            self.errors.push(error);
        }
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
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Convert to Result
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one error was recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Trait for payloads that can be validated before they reach the repository
pub trait Validatable {
    /// Validate the instance, returning every failed rule.
    ///
    /// # Errors
    ///
    /// Returns the collected [`ValidationErrors`] when any rule fails.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Integer lower bound (inclusive). Absent values pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinNumber {
    min: i64,
}

impl MinNumber {
    #[must_use]
    pub fn new(min: impl Into<i64>) -> Self {
        Self { min: min.into() }
    }

    #[must_use]
    pub fn is_valid<T: Into<i64>>(&self, value: Option<T>) -> bool {
        value.is_none_or(|number| number.into() >= self.min)
    }

    /// # Errors
    ///
    /// Fails with "Value is less than {min}" when `value` is below the bound.
    pub fn check<T: Into<i64>>(&self, field: &str, value: Option<T>) -> Result<(), ValidationError> {
        if self.is_valid(value) {
            Ok(())
        } else {
            Err(ValidationError::new(
                field,
                format!("Value is less than {}", self.min),
            ))
        }
    }

    /// Check an untyped JSON value; anything but null or an integer is rejected.
    ///
    /// # Errors
    ///
    /// Fails when the value is not an integer or is below the bound.
    pub fn check_json(&self, field: &str, value: &Value) -> Result<(), ValidationError> {
        self.check(field, json_integer(field, value)?)
    }
}

/// Integer upper bound (inclusive). Absent values pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxNumber {
    max: i64,
}

impl MaxNumber {
    #[must_use]
    pub fn new(max: impl Into<i64>) -> Self {
        Self { max: max.into() }
    }

    #[must_use]
    pub fn is_valid<T: Into<i64>>(&self, value: Option<T>) -> bool {
        value.is_none_or(|number| number.into() <= self.max)
    }

    /// # Errors
    ///
    /// Fails with "Value is bigger than {max}" when `value` is above the bound.
    pub fn check<T: Into<i64>>(&self, field: &str, value: Option<T>) -> Result<(), ValidationError> {
        if self.is_valid(value) {
            Ok(())
        } else {
            Err(ValidationError::new(
                field,
                format!("Value is bigger than {}", self.max),
            ))
        }
    }

    /// # Errors
    ///
    /// Fails when the value is not an integer or is above the bound.
    pub fn check_json(&self, field: &str, value: &Value) -> Result<(), ValidationError> {
        self.check(field, json_integer(field, value)?)
    }
}

fn json_integer(field: &str, value: &Value) -> Result<Option<i64>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_i64()
            .map(Some)
            .ok_or_else(|| ValidationError::new(field, NOT_INTEGER)),
        _ => Err(ValidationError::new(field, NOT_INTEGER)),
    }
}
