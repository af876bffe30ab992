//! Error types for the classroom ledger.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while editing center data.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::MakeupStatus;

/// A single violated validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// The field the rule applies to.
    pub field: String,
    /// A description of what is wrong with the field.
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The main error type for the classroom ledger.
///
/// All operations in the crate return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use classroom_ledger::error::CenterError;
///
/// let error = CenterError::NotFound {
///     entity: "class".to_string(),
///     id: "C9".to_string(),
/// };
/// assert_eq!(error.to_string(), "class not found: C9");
/// ```
#[derive(Debug, Error)]
pub enum CenterError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An entity referenced by id does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity that was looked up.
        entity: String,
        /// The id that did not resolve.
        id: String,
    },

    /// A draft failed validation. Every violated rule is reported.
    #[error("Invalid {entity}: {}", join_violations(.violations))]
    Validation {
        /// The kind of entity being validated.
        entity: String,
        /// All violated rules.
        violations: Vec<FieldViolation>,
    },

    /// A payment amount was zero or negative.
    #[error("Payment amount must be positive, got {amount}")]
    InvalidPayment {
        /// The rejected amount.
        amount: Decimal,
    },

    /// The class has no free seat left.
    #[error("Class '{class_id}' is full ({max_students} students)")]
    ClassFull {
        /// The class that is at capacity.
        class_id: String,
        /// The class capacity.
        max_students: u32,
    },

    /// A makeup lesson status change is not allowed.
    #[error("Makeup lesson '{makeup_id}' cannot move from {from} to {to}")]
    InvalidTransition {
        /// The makeup lesson id.
        makeup_id: String,
        /// The current status.
        from: MakeupStatus,
        /// The requested status.
        to: MakeupStatus,
    },

    /// Reading or writing persisted data failed.
    #[error("Persistence error: {message}")]
    Persistence {
        /// A description of the failure.
        message: String,
    },
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CenterError {
    /// Shorthand for a [`CenterError::NotFound`].
    pub fn not_found(entity: &str, id: &str) -> Self {
        CenterError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<serde_json::Error> for CenterError {
    fn from(error: serde_json::Error) -> Self {
        CenterError::Persistence {
            message: error.to_string(),
        }
    }
}

impl From<std::io::Error> for CenterError {
    fn from(error: std::io::Error) -> Self {
        CenterError::Persistence {
            message: error.to_string(),
        }
    }
}

/// A type alias for Results that return CenterError.
pub type CenterResult<T> = Result<T, CenterError>;
