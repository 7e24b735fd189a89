//! Domain error types

use thiserror::Error;

/// Configuration problems detected before any process is started.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{operation}: required field '{field}' is missing")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("{operation}: invalid value for '{field}': {reason}")]
    InvalidValue {
        operation: &'static str,
        field: &'static str,
        reason: String,
    },
}

impl DomainError {
    pub fn missing(operation: &'static str, field: &'static str) -> Self {
        DomainError::MissingField { operation, field }
    }

    pub fn invalid(operation: &'static str, field: &'static str, reason: impl Into<String>) -> Self {
        DomainError::InvalidValue {
            operation,
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending configuration field
    pub fn field(&self) -> &'static str {
        match self {
            DomainError::MissingField { field, .. } | DomainError::InvalidValue { field, .. } => {
                field
            }
        }
    }
}
