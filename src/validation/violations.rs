//! Argument violations.

use thiserror::Error;

/// A rule an entry payload failed to satisfy
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ArgumentViolation {
    #[error("Missing required field '{field}'")]
    MissingField { field: String },

    #[error("Expected {expected} argument(s), found {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("Custom check failed: {message}")]
    CustomCheckFailed { message: String },
}
