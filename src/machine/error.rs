//! Errors raised by the state machine.

use crate::validation::ArgumentViolation;
use thiserror::Error;

/// The machine is not set up for the requested operation
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("State '{state}' is already registered")]
    DuplicateState { state: String },

    #[error("State machine is not configured: {reason}")]
    NotConfigured { reason: String },
}

/// The requested change of focus is not allowed
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransitionError {
    #[error("Transition from '{from}' to '{to}' is not registered")]
    UnregisteredTransition { from: String, to: String },

    #[error("Cannot transition to parent state, '{state}' is the root state")]
    AtRootState { state: String },

    #[error("State '{state}' is still entering")]
    Entering { state: String },
}

/// A state's entry payload violated its argument rules
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Invalid arguments for state '{state}': {}", .violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct ArgumentError {
    pub state: String,
    pub violations: Vec<ArgumentViolation>,
}

/// Any error a state machine operation can report
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MachineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Argument(#[from] ArgumentError),
}

impl ConfigurationError {
    pub(crate) fn not_configured(reason: impl Into<String>) -> Self {
        Self::NotConfigured {
            reason: reason.into(),
        }
    }
}
