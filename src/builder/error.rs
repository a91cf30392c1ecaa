//! Build errors for state machine and state builders.

use crate::machine::ConfigurationError;
use thiserror::Error;

/// Errors that can occur when building state machines and states.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("State '{state}' has no behavior. Call .behavior(factory) before .build()")]
    MissingBehavior { state: String },

    #[error("No states defined. Add at least one state")]
    NoStates,

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
