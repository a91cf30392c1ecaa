//! Scheduler error types.

use crate::core::RoutineHandle;
use thiserror::Error;

/// Errors raised by the cooperative scheduler.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchedulerError {
    /// A caller passed something the scheduler cannot register
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A routine yielded a command the scheduler cannot service
    #[error("{routine} yielded an unsupported command: {reason}")]
    UnsupportedYield {
        routine: RoutineHandle,
        reason: String,
    },
}
