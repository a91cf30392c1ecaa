//! Cooperative, tick-driven routine scheduler.
//!
//! Multi-tick behavior (a camera move, a timed fade, paced spawning) is
//! written as a [`Routine`] that suspends itself with a
//! [`YieldCommand`](crate::core::YieldCommand). The host calls
//! [`Scheduler::tick`] once per frame; every routine whose command is
//! satisfied advances by one step.
//!
//! # Key Concepts
//!
//! - **One step per tick**: a routine never chains through several satisfied
//!   commands within a single tick
//! - **Append while iterating**: routines submitted during a tick take
//!   exactly one step in that same tick; their waits count from the next
//! - **Deferred reaping**: finished routines leave the registry after the
//!   pass, so same-tick waiters observe them finishing
//! - **Non-transitive cancellation**: cancelling a routine leaves its waiters
//!   suspended for good

pub mod routine;

mod error;
#[allow(clippy::module_inception)]
mod scheduler;

pub use error::SchedulerError;
pub use routine::{BoxedRoutine, Routine, RoutineContext, Step};
pub use scheduler::{RoutineStatus, Scheduler};
