//! Yield commands and routine handles.
//!
//! A routine suspends itself by yielding a [`YieldCommand`]. The set of
//! commands is closed: a routine can wait for the next tick, for a number of
//! frames, for an amount of clock time, or for another routine to finish.

use std::fmt;
use uuid::Uuid;

/// Identity of one scheduler instance.
///
/// Handles carry the id of the scheduler that minted them so a handle from
/// one scheduler is never mistaken for a routine of another.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SchedulerId(Uuid);

impl SchedulerId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

/// Stable, copyable reference to a routine registered with a scheduler.
///
/// Handles stay valid after the routine finishes or is cancelled; the
/// scheduler reports what became of it through
/// [`Scheduler::status`](crate::scheduler::Scheduler::status).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RoutineHandle {
    scheduler: SchedulerId,
    id: u64,
}

impl RoutineHandle {
    pub(crate) fn new(scheduler: SchedulerId, id: u64) -> Self {
        Self { scheduler, id }
    }

    /// The scheduler this handle was minted by.
    pub fn scheduler(&self) -> SchedulerId {
        self.scheduler
    }

    /// Sequence number of the routine within its scheduler.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Display for RoutineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "routine #{}", self.id)
    }
}

/// What a suspended routine is waiting for.
///
/// # Example
///
/// ```rust
/// use stagehand::core::YieldCommand;
///
/// let commands = [
///     YieldCommand::Immediate,
///     YieldCommand::WaitFrames(3),
///     YieldCommand::WaitSeconds(0.5),
/// ];
///
/// assert!(commands.iter().all(|c| !c.is_wait_on()));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum YieldCommand {
    /// Resume on the next tick.
    Immediate,

    /// Resume once this many frames have elapsed.
    WaitFrames(u32),

    /// Resume once this many seconds of clock time have elapsed.
    WaitSeconds(f64),

    /// Resume once the given routine has finished.
    WaitOn(RoutineHandle),
}

impl YieldCommand {
    pub fn is_wait_on(&self) -> bool {
        matches!(self, Self::WaitOn(_))
    }
}

impl From<RoutineHandle> for YieldCommand {
    fn from(handle: RoutineHandle) -> Self {
        Self::WaitOn(handle)
    }
}
