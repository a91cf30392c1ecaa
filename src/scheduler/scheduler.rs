//! Tick-driven cooperative scheduler.

use super::error::SchedulerError;
use super::routine::{BoxedRoutine, Routine, RoutineContext, Step};
use crate::core::{RoutineHandle, SchedulerId, YieldCommand};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};

/// What became of a routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoutineStatus {
    /// Registered and suspended
    Pending,

    /// Ran to completion, or failed and was retired
    Finished,

    /// Cancelled before it finished
    Cancelled,

    /// Not minted by this scheduler
    Unknown,
}

/// Pending command with its countdown state.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Pending {
    Immediate,
    Frames(i64),
    Seconds(f64),
    On(RoutineHandle),
    // Waiting on a routine that was cancelled; never satisfied.
    Orphaned,
}

impl Pending {
    fn advance(&mut self, frames: u32, seconds: f64) {
        match self {
            Pending::Frames(remaining) => *remaining -= i64::from(frames),
            Pending::Seconds(remaining) => *remaining -= seconds,
            Pending::Immediate | Pending::On(_) | Pending::Orphaned => {}
        }
    }
}

impl From<YieldCommand> for Pending {
    fn from(command: YieldCommand) -> Self {
        match command {
            YieldCommand::Immediate => Pending::Immediate,
            YieldCommand::WaitFrames(frames) => Pending::Frames(i64::from(frames)),
            YieldCommand::WaitSeconds(seconds) => Pending::Seconds(seconds),
            YieldCommand::WaitOn(handle) => Pending::On(handle),
        }
    }
}

struct Entry {
    // Taken out while the routine is being resumed.
    routine: Option<BoxedRoutine>,
    pending: Pending,
    finished: bool,
}

/// Registry of cooperative routines, advanced once per host frame.
///
/// Each call to [`tick`](Self::tick) resumes every routine whose pending
/// command is satisfied, by exactly one step. Submission services the
/// routine's initial `Immediate` command, so a routine runs up to its first
/// yield before [`submit`](Self::submit) returns.
///
/// # Example
///
/// ```rust
/// use stagehand::core::YieldCommand;
/// use stagehand::scheduler::{routine, Scheduler};
///
/// let mut scheduler = Scheduler::new();
/// let fade = scheduler.submit(routine::sequence(vec![YieldCommand::WaitSeconds(0.25)]));
///
/// scheduler.tick(1, 0.1);
/// scheduler.tick(1, 0.1);
/// assert!(!scheduler.is_finished(fade));
///
/// scheduler.tick(1, 0.1);
/// assert!(scheduler.is_finished(fade));
/// ```
pub struct Scheduler {
    id: SchedulerId,
    next_id: u64,
    routines: HashMap<u64, Entry>,
    // Registration order. May hold ids of cancelled routines until the next reap.
    order: Vec<u64>,
    // Routines cancelled since the last reap.
    cancelled: HashSet<u64>,
    ticking: bool,
    failures: Vec<SchedulerError>,
    frame: u64,
    time: f64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            id: SchedulerId::generate(),
            next_id: 0,
            routines: HashMap::new(),
            order: Vec::new(),
            cancelled: HashSet::new(),
            ticking: false,
            failures: Vec::new(),
            frame: 0,
            time: 0.0,
        }
    }

    pub fn id(&self) -> SchedulerId {
        self.id
    }

    /// Frames elapsed across all ticks.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Clock time elapsed across all ticks, in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of registered routines, finished ones awaiting reaping included.
    pub fn len(&self) -> usize {
        self.routines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }

    /// Register a routine and run it to its first yield.
    ///
    /// While a tick is in progress the routine is not run here. It is
    /// appended with a pending `Immediate` that the same tick services, so it
    /// still takes exactly one step in that tick and its first wait starts
    /// counting on the next one.
    pub fn submit<R: Routine + 'static>(&mut self, routine: R) -> RoutineHandle {
        self.enroll(Box::new(routine))
    }

    /// Register a routine the caller may not have.
    ///
    /// Fails with [`SchedulerError::InvalidArgument`] when `routine` is `None`.
    pub fn submit_boxed(
        &mut self,
        routine: Option<BoxedRoutine>,
    ) -> Result<RoutineHandle, SchedulerError> {
        let routine = routine.ok_or_else(|| {
            SchedulerError::InvalidArgument("routine cannot be absent".to_string())
        })?;
        Ok(self.enroll(routine))
    }

    pub(crate) fn enroll(&mut self, routine: BoxedRoutine) -> RoutineHandle {
        let handle = RoutineHandle::new(self.id, self.next_id);
        self.next_id += 1;

        self.routines.insert(
            handle.id(),
            Entry {
                routine: None,
                pending: Pending::Immediate,
                finished: false,
            },
        );
        self.order.push(handle.id());
        debug!(routine = handle.id(), live = self.routines.len(), "routine submitted");

        if self.ticking {
            // The pass in progress reaches the new entry and services its Immediate.
            if let Some(entry) = self.routines.get_mut(&handle.id()) {
                entry.routine = Some(routine);
            }
        } else {
            // The initial Immediate is satisfied on registration.
            self.resume(handle, routine);
        }
        handle
    }

    /// Remove a routine from the registry.
    ///
    /// Routines waiting on the cancelled one are not cancelled with it; they
    /// stay suspended for good. Returns `false` if the routine was not live.
    pub fn cancel(&mut self, handle: RoutineHandle) -> bool {
        if handle.scheduler() != self.id {
            return false;
        }
        match self.routines.get(&handle.id()) {
            Some(entry) if !entry.finished => {
                self.routines.remove(&handle.id());
                self.cancelled.insert(handle.id());
                for entry in self.routines.values_mut() {
                    if entry.pending == Pending::On(handle) {
                        entry.pending = Pending::Orphaned;
                    }
                }
                debug!(routine = handle.id(), "routine cancelled");
                true
            }
            _ => false,
        }
    }

    /// Look up a routine.
    ///
    /// A cancelled routine reports `Cancelled` until the scheduler next reaps,
    /// at the end of a tick. Once reaped, finished and cancelled routines
    /// alike report `Finished`. Handles this scheduler never minted report
    /// `Unknown`.
    pub fn status(&self, handle: RoutineHandle) -> RoutineStatus {
        if handle.scheduler() != self.id || handle.id() >= self.next_id {
            return RoutineStatus::Unknown;
        }
        match self.routines.get(&handle.id()) {
            Some(entry) if entry.finished => RoutineStatus::Finished,
            Some(_) => RoutineStatus::Pending,
            None if self.cancelled.contains(&handle.id()) => RoutineStatus::Cancelled,
            None => RoutineStatus::Finished,
        }
    }

    pub fn is_finished(&self, handle: RoutineHandle) -> bool {
        self.status(handle) == RoutineStatus::Finished
    }

    /// Advance every routine by the elapsed frames and seconds.
    ///
    /// Routines are visited in registration order. Routines submitted while
    /// the tick is running are visited in the same pass. Routines that finish
    /// are reaped only once the pass is over, so waiters visited later in the
    /// pass still see them finish.
    pub fn tick(&mut self, frame_delta: u32, time_delta: f64) {
        self.frame += u64::from(frame_delta);
        self.time += time_delta;
        trace!(frame = self.frame, time = self.time, live = self.routines.len(), "tick");
        self.ticking = true;

        let mut index = 0;
        while index < self.order.len() {
            let id = self.order[index];
            index += 1;

            let pending = match self.routines.get_mut(&id) {
                Some(entry) if !entry.finished => {
                    entry.pending.advance(frame_delta, time_delta);
                    entry.pending
                }
                _ => continue,
            };
            if !self.is_satisfied(pending) {
                continue;
            }

            let Some(routine) = self.routines.get_mut(&id).and_then(|e| e.routine.take()) else {
                continue;
            };
            self.resume(RoutineHandle::new(self.id, id), routine);
        }

        self.ticking = false;
        self.reap();
    }

    /// Advance to an absolute frame count and clock time.
    ///
    /// Deltas are taken against the scheduler's own counters. A clock that
    /// runs backwards advances nothing.
    pub fn tick_at(&mut self, frame: u64, time: f64) {
        let frame_delta = u32::try_from(frame.saturating_sub(self.frame)).unwrap_or(u32::MAX);
        let time_delta = (time - self.time).max(0.0);
        self.tick(frame_delta, time_delta);
    }

    /// Take the failures recorded since the last call.
    pub fn drain_failures(&mut self) -> Vec<SchedulerError> {
        std::mem::take(&mut self.failures)
    }

    /// Cancel every live routine.
    pub fn shutdown(&mut self) {
        if self.routines.is_empty() {
            return;
        }
        debug!(live = self.routines.len(), "scheduler shutting down");
        for (id, entry) in self.routines.drain() {
            if !entry.finished {
                self.cancelled.insert(id);
            }
        }
        self.order.clear();
    }

    fn is_satisfied(&self, pending: Pending) -> bool {
        match pending {
            Pending::Immediate => true,
            Pending::Frames(remaining) => remaining <= 0,
            Pending::Seconds(remaining) => remaining <= 0.0,
            Pending::On(target) => self.is_finished(target),
            Pending::Orphaned => false,
        }
    }

    fn resume(&mut self, handle: RoutineHandle, mut routine: BoxedRoutine) {
        let step = {
            let mut cx = RoutineContext::new(self, handle);
            routine.resume(&mut cx)
        };
        let outcome = match step {
            Step::Yield(command) => self.check(handle, command).map(Some),
            Step::Complete => Ok(None),
        };

        let Some(entry) = self.routines.get_mut(&handle.id()) else {
            trace!(routine = handle.id(), "routine cancelled while running");
            return;
        };
        match outcome {
            Ok(Some(command)) => {
                trace!(routine = handle.id(), ?command, "routine suspended");
                entry.pending = match command {
                    YieldCommand::WaitOn(target) if self.cancelled.contains(&target.id()) => {
                        Pending::Orphaned
                    }
                    command => Pending::from(command),
                };
                entry.routine = Some(routine);
            }
            Ok(None) => {
                entry.finished = true;
                debug!(routine = handle.id(), "routine finished");
            }
            Err(error) => {
                entry.finished = true;
                warn!(routine = handle.id(), %error, "routine retired after unsupported yield");
                self.failures.push(error);
            }
        }
    }

    fn check(&self, handle: RoutineHandle, command: YieldCommand) -> Result<YieldCommand, SchedulerError> {
        let reason = match command {
            YieldCommand::WaitOn(target) if target == handle => "a routine cannot wait on itself",
            YieldCommand::WaitOn(target) if target.scheduler() != self.id => {
                "the awaited routine belongs to another scheduler"
            }
            YieldCommand::WaitSeconds(seconds) if !seconds.is_finite() => {
                "wait duration must be finite"
            }
            _ => return Ok(command),
        };
        Err(SchedulerError::UnsupportedYield {
            routine: handle,
            reason: reason.to_string(),
        })
    }

    fn reap(&mut self) {
        let before = self.routines.len();
        self.routines.retain(|_, entry| !entry.finished);
        let routines = &self.routines;
        self.order.retain(|id| routines.contains_key(id));
        self.cancelled.clear();

        let reaped = before - self.routines.len();
        if reaped > 0 {
            debug!(reaped, live = self.routines.len(), "reaped finished routines");
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
