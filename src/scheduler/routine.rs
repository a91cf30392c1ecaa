//! Suspendable computations.
//!
//! A [`Routine`] is resumed by the scheduler one step at a time. Each step
//! either yields the [`YieldCommand`] the routine wants to wait on, or
//! reports completion.

use super::scheduler::{RoutineStatus, Scheduler};
use crate::core::{RoutineHandle, YieldCommand};

/// Outcome of resuming a routine once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// Suspend until the command is satisfied
    Yield(YieldCommand),

    /// The routine has run to completion
    Complete,
}

impl From<YieldCommand> for Step {
    fn from(command: YieldCommand) -> Self {
        Step::Yield(command)
    }
}

/// A cooperative computation driven by a [`Scheduler`].
///
/// Implementors keep whatever progress state they need between steps. Small
/// routines are easiest to write with [`from_fn`], [`from_iter`] or
/// [`sequence`].
pub trait Routine {
    /// Run until the next suspension point.
    fn resume(&mut self, cx: &mut RoutineContext<'_>) -> Step;
}

/// Type-erased routine, as stored by the scheduler.
pub type BoxedRoutine = Box<dyn Routine>;

impl<R: Routine + ?Sized> Routine for Box<R> {
    fn resume(&mut self, cx: &mut RoutineContext<'_>) -> Step {
        (**self).resume(cx)
    }
}

/// View of the scheduler handed to a routine while it runs.
pub struct RoutineContext<'a> {
    scheduler: &'a mut Scheduler,
    handle: RoutineHandle,
}

impl<'a> RoutineContext<'a> {
    pub(crate) fn new(scheduler: &'a mut Scheduler, handle: RoutineHandle) -> Self {
        Self { scheduler, handle }
    }

    /// Handle of the routine being resumed.
    pub fn handle(&self) -> RoutineHandle {
        self.handle
    }

    pub fn frame(&self) -> u64 {
        self.scheduler.frame()
    }

    pub fn time(&self) -> f64 {
        self.scheduler.time()
    }

    /// Submit another routine.
    ///
    /// When called during a tick, the new routine is appended to the registry
    /// and takes exactly one step before that tick ends. Any wait it yields
    /// from that step starts counting on the next tick.
    pub fn spawn<R: Routine + 'static>(&mut self, routine: R) -> RoutineHandle {
        self.scheduler.submit(routine)
    }

    pub fn cancel(&mut self, handle: RoutineHandle) -> bool {
        self.scheduler.cancel(handle)
    }

    pub fn status(&self, handle: RoutineHandle) -> RoutineStatus {
        self.scheduler.status(handle)
    }
}

/// Routine backed by a closure, called once per step.
pub struct FromFn<F>(F);

/// Create a routine from a closure.
///
/// ```rust
/// use stagehand::core::YieldCommand;
/// use stagehand::scheduler::{routine, Scheduler, Step};
///
/// let mut scheduler = Scheduler::new();
/// let mut remaining = 2;
/// let handle = scheduler.submit(routine::from_fn(move |_cx| {
///     if remaining == 0 {
///         return Step::Complete;
///     }
///     remaining -= 1;
///     Step::Yield(YieldCommand::Immediate)
/// }));
///
/// scheduler.tick(1, 0.016);
/// scheduler.tick(1, 0.016);
/// assert!(scheduler.is_finished(handle));
/// ```
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: FnMut(&mut RoutineContext<'_>) -> Step,
{
    FromFn(f)
}

impl<F> Routine for FromFn<F>
where
    F: FnMut(&mut RoutineContext<'_>) -> Step,
{
    fn resume(&mut self, cx: &mut RoutineContext<'_>) -> Step {
        (self.0)(cx)
    }
}

/// Routine that yields each command of a lazy sequence in turn.
pub struct FromIter<I>(I);

/// Create a routine from any iterator of commands.
///
/// The routine completes when the iterator is exhausted.
pub fn from_iter<I>(commands: I) -> FromIter<I::IntoIter>
where
    I: IntoIterator<Item = YieldCommand>,
{
    FromIter(commands.into_iter())
}

impl<I> Routine for FromIter<I>
where
    I: Iterator<Item = YieldCommand>,
{
    fn resume(&mut self, _cx: &mut RoutineContext<'_>) -> Step {
        self.0.next().map_or(Step::Complete, Step::Yield)
    }
}

/// Create a routine that yields a fixed list of commands.
///
/// ```rust
/// use stagehand::core::YieldCommand;
/// use stagehand::scheduler::{routine, Scheduler};
///
/// let mut scheduler = Scheduler::new();
/// let handle = scheduler.submit(routine::sequence(vec![YieldCommand::WaitFrames(2)]));
///
/// scheduler.tick(1, 0.0);
/// assert!(!scheduler.is_finished(handle));
/// scheduler.tick(1, 0.0);
/// assert!(scheduler.is_finished(handle));
/// ```
pub fn sequence(commands: Vec<YieldCommand>) -> FromIter<std::vec::IntoIter<YieldCommand>> {
    from_iter(commands)
}
