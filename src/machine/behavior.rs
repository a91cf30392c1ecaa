//! Behaviors attached to states, and the context they run in.

use crate::core::{Hook, RoutineHandle, State};
use crate::scheduler::{BoxedRoutine, Routine, Scheduler};
use tracing::warn;

/// Whether a lifecycle callback finished or handed work to the scheduler.
pub enum Progress {
    /// The callback did all of its work synchronously
    Done,

    /// The callback continues as a routine over several ticks
    Running(BoxedRoutine),
}

impl Progress {
    pub fn running<R: Routine + 'static>(routine: R) -> Self {
        Progress::Running(Box::new(routine))
    }
}

/// Capabilities of one state.
///
/// Every push of a state creates a fresh behavior from its definition's
/// factory. All methods have no-op defaults; a behavior implements the ones
/// it needs and lists the hooks it handles in [`hooks`](Self::hooks).
///
/// # Example
///
/// ```rust
/// use stagehand::core::{Hook, StateId};
/// use stagehand::machine::{Behavior, Context, Progress};
///
/// #[derive(Default)]
/// struct InGame {
///     frames: u32,
/// }
///
/// impl Behavior<StateId, ()> for InGame {
///     fn hooks() -> &'static [Hook] {
///         &[Hook::PER_FRAME]
///     }
///
///     fn on_hook(&mut self, _hook: Hook, _cx: &mut Context<'_, StateId, ()>, _args: &()) {
///         self.frames += 1;
///     }
/// }
/// ```
pub trait Behavior<S: State, A> {
    /// Hooks this behavior implements.
    fn hooks() -> &'static [Hook]
    where
        Self: Sized,
    {
        &[]
    }

    /// Called when the state becomes the top of the stack by a transition.
    fn on_enter(&mut self, _cx: &mut Context<'_, S, A>, _args: A) -> Progress {
        Progress::Done
    }

    /// Called when the state is popped.
    fn on_exit(&mut self, _cx: &mut Context<'_, S, A>) -> Progress {
        Progress::Done
    }

    /// Called for each dispatched hook this behavior declared, while focused.
    fn on_hook(&mut self, _hook: Hook, _cx: &mut Context<'_, S, A>, _args: &A) {}
}

/// Change of focus requested from inside a callback.
pub(crate) enum Request<S, A> {
    Transition { target: S, args: A },
    Parent,
}

/// What a behavior can reach while one of its callbacks runs.
///
/// Transition requests are queued and applied by the machine as soon as the
/// callback returns, in the order they were made.
pub struct Context<'a, S: State, A> {
    scheduler: &'a mut Scheduler,
    state: &'a S,
    requests: Option<&'a mut Vec<Request<S, A>>>,
}

impl<'a, S: State, A> Context<'a, S, A> {
    pub(crate) fn new(
        scheduler: &'a mut Scheduler,
        state: &'a S,
        requests: Option<&'a mut Vec<Request<S, A>>>,
    ) -> Self {
        Self {
            scheduler,
            state,
            requests,
        }
    }

    /// The state whose behavior is running.
    pub fn state(&self) -> &S {
        self.state
    }

    pub fn scheduler(&mut self) -> &mut Scheduler {
        self.scheduler
    }

    /// Submit a routine to the scheduler.
    pub fn spawn<R: Routine + 'static>(&mut self, routine: R) -> RoutineHandle {
        self.scheduler.submit(routine)
    }

    /// Request a transition once the callback returns.
    pub fn transition(&mut self, target: S, args: A) {
        self.push(Request::Transition { target, args });
    }

    /// Request a return to the parent state once the callback returns.
    pub fn transition_to_parent(&mut self) {
        self.push(Request::Parent);
    }

    fn push(&mut self, request: Request<S, A>) {
        match self.requests.as_deref_mut() {
            Some(requests) => requests.push(request),
            None => warn!(
                state = self.state.name(),
                "transition requested while exiting; request discarded"
            ),
        }
    }
}
