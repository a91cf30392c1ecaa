//! Hierarchical, stack-based state machine.

use crate::core::{Hook, HookTable, RoutineHandle, State, StateHistory, StateTransition, TransitionKind};
use crate::machine::behavior::{Behavior, Context, Progress, Request};
use crate::machine::definition::StateDefinition;
use crate::machine::error::{ArgumentError, ConfigurationError, MachineError, TransitionError};
use crate::scheduler::{RoutineStatus, Scheduler};
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, trace, warn};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Configuring,
    Running,
    Stopped,
}

/// A state on the stack: a fresh behavior plus its in-flight entry routine.
struct ActiveState<S: State, A> {
    id: S,
    behavior: Box<dyn Behavior<S, A>>,
    entry: Option<RoutineHandle>,
}

/// State machine whose active states form a stack.
///
/// The bottom of the stack is the root ancestor, the top is the focused
/// state. Only the focused state receives hooks. Multi-tick entry and exit
/// work runs on the [`Scheduler`] passed to each operation.
///
/// While the focused state's entry routine is outstanding the state is
/// *entering*: it receives no hooks, and transitions away from it are
/// rejected with [`TransitionError::Entering`] until the routine finishes or
/// [`cancel_entry`](Self::cancel_entry) is called.
///
/// # Example
///
/// ```rust
/// use stagehand::core::StateId;
/// use stagehand::machine::{Behavior, StateMachine};
/// use stagehand::scheduler::Scheduler;
///
/// struct Screen;
/// impl Behavior<StateId, ()> for Screen {}
///
/// let title = StateId::from("title");
/// let game = StateId::from("game");
///
/// let mut scheduler = Scheduler::new();
/// let mut machine = StateMachine::new();
/// machine.register(title.clone(), || Screen, [game.clone()], []).unwrap();
/// machine.register(game.clone(), || Screen, [title.clone()], []).unwrap();
///
/// machine.start(&mut scheduler, title, ()).unwrap();
/// machine.transition(&mut scheduler, game.clone(), ()).unwrap();
/// assert_eq!(machine.current(), Some(&game));
/// ```
pub struct StateMachine<S: State, A: 'static> {
    id: Uuid,
    definitions: HashMap<S, StateDefinition<S, A>>,
    hook_table: HookTable<S>,
    stack: Vec<ActiveState<S, A>>,
    bound: BTreeSet<Hook>,
    phase: Phase,
    history: StateHistory<S>,
    exits: Vec<RoutineHandle>,
}

impl<S: State, A: 'static> StateMachine<S, A> {
    /// Create an empty machine declaring the default hooks.
    pub fn new() -> Self {
        Self::with_hooks(Hook::DEFAULTS)
    }

    /// Create an empty machine declaring exactly these hooks.
    pub fn with_hooks(hooks: impl IntoIterator<Item = Hook>) -> Self {
        Self {
            id: Uuid::new_v4(),
            definitions: HashMap::new(),
            hook_table: HookTable::new(hooks),
            stack: Vec::new(),
            bound: BTreeSet::new(),
            phase: Phase::Configuring,
            history: StateHistory::new(),
            exits: Vec::new(),
        }
    }

    pub(crate) fn set_history(&mut self, history: StateHistory<S>) {
        self.history = history;
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Register a state built by `factory`.
    pub fn register<B, F>(
        &mut self,
        id: S,
        factory: F,
        normal_targets: impl IntoIterator<Item = S>,
        child_targets: impl IntoIterator<Item = S>,
    ) -> Result<(), ConfigurationError>
    where
        B: Behavior<S, A> + 'static,
        F: Fn() -> B + 'static,
    {
        self.register_definition(StateDefinition::new(id, factory, normal_targets, child_targets))
    }

    /// Register a prepared definition.
    pub fn register_definition(
        &mut self,
        definition: StateDefinition<S, A>,
    ) -> Result<(), ConfigurationError> {
        if self.phase != Phase::Configuring {
            return Err(ConfigurationError::not_configured(format!(
                "cannot register '{}' after the machine has started",
                definition.id.name()
            )));
        }
        if self.definitions.contains_key(&definition.id) {
            return Err(ConfigurationError::DuplicateState {
                state: definition.id.name().to_string(),
            });
        }

        let ignored = self.hook_table.bind(definition.id.clone(), definition.hooks);
        for hook in ignored {
            warn!(
                state = definition.id.name(),
                %hook,
                "behavior implements a hook the machine does not declare"
            );
        }
        debug!(machine = %self.id, state = definition.id.name(), "state registered");
        self.definitions.insert(definition.id.clone(), definition);
        Ok(())
    }

    /// Push the initial state and enter it.
    pub fn start(&mut self, scheduler: &mut Scheduler, initial: S, args: A) -> Result<(), MachineError> {
        match self.phase {
            Phase::Configuring => {}
            Phase::Running => {
                return Err(ConfigurationError::not_configured("machine has already started").into())
            }
            Phase::Stopped => {
                return Err(ConfigurationError::not_configured("machine has been torn down").into())
            }
        }
        if !self.definitions.contains_key(&initial) {
            return Err(ConfigurationError::not_configured(format!(
                "initial state '{}' is not registered",
                initial.name()
            ))
            .into());
        }
        self.check_targets()?;
        self.check_arguments(&initial, &args)?;

        self.phase = Phase::Running;
        debug!(machine = %self.id, state = initial.name(), "machine started");
        self.push(initial);
        let requests = self.enter_top(scheduler, args);
        self.apply(scheduler, requests)
    }

    /// Move focus to `target`, as permitted by the focused state.
    ///
    /// A normal target replaces the focused state; a child target is pushed
    /// above it. On any error the stack is left untouched.
    pub fn transition(&mut self, scheduler: &mut Scheduler, target: S, args: A) -> Result<(), MachineError> {
        let from = self.focused_for_transition(scheduler)?;
        let kind = self
            .definitions
            .get(&from)
            .and_then(|definition| definition.classify(&target))
            .ok_or_else(|| TransitionError::UnregisteredTransition {
                from: from.name().to_string(),
                to: target.name().to_string(),
            })?;
        self.check_arguments(&target, &args)?;

        if kind == TransitionKind::Sibling {
            self.pop_and_exit(scheduler);
        }
        self.push(target.clone());
        self.record(scheduler, from, target, kind);
        let requests = self.enter_top(scheduler, args);
        self.apply(scheduler, requests)
    }

    /// Exit the focused child and resume its parent.
    ///
    /// The parent is not entered again.
    pub fn transition_to_parent(&mut self, scheduler: &mut Scheduler) -> Result<(), MachineError> {
        self.ensure_running()?;
        if let [root] = self.stack.as_slice() {
            return Err(TransitionError::AtRootState {
                state: root.id.name().to_string(),
            }
            .into());
        }
        let from = self.focused_for_transition(scheduler)?;

        self.pop_and_exit(scheduler);
        self.rebind();
        if let Some(parent) = self.current().cloned() {
            debug!(machine = %self.id, state = parent.name(), "parent resumed");
            self.record(scheduler, from, parent, TransitionKind::Parent);
        }
        Ok(())
    }

    /// Fire a hook on the focused state.
    ///
    /// Returns `true` if the focused state handled the hook. States that do
    /// not implement the hook, and states still entering, are skipped.
    pub fn dispatch(&mut self, scheduler: &mut Scheduler, hook: Hook, args: &A) -> Result<bool, MachineError> {
        self.ensure_running()?;
        if !self.bound.contains(&hook) {
            trace!(machine = %self.id, %hook, "hook not bound to focused state");
            return Ok(false);
        }
        self.settle_entry(scheduler);

        let mut requests = Vec::new();
        {
            let Some(top) = self.stack.last_mut() else {
                return Ok(false);
            };
            if top.entry.is_some() {
                trace!(machine = %self.id, state = top.id.name(), %hook, "state still entering");
                return Ok(false);
            }
            let mut cx = Context::new(scheduler, &top.id, Some(&mut requests));
            top.behavior.on_hook(hook, &mut cx, args);
        }
        self.apply(scheduler, requests)?;
        Ok(true)
    }

    /// Cancel the focused state's entry routine, if any.
    ///
    /// The state counts as entered afterwards. Returns `true` if a routine
    /// was cancelled.
    pub fn cancel_entry(&mut self, scheduler: &mut Scheduler) -> bool {
        let Some(top) = self.stack.last_mut() else {
            return false;
        };
        match top.entry.take() {
            Some(handle) => {
                debug!(machine = %self.id, state = top.id.name(), "entry cancelled");
                scheduler.cancel(handle)
            }
            None => false,
        }
    }

    /// Exit every state, innermost first, and stop the machine.
    ///
    /// Outstanding entry routines are cancelled. Exit routines returned by
    /// the behaviors are still submitted.
    pub fn teardown(&mut self, scheduler: &mut Scheduler) {
        if self.phase != Phase::Running {
            return;
        }
        debug!(machine = %self.id, depth = self.stack.len(), "tearing down");
        while !self.stack.is_empty() {
            self.pop_and_exit(scheduler);
        }
        self.bound.clear();
        self.phase = Phase::Stopped;
    }

    /// The focused state.
    pub fn current(&self) -> Option<&S> {
        self.stack.last().map(|active| &active.id)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// State ids from the root to the focused state.
    pub fn stack(&self) -> impl Iterator<Item = &S> {
        self.stack.iter().map(|active| &active.id)
    }

    pub fn is_started(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Check if the focused state's entry routine is still running.
    pub fn is_entering(&self, scheduler: &Scheduler) -> bool {
        self.stack
            .last()
            .and_then(|active| active.entry)
            .is_some_and(|handle| scheduler.status(handle) == RoutineStatus::Pending)
    }

    /// Hooks the focused state receives.
    pub fn bound_hooks(&self) -> impl Iterator<Item = Hook> + '_ {
        self.bound.iter().copied()
    }

    pub fn declared_hooks(&self) -> impl Iterator<Item = Hook> + '_ {
        self.hook_table.declared()
    }

    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    pub fn definition(&self, id: &S) -> Option<&StateDefinition<S, A>> {
        self.definitions.get(id)
    }

    /// Exit routines submitted by popped states that are still running.
    pub fn exit_routines(&self) -> &[RoutineHandle] {
        &self.exits
    }

    fn ensure_running(&self) -> Result<(), ConfigurationError> {
        match self.phase {
            Phase::Running => Ok(()),
            Phase::Configuring => Err(ConfigurationError::not_configured("machine has not been started")),
            Phase::Stopped => Err(ConfigurationError::not_configured("machine has been torn down")),
        }
    }

    /// Id of the focused state, provided it may be transitioned away from.
    fn focused_for_transition(&mut self, scheduler: &Scheduler) -> Result<S, MachineError> {
        self.ensure_running()?;
        self.settle_entry(scheduler);
        let top = self
            .stack
            .last()
            .ok_or_else(|| ConfigurationError::not_configured("machine has no active state"))?;
        if top.entry.is_some() {
            return Err(TransitionError::Entering {
                state: top.id.name().to_string(),
            }
            .into());
        }
        Ok(top.id.clone())
    }

    fn check_targets(&self) -> Result<(), ConfigurationError> {
        for definition in self.definitions.values() {
            if let Some(missing) = definition
                .targets()
                .find(|target| !self.definitions.contains_key(*target))
            {
                return Err(ConfigurationError::not_configured(format!(
                    "state '{}' permits unregistered state '{}'",
                    definition.id.name(),
                    missing.name()
                )));
            }
        }
        Ok(())
    }

    fn check_arguments(&self, target: &S, args: &A) -> Result<(), ArgumentError> {
        let Some(rules) = self.definitions.get(target).and_then(|d| d.arguments.as_ref()) else {
            return Ok(());
        };
        let violations = rules.violations(args);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ArgumentError {
                state: target.name().to_string(),
                violations,
            })
        }
    }

    /// Forget the entry routine of the focused state once it is done.
    fn settle_entry(&mut self, scheduler: &Scheduler) {
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        if let Some(handle) = top.entry {
            if scheduler.status(handle) != RoutineStatus::Pending {
                debug!(machine = %self.id, state = top.id.name(), "entry settled");
                top.entry = None;
            }
        }
    }

    fn push(&mut self, id: S) {
        let Some(definition) = self.definitions.get(&id) else {
            return;
        };
        let behavior = definition.instantiate();
        debug!(machine = %self.id, state = id.name(), depth = self.stack.len() + 1, "state pushed");
        self.stack.push(ActiveState {
            id,
            behavior,
            entry: None,
        });
        self.rebind();
    }

    fn pop_and_exit(&mut self, scheduler: &mut Scheduler) {
        let Some(mut active) = self.stack.pop() else {
            return;
        };
        if let Some(handle) = active.entry.take() {
            scheduler.cancel(handle);
        }
        debug!(machine = %self.id, state = active.id.name(), "state popped");

        let progress = {
            let mut cx = Context::new(scheduler, &active.id, None);
            active.behavior.on_exit(&mut cx)
        };
        self.exits.retain(|handle| scheduler.status(*handle) == RoutineStatus::Pending);
        if let Progress::Running(routine) = progress {
            let handle = scheduler.enroll(routine);
            if scheduler.status(handle) == RoutineStatus::Pending {
                self.exits.push(handle);
            }
        }
    }

    fn enter_top(&mut self, scheduler: &mut Scheduler, args: A) -> Vec<Request<S, A>> {
        let mut requests = Vec::new();
        let Some(top) = self.stack.last_mut() else {
            return requests;
        };

        let progress = {
            let mut cx = Context::new(scheduler, &top.id, Some(&mut requests));
            top.behavior.on_enter(&mut cx, args)
        };
        if let Progress::Running(routine) = progress {
            let handle = scheduler.enroll(routine);
            if scheduler.status(handle) == RoutineStatus::Pending {
                debug!(machine = %self.id, state = top.id.name(), %handle, "state entering");
                top.entry = Some(handle);
            }
        }
        requests
    }

    fn apply(&mut self, scheduler: &mut Scheduler, requests: Vec<Request<S, A>>) -> Result<(), MachineError> {
        for request in requests {
            match request {
                Request::Transition { target, args } => self.transition(scheduler, target, args)?,
                Request::Parent => self.transition_to_parent(scheduler)?,
            }
        }
        Ok(())
    }

    fn rebind(&mut self) {
        self.bound = match self.stack.last() {
            Some(top) => self.hook_table.hooks_for(&top.id),
            None => BTreeSet::new(),
        };
        trace!(machine = %self.id, hooks = self.bound.len(), "hooks rebound");
    }

    fn record(&mut self, scheduler: &Scheduler, from: S, to: S, kind: TransitionKind) {
        self.history.record(StateTransition {
            from,
            to,
            kind,
            frame: scheduler.frame(),
            timestamp: Utc::now(),
        });
    }
}

impl<S: State, A: 'static> Default for StateMachine<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, A: 'static> Drop for StateMachine<S, A> {
    fn drop(&mut self) {
        if self.phase == Phase::Running && !self.stack.is_empty() {
            warn!(
                machine = %self.id,
                depth = self.stack.len(),
                "state machine dropped without teardown; states were not exited"
            );
        }
    }
}
