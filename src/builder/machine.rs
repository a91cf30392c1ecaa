//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::state::StateBuilder;
use crate::core::{Hook, State, StateHistory};
use crate::machine::{StateDefinition, StateMachine};

/// Builder for constructing state machines with a fluent API.
pub struct StateMachineBuilder<S: State, A: 'static> {
    hooks: Vec<Hook>,
    history_limit: Option<usize>,
    states: Vec<StateDefinition<S, A>>,
}

impl<S: State, A: 'static> StateMachineBuilder<S, A> {
    /// Create a new builder declaring the default hooks.
    pub fn new() -> Self {
        Self {
            hooks: Hook::DEFAULTS.to_vec(),
            history_limit: None,
            states: Vec::new(),
        }
    }

    /// Replace the declared hook set.
    pub fn hooks(mut self, hooks: impl IntoIterator<Item = Hook>) -> Self {
        self.hooks = hooks.into_iter().collect();
        self
    }

    /// Declare one more hook.
    pub fn hook(mut self, hook: Hook) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Keep at most `limit` entries of transition history.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Add a state using a builder.
    /// Returns an error if the builder fails validation.
    pub fn state(mut self, builder: StateBuilder<S, A>) -> Result<Self, BuildError> {
        let definition = builder.build()?;
        self.states.push(definition);
        Ok(self)
    }

    /// Add a pre-built state definition.
    pub fn add_state(mut self, definition: StateDefinition<S, A>) -> Self {
        self.states.push(definition);
        self
    }

    /// Build the state machine.
    /// Returns an error if no states were added or a state is registered twice.
    pub fn build(self) -> Result<StateMachine<S, A>, BuildError> {
        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let mut machine = StateMachine::with_hooks(self.hooks);
        if let Some(limit) = self.history_limit {
            machine.set_history(StateHistory::with_limit(limit));
        }
        for definition in self.states {
            machine.register_definition(definition)?;
        }

        Ok(machine)
    }
}

impl<S: State, A: 'static> Default for StateMachineBuilder<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::state;
    use crate::machine::{Behavior, ConfigurationError};
    use crate::scheduler::Scheduler;
    use crate::state_enum;

    state_enum! {
        enum Screen {
            Title,
            Game,
            Pause,
        }
    }

    struct Plain;
    impl Behavior<Screen, ()> for Plain {}

    #[test]
    fn builder_requires_states() {
        let result = StateMachineBuilder::<Screen, ()>::new().build();

        assert!(matches!(result, Err(BuildError::NoStates)));
    }

    #[test]
    fn builder_rejects_duplicate_states() {
        let result = StateMachineBuilder::<Screen, ()>::new()
            .state(state(Screen::Title, || Plain))
            .and_then(|builder| builder.state(state(Screen::Title, || Plain)))
            .and_then(|builder| builder.build());

        assert!(matches!(
            result,
            Err(BuildError::Configuration(ConfigurationError::DuplicateState { .. }))
        ));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let mut machine = StateMachineBuilder::new()
            .hooks([Hook::PER_FRAME])
            .history_limit(2)
            .state(state(Screen::Title, || Plain).permit(Screen::Game))
            .unwrap()
            .state(state(Screen::Game, || Plain).permit(Screen::Title).permit_child(Screen::Pause))
            .unwrap()
            .state(state(Screen::Pause, || Plain))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(machine.declared_hooks().collect::<Vec<_>>(), vec![Hook::PER_FRAME]);
        assert!(machine.definition(&Screen::Pause).is_some());

        let mut scheduler = Scheduler::new();
        machine.start(&mut scheduler, Screen::Title, ()).unwrap();
        for _ in 0..2 {
            machine.transition(&mut scheduler, Screen::Game, ()).unwrap();
            machine.transition(&mut scheduler, Screen::Title, ()).unwrap();
        }
        assert_eq!(machine.history().len(), 2);
        machine.teardown(&mut scheduler);
    }

    #[test]
    fn hook_adds_to_defaults() {
        let machine = StateMachineBuilder::<Screen, ()>::new()
            .hook(Hook::new("on-pause"))
            .add_state(state(Screen::Title, || Plain).build().unwrap())
            .build()
            .unwrap();

        assert_eq!(machine.declared_hooks().count(), 3);
    }
}
