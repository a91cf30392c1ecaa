//! Builder for constructing state definitions.

use crate::builder::error::BuildError;
use crate::core::{Hook, State};
use crate::machine::{Behavior, BehaviorFactory, StateDefinition};
use crate::validation::ArgumentRules;
use std::collections::HashSet;

/// Builder for constructing a state definition with a fluent API.
pub struct StateBuilder<S: State, A: 'static> {
    id: S,
    factory: Option<BehaviorFactory<S, A>>,
    hooks: &'static [Hook],
    normal_targets: HashSet<S>,
    child_targets: HashSet<S>,
    arguments: Option<ArgumentRules<A>>,
}

impl<S: State, A: 'static> StateBuilder<S, A> {
    /// Start describing the state `id`.
    pub fn new(id: S) -> Self {
        Self {
            id,
            factory: None,
            hooks: &[],
            normal_targets: HashSet::new(),
            child_targets: HashSet::new(),
            arguments: None,
        }
    }

    /// Set the behavior factory (required).
    pub fn behavior<B, F>(mut self, factory: F) -> Self
    where
        B: Behavior<S, A> + 'static,
        F: Fn() -> B + 'static,
    {
        self.factory = Some(Box::new(move || Box::new(factory()) as Box<dyn Behavior<S, A>>));
        self.hooks = B::hooks();
        self
    }

    /// Permit a normal transition to `target`.
    pub fn permit(mut self, target: S) -> Self {
        self.normal_targets.insert(target);
        self
    }

    /// Permit a child transition to `target`.
    pub fn permit_child(mut self, target: S) -> Self {
        self.child_targets.insert(target);
        self
    }

    /// Check entry payloads against `rules` (optional).
    pub fn arguments(mut self, rules: ArgumentRules<A>) -> Self {
        self.arguments = Some(rules);
        self
    }

    /// Build the definition.
    pub fn build(self) -> Result<StateDefinition<S, A>, BuildError> {
        let factory = self.factory.ok_or_else(|| BuildError::MissingBehavior {
            state: self.id.name().to_string(),
        })?;

        Ok(StateDefinition {
            id: self.id,
            factory,
            normal_targets: self.normal_targets,
            child_targets: self.child_targets,
            hooks: self.hooks,
            arguments: self.arguments,
        })
    }
}
