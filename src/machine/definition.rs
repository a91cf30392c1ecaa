//! State definitions: a behavior factory plus the transitions it permits.

use crate::core::{Hook, State, TransitionKind};
use crate::machine::behavior::Behavior;
use crate::validation::ArgumentRules;
use std::collections::HashSet;

/// Type alias for behavior factories.
/// Each push of the state calls the factory for a fresh behavior.
pub type BehaviorFactory<S, A> = Box<dyn Fn() -> Box<dyn Behavior<S, A>>>;

/// A state as registered with a machine.
///
/// `normal_targets` are replaced into (the current state exits);
/// `child_targets` are pushed above the current state, which stays on the
/// stack suspended.
pub struct StateDefinition<S: State, A: 'static> {
    pub id: S,
    pub factory: BehaviorFactory<S, A>,
    pub normal_targets: HashSet<S>,
    pub child_targets: HashSet<S>,
    pub hooks: &'static [Hook],
    pub arguments: Option<ArgumentRules<A>>,
}

impl<S: State, A: 'static> StateDefinition<S, A> {
    /// Define a state from a factory of concrete behaviors.
    ///
    /// The hooks the behavior declares are captured here, once.
    pub fn new<B, F>(
        id: S,
        factory: F,
        normal_targets: impl IntoIterator<Item = S>,
        child_targets: impl IntoIterator<Item = S>,
    ) -> Self
    where
        B: Behavior<S, A> + 'static,
        F: Fn() -> B + 'static,
    {
        Self {
            id,
            factory: Box::new(move || Box::new(factory()) as Box<dyn Behavior<S, A>>),
            normal_targets: normal_targets.into_iter().collect(),
            child_targets: child_targets.into_iter().collect(),
            hooks: B::hooks(),
            arguments: None,
        }
    }

    /// Attach argument rules checked before each entry.
    pub fn with_arguments(mut self, rules: ArgumentRules<A>) -> Self {
        self.arguments = Some(rules);
        self
    }

    /// How a transition from this state to `target` changes the stack (pure).
    ///
    /// A target listed both ways is a normal transition.
    pub fn classify(&self, target: &S) -> Option<TransitionKind> {
        if self.normal_targets.contains(target) {
            Some(TransitionKind::Sibling)
        } else if self.child_targets.contains(target) {
            Some(TransitionKind::Child)
        } else {
            None
        }
    }

    /// Every state this one may transition to.
    pub fn targets(&self) -> impl Iterator<Item = &S> {
        self.normal_targets.iter().chain(self.child_targets.iter())
    }

    pub(crate) fn instantiate(&self) -> Box<dyn Behavior<S, A>> {
        (self.factory)()
    }
}
