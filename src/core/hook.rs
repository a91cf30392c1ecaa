//! Named per-tick hooks and the table that binds them to states.

use super::state::State;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Name of a per-tick callback a behavior may implement.
///
/// Hooks are compared by name. Machines ship with [`Hook::PER_FRAME`] and
/// [`Hook::PER_GUI_FRAME`]; anything else is declared per machine.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Hook(&'static str);

impl Hook {
    /// Fired once per host frame, after the scheduler has ticked.
    pub const PER_FRAME: Hook = Hook("per-frame");

    /// Fired once per GUI pass.
    pub const PER_GUI_FRAME: Hook = Hook("per-gui-frame");

    /// Hooks every machine declares unless configured otherwise.
    pub const DEFAULTS: [Hook; 2] = [Self::PER_FRAME, Self::PER_GUI_FRAME];

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Lookup table from states to the hooks their behaviors implement.
///
/// The table is fixed to the hook names declared by its machine. Each state
/// binds the subset of those names its behavior declares; dispatch is then a
/// set lookup instead of any inspection of the behavior itself.
#[derive(Clone, Debug)]
pub struct HookTable<S: State> {
    declared: BTreeSet<Hook>,
    bindings: HashMap<S, BTreeSet<Hook>>,
}

impl<S: State> HookTable<S> {
    pub fn new(declared: impl IntoIterator<Item = Hook>) -> Self {
        Self {
            declared: declared.into_iter().collect(),
            bindings: HashMap::new(),
        }
    }

    /// Check if the machine declares this hook name.
    pub fn declares(&self, hook: Hook) -> bool {
        self.declared.contains(&hook)
    }

    pub fn declared(&self) -> impl Iterator<Item = Hook> + '_ {
        self.declared.iter().copied()
    }

    /// Bind a state to the hooks its behavior implements.
    ///
    /// Returns the implemented hooks the machine does not declare; those are
    /// left unbound.
    pub fn bind(&mut self, state: S, implemented: &[Hook]) -> Vec<Hook> {
        let (bound, ignored): (Vec<Hook>, Vec<Hook>) =
            implemented.iter().copied().partition(|hook| self.declared.contains(hook));
        self.bindings.insert(state, bound.into_iter().collect());
        ignored
    }

    /// Hooks bound to a state. Unknown states bind nothing.
    pub fn hooks_for(&self, state: &S) -> BTreeSet<Hook> {
        self.bindings.get(state).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateId;

    const ON_DAMAGE: Hook = Hook::new("on-damage");

    #[test]
    fn default_hooks_are_declared() {
        let table: HookTable<StateId> = HookTable::new(Hook::DEFAULTS);

        assert!(table.declares(Hook::PER_FRAME));
        assert!(table.declares(Hook::PER_GUI_FRAME));
        assert!(!table.declares(ON_DAMAGE));
    }

    #[test]
    fn bind_keeps_only_declared_hooks() {
        let mut table = HookTable::new([Hook::PER_FRAME, ON_DAMAGE]);
        let state = StateId::from("in-game");

        let ignored = table.bind(state.clone(), &[Hook::PER_FRAME, Hook::PER_GUI_FRAME]);

        assert_eq!(ignored, vec![Hook::PER_GUI_FRAME]);
        let bound = table.hooks_for(&state);
        assert!(bound.contains(&Hook::PER_FRAME));
        assert!(!bound.contains(&Hook::PER_GUI_FRAME));
    }

    #[test]
    fn unknown_state_binds_nothing() {
        let table: HookTable<StateId> = HookTable::new(Hook::DEFAULTS);
        assert!(table.hooks_for(&StateId::from("missing")).is_empty());
    }

    #[test]
    fn hook_displays_its_name() {
        assert_eq!(Hook::PER_FRAME.to_string(), "per-frame");
        assert_eq!(ON_DAMAGE.name(), "on-damage");
    }
}
