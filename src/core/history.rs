//! State transition history tracking.
//!
//! Records every change of a machine's focused state, so a host can inspect
//! how an entity arrived where it is.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the stack changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionKind {
    /// The focused state was exited and replaced.
    Sibling,

    /// A child was pushed above the focused state, which stays suspended.
    Child,

    /// The focused child was exited and its parent resumed.
    Parent,
}

/// Record of a single change of focus.
///
/// # Example
///
/// ```rust
/// use stagehand::core::{StateId, StateTransition, TransitionKind};
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: StateId::from("in-game"),
///     to: StateId::from("options"),
///     kind: TransitionKind::Child,
///     frame: 120,
///     timestamp: Utc::now(),
/// };
///
/// assert_eq!(transition.kind, TransitionKind::Child);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state that had focus before the transition
    pub from: S,
    /// The state that has focus after the transition
    pub to: S,
    /// Whether the stack was replaced, pushed or popped
    pub kind: TransitionKind,
    /// Scheduler frame at which the transition happened
    pub frame: u64,
    /// Wall-clock time of the transition
    pub timestamp: DateTime<Utc>,
}

/// Ordered, optionally bounded history of transitions.
///
/// When a limit is set, recording past it drops the oldest entries.
///
/// # Example
///
/// ```rust
/// use stagehand::core::{StateHistory, StateId, StateTransition, TransitionKind};
/// use chrono::Utc;
///
/// let mut history = StateHistory::new();
///
/// history.record(StateTransition {
///     from: StateId::from("start-screen"),
///     to: StateId::from("in-game"),
///     kind: TransitionKind::Sibling,
///     frame: 10,
///     timestamp: Utc::now(),
/// });
///
/// history.record(StateTransition {
///     from: StateId::from("in-game"),
///     to: StateId::from("options"),
///     kind: TransitionKind::Child,
///     frame: 42,
///     timestamp: Utc::now(),
/// });
///
/// let path = history.get_path();
/// assert_eq!(path.len(), 3); // start-screen -> in-game -> options
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
    limit: Option<usize>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new, unbounded, empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            limit: None,
        }
    }

    /// Create an empty history that keeps at most `limit` transitions.
    ///
    /// ```rust
    /// use stagehand::core::{StateHistory, StateId};
    ///
    /// let history: StateHistory<StateId> = StateHistory::with_limit(64);
    /// assert_eq!(history.limit(), Some(64));
    /// ```
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: Vec::new(),
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Record a transition, evicting the oldest entries beyond the limit.
    pub fn record(&mut self, transition: StateTransition<S>) {
        self.transitions.push(transition);
        if let Some(limit) = self.limit {
            if self.transitions.len() > limit {
                let excess = self.transitions.len() - limit;
                self.transitions.drain(..excess);
            }
        }
    }

    /// Get the path of states traversed.
    ///
    /// Returns references to states in order: the `from` state of the oldest
    /// retained transition, then the `to` state of each transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Calculate total duration from first to last transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Get all retained transitions, oldest first.
    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
