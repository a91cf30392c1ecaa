//! State identifiers.
//!
//! A state machine refers to its state definitions through identifiers.
//! Identifiers are plain values: two identifiers name the same state exactly
//! when they compare equal.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;

/// Trait for values that identify a state definition within one machine.
///
/// # Required Traits
///
/// - `Clone`: identifiers are copied onto the stack and into history
/// - `Eq` + `Hash`: identifiers key the definition and hook tables
/// - `Debug`: identifiers appear in diagnostics
/// - `Serialize` + `Deserialize`: identifiers are part of snapshots
///
/// Use [`StateId`] for string-backed identifiers, or the
/// [`state_enum!`](crate::state_enum) macro for enum-backed ones.
///
/// # Example
///
/// ```rust
/// use stagehand::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Screen {
///     Title,
///     Playing,
/// }
///
/// impl State for Screen {
///     fn name(&self) -> &str {
///         match self {
///             Self::Title => "Title",
///             Self::Playing => "Playing",
///         }
///     }
/// }
///
/// assert_eq!(Screen::Playing.name(), "Playing");
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

/// String-backed state identifier.
///
/// Identifiers built from string literals are `const` and allocation free,
/// which makes them suitable for a table of well-known states:
///
/// ```rust
/// use stagehand::core::{State, StateId};
///
/// const IN_GAME: StateId = StateId::from_static("in-game");
///
/// assert_eq!(IN_GAME.name(), "in-game");
/// assert_eq!(IN_GAME, StateId::from(String::from("in-game")));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(Cow<'static, str>);

impl StateId {
    /// Create an identifier from a static string.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Create an identifier from any string.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl State for StateId {
    fn name(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for StateId {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for StateId {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateId({:?})", self.0)
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
