//! Shared data types.
//!
//! This module holds the vocabulary both halves of the crate speak:
//! - State identifiers via the `State` trait and `StateId`
//! - Yield commands and routine handles
//! - Hook names and the hook lookup table
//! - Transition history

mod command;
mod history;
mod hook;
mod state;

pub use command::{RoutineHandle, SchedulerId, YieldCommand};
pub use history::{StateHistory, StateTransition, TransitionKind};
pub use hook::{Hook, HookTable};
pub use state::{State, StateId};
