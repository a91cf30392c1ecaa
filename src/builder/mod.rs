//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders and a macro for declaring states and
//! assembling them into a [`StateMachine`](crate::machine::StateMachine).
//!
//! # Example
//!
//! ```
//! use stagehand::builder::{state, StateMachineBuilder};
//! use stagehand::machine::Behavior;
//! use stagehand::scheduler::Scheduler;
//! use stagehand::state_enum;
//!
//! state_enum! {
//!     enum Flow {
//!         Title,
//!         Game,
//!         Options,
//!     }
//! }
//!
//! struct Screen;
//! impl Behavior<Flow, ()> for Screen {}
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut machine = StateMachineBuilder::new()
//!     .history_limit(64)
//!     .state(state(Flow::Title, || Screen).permit(Flow::Game))?
//!     .state(state(Flow::Game, || Screen).permit(Flow::Title).permit_child(Flow::Options))?
//!     .state(state(Flow::Options, || Screen))?
//!     .build()?;
//!
//! let mut scheduler = Scheduler::new();
//! machine.start(&mut scheduler, Flow::Title, ())?;
//! machine.transition(&mut scheduler, Flow::Game, ())?;
//! machine.transition(&mut scheduler, Flow::Options, ())?;
//! assert_eq!(machine.depth(), 2);
//! machine.teardown(&mut scheduler);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod machine;
pub mod macros;
pub mod state;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use state::StateBuilder;

use crate::core::State;
use crate::machine::Behavior;

/// Start a state builder with its behavior already set.
///
/// # Example
///
/// ```
/// use stagehand::builder::state;
/// use stagehand::core::StateId;
/// use stagehand::machine::Behavior;
///
/// struct Idle;
/// impl Behavior<StateId, ()> for Idle {}
///
/// let definition = state::<_, (), _, _>(StateId::from("idle"), || Idle).build().unwrap();
/// assert!(definition.targets().next().is_none());
/// ```
pub fn state<S, A, B, F>(id: S, factory: F) -> StateBuilder<S, A>
where
    S: State,
    A: 'static,
    B: Behavior<S, A> + 'static,
    F: Fn() -> B + 'static,
{
    StateBuilder::new(id).behavior(factory)
}
