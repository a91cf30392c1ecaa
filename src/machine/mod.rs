//! Hierarchical state machine driven by a cooperative scheduler.
//!
//! # Key Concepts
//!
//! - **Stack of states**: child transitions push above the focused state,
//!   normal transitions replace it
//! - **Fresh behaviors**: every entry creates a new [`Behavior`] from the
//!   state's factory
//! - **Hooks**: only the focused state receives dispatched hooks, and only
//!   the hooks its behavior declared
//! - **Entering**: multi-tick entry work runs on the scheduler; until it
//!   finishes the state is not sent hooks and cannot be left
//!
//! # Example
//!
//! ```rust
//! use stagehand::core::{Hook, StateId, YieldCommand};
//! use stagehand::machine::{Behavior, Context, Progress, StateMachine};
//! use stagehand::scheduler::{routine, Scheduler};
//!
//! struct FadeIn;
//!
//! impl Behavior<StateId, ()> for FadeIn {
//!     fn hooks() -> &'static [Hook] {
//!         &[Hook::PER_FRAME]
//!     }
//!
//!     fn on_enter(&mut self, _cx: &mut Context<'_, StateId, ()>, _args: ()) -> Progress {
//!         Progress::running(routine::sequence(vec![YieldCommand::WaitFrames(2)]))
//!     }
//! }
//!
//! let mut scheduler = Scheduler::new();
//! let mut machine = StateMachine::new();
//! machine.register(StateId::from("title"), || FadeIn, [], []).unwrap();
//! machine.start(&mut scheduler, StateId::from("title"), ()).unwrap();
//!
//! assert!(!machine.dispatch(&mut scheduler, Hook::PER_FRAME, &()).unwrap());
//! scheduler.tick(1, 0.016);
//! scheduler.tick(1, 0.016);
//! assert!(machine.dispatch(&mut scheduler, Hook::PER_FRAME, &()).unwrap());
//! ```

mod behavior;
mod definition;
mod error;
#[allow(clippy::module_inception)]
mod machine;

pub use behavior::{Behavior, Context, Progress};
pub use definition::{BehaviorFactory, StateDefinition};
pub use error::{ArgumentError, ConfigurationError, MachineError, TransitionError};
pub use machine::StateMachine;
