//! Stagehand: cooperative routines and hierarchical state machines for games
//!
//! Stagehand splits frame-driven control flow into two halves. The
//! [`scheduler`] runs cooperative routines that suspend themselves with a
//! small, closed set of yield commands, and the [`machine`] keeps a stack of
//! game states whose multi-tick entry and exit work runs on that scheduler.
//! The host owns both and drives them once per frame: tick the scheduler,
//! then dispatch hooks to the focused state.
//!
//! # Core Concepts
//!
//! - **Routines**: resumable computations yielding [`YieldCommand`]s
//! - **States**: type-safe identifiers via the [`State`] trait, each with a
//!   behavior created fresh on every entry
//! - **Transitions**: normal (replace the focused state) or child (push
//!   above it), declared per state and checked on every request
//! - **Hooks**: named per-frame callbacks delivered only to the focused state
//! - **History**: bounded record of every change of focus
//!
//! # Example
//!
//! ```rust
//! use stagehand::core::{Hook, StateId, YieldCommand};
//! use stagehand::machine::{Behavior, Context, Progress, StateMachine};
//! use stagehand::scheduler::{routine, Scheduler};
//!
//! struct Title;
//!
//! impl Behavior<StateId, ()> for Title {
//!     fn on_enter(&mut self, _cx: &mut Context<'_, StateId, ()>, _args: ()) -> Progress {
//!         // Fade in over three frames.
//!         Progress::running(routine::sequence(vec![YieldCommand::WaitFrames(3)]))
//!     }
//! }
//!
//! struct Game {
//!     frames: u32,
//! }
//!
//! impl Behavior<StateId, ()> for Game {
//!     fn hooks() -> &'static [Hook] {
//!         &[Hook::PER_FRAME]
//!     }
//!
//!     fn on_hook(&mut self, _hook: Hook, _cx: &mut Context<'_, StateId, ()>, _args: &()) {
//!         self.frames += 1;
//!     }
//! }
//!
//! let mut scheduler = Scheduler::new();
//! let mut machine = StateMachine::new();
//! machine.register(StateId::from("title"), || Title, [StateId::from("game")], []).unwrap();
//! machine.register(StateId::from("game"), || Game { frames: 0 }, [], []).unwrap();
//! machine.start(&mut scheduler, StateId::from("title"), ()).unwrap();
//!
//! for _ in 0..3 {
//!     scheduler.tick(1, 1.0 / 60.0);
//!     machine.dispatch(&mut scheduler, Hook::PER_FRAME, &()).unwrap();
//! }
//! assert!(!machine.is_entering(&scheduler));
//!
//! machine.transition(&mut scheduler, StateId::from("game"), ()).unwrap();
//! assert!(machine.dispatch(&mut scheduler, Hook::PER_FRAME, &()).unwrap());
//! machine.teardown(&mut scheduler);
//! ```

pub mod builder;
pub mod core;
pub mod machine;
pub mod scheduler;
pub mod snapshot;
pub mod validation;

// Re-export commonly used types
pub use builder::{BuildError, StateBuilder, StateMachineBuilder};
pub use core::{Hook, RoutineHandle, State, StateHistory, StateId, StateTransition, YieldCommand};
pub use machine::{Behavior, Context, MachineError, Progress, StateMachine};
pub use scheduler::{Routine, RoutineStatus, Scheduler, Step};
pub use snapshot::MachineSnapshot;
