//! Game Flow
//!
//! This example drives a small game front-end: a start screen, the game
//! itself, and an options menu opened on top of the running game.
//!
//! Key concepts:
//! - Normal transitions (StartScreen <-> InGame)
//! - Child transitions (InGame -> Options, then back to the parent)
//! - Entry routines that span several frames (fade-in)
//! - The host loop: tick the scheduler, then dispatch hooks
//!
//! Run with: RUST_LOG=stagehand=debug cargo run --example game_flow

use stagehand::builder::{state, StateMachineBuilder};
use stagehand::core::{Hook, State, YieldCommand};
use stagehand::machine::{Behavior, Context, Progress};
use stagehand::scheduler::{routine, Scheduler};
use stagehand::state_enum;

state_enum! {
    enum GameState {
        StartScreen,
        InGame,
        Options,
    }
}

/// Input sampled once per frame by the host.
#[derive(Clone, Copy, Debug, Default)]
enum Input {
    #[default]
    None,
    Confirm,
    Menu,
    Back,
}

const FRAME: f64 = 1.0 / 60.0;

struct StartScreen;

impl Behavior<GameState, Input> for StartScreen {
    fn hooks() -> &'static [Hook] {
        &[Hook::PER_GUI_FRAME]
    }

    fn on_enter(&mut self, _cx: &mut Context<'_, GameState, Input>, _args: Input) -> Progress {
        println!("  [start] fading in");
        Progress::running(routine::sequence(vec![YieldCommand::WaitSeconds(0.05)]))
    }

    fn on_hook(&mut self, _hook: Hook, cx: &mut Context<'_, GameState, Input>, input: &Input) {
        if let Input::Confirm = input {
            cx.transition(GameState::InGame, *input);
        }
    }
}

#[derive(Default)]
struct InGame {
    frames: u32,
}

impl Behavior<GameState, Input> for InGame {
    fn hooks() -> &'static [Hook] {
        &[Hook::PER_FRAME, Hook::PER_GUI_FRAME]
    }

    fn on_enter(&mut self, cx: &mut Context<'_, GameState, Input>, _args: Input) -> Progress {
        println!("  [game] loading level");
        // Background music keeps looping independently of the state's entry.
        cx.spawn(routine::from_iter(std::iter::repeat(YieldCommand::WaitSeconds(1.0)).take(3)));
        Progress::running(routine::sequence(vec![YieldCommand::WaitFrames(2)]))
    }

    fn on_exit(&mut self, _cx: &mut Context<'_, GameState, Input>) -> Progress {
        println!("  [game] leaving after {} frames", self.frames);
        Progress::Done
    }

    fn on_hook(&mut self, hook: Hook, cx: &mut Context<'_, GameState, Input>, input: &Input) {
        if hook == Hook::PER_FRAME {
            self.frames += 1;
            return;
        }
        match input {
            Input::Menu => cx.transition(GameState::Options, *input),
            Input::Back => cx.transition(GameState::StartScreen, *input),
            _ => {}
        }
    }
}

struct Options;

impl Behavior<GameState, Input> for Options {
    fn hooks() -> &'static [Hook] {
        &[Hook::PER_GUI_FRAME]
    }

    fn on_enter(&mut self, _cx: &mut Context<'_, GameState, Input>, _args: Input) -> Progress {
        println!("  [options] opened over the game");
        Progress::Done
    }

    fn on_exit(&mut self, _cx: &mut Context<'_, GameState, Input>) -> Progress {
        println!("  [options] closing");
        Progress::running(routine::sequence(vec![YieldCommand::WaitFrames(1)]))
    }

    fn on_hook(&mut self, _hook: Hook, cx: &mut Context<'_, GameState, Input>, input: &Input) {
        if let Input::Back = input {
            cx.transition_to_parent();
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== Game Flow Example ===\n");

    let mut machine = StateMachineBuilder::new()
        .history_limit(32)
        .state(state(GameState::StartScreen, || StartScreen).permit(GameState::InGame))?
        .state(
            state(GameState::InGame, InGame::default)
                .permit(GameState::StartScreen)
                .permit_child(GameState::Options),
        )?
        .state(state(GameState::Options, || Options))?
        .build()?;

    let mut scheduler = Scheduler::new();
    machine.start(&mut scheduler, GameState::StartScreen, Input::None)?;

    // Scripted input, one entry per frame.
    let script = [
        Input::Confirm, // ignored: still fading in
        Input::None,
        Input::None,
        Input::Confirm,
        Input::Menu, // ignored: level still loading
        Input::None,
        Input::None,
        Input::Menu,
        Input::None,
        Input::Back,
        Input::None,
        Input::Back,
        Input::None,
    ];

    for (frame, input) in script.iter().enumerate() {
        scheduler.tick(1, FRAME);
        machine.dispatch(&mut scheduler, Hook::PER_FRAME, input)?;
        machine.dispatch(&mut scheduler, Hook::PER_GUI_FRAME, input)?;

        let stack: Vec<&str> = machine.stack().map(State::name).collect();
        let entering = if machine.is_entering(&scheduler) { " (entering)" } else { "" };
        println!("frame {:>2} {:?} -> {}{}", frame + 1, input, stack.join(" > "), entering);
    }

    println!("\nTransition history:");
    for transition in machine.history().transitions() {
        println!(
            "  frame {:>2}: {:?} -> {:?} ({:?})",
            transition.frame, transition.from, transition.to, transition.kind
        );
    }

    let snapshot = machine.snapshot(&scheduler);
    println!("\nSnapshot:\n{}", snapshot.to_json()?);

    machine.teardown(&mut scheduler);
    Ok(())
}
