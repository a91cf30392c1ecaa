//! End-to-end scenarios driving a scheduler and a state machine together.

use serde_json::json;
use stagehand::builder::{state, StateMachineBuilder};
use stagehand::core::{Hook, RoutineHandle, StateId, YieldCommand};
use stagehand::machine::{
    ArgumentError, Behavior, Context, MachineError, Progress, StateMachine, TransitionError,
};
use stagehand::scheduler::{routine, RoutineStatus, Scheduler, Step};
use stagehand::validation::{ArgumentRulesBuilder, ArgumentViolation};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

fn id(name: &'static str) -> StateId {
    StateId::from_static(name)
}

fn names(machine: &StateMachine<StateId, serde_json::Value>) -> Vec<String> {
    machine.stack().map(|s| s.to_string()).collect()
}

/// Logs lifecycle callbacks and optionally waits some frames on entry.
struct Logged {
    name: &'static str,
    log: Log,
    entry_frames: u32,
    exit_frames: u32,
}

impl Logged {
    fn factory(name: &'static str, log: &Log) -> impl Fn() -> Logged + 'static {
        Self::slow(name, log, 0, 0)
    }

    fn slow(name: &'static str, log: &Log, entry_frames: u32, exit_frames: u32) -> impl Fn() -> Logged + 'static {
        let log = log.clone();
        move || Logged {
            name,
            log: log.clone(),
            entry_frames,
            exit_frames,
        }
    }

    fn wait(frames: u32) -> Progress {
        if frames == 0 {
            Progress::Done
        } else {
            Progress::running(routine::sequence(vec![YieldCommand::WaitFrames(frames)]))
        }
    }
}

impl Behavior<StateId, serde_json::Value> for Logged {
    fn hooks() -> &'static [Hook] {
        &[Hook::PER_FRAME, Hook::PER_GUI_FRAME]
    }

    fn on_enter(&mut self, _cx: &mut Context<'_, StateId, serde_json::Value>, _args: serde_json::Value) -> Progress {
        self.log.borrow_mut().push(format!("enter {}", self.name));
        Self::wait(self.entry_frames)
    }

    fn on_exit(&mut self, _cx: &mut Context<'_, StateId, serde_json::Value>) -> Progress {
        self.log.borrow_mut().push(format!("exit {}", self.name));
        Self::wait(self.exit_frames)
    }

    fn on_hook(&mut self, hook: Hook, _cx: &mut Context<'_, StateId, serde_json::Value>, _args: &serde_json::Value) {
        self.log.borrow_mut().push(format!("{} {}", hook, self.name));
    }
}

fn count(log: &Log, line: &str) -> usize {
    log.borrow().iter().filter(|entry| *entry == line).count()
}

#[test]
fn sibling_ping_pong_between_two_states() {
    let log = Log::default();
    let mut scheduler = Scheduler::new();
    let mut machine = StateMachine::new();
    machine
        .register(id("A"), Logged::factory("A", &log), [id("B")], [])
        .unwrap();
    machine
        .register(id("B"), Logged::factory("B", &log), [id("A")], [])
        .unwrap();

    machine.start(&mut scheduler, id("A"), json!(null)).unwrap();
    assert_eq!(names(&machine), vec!["A"]);

    machine.transition(&mut scheduler, id("B"), json!(null)).unwrap();
    assert_eq!(names(&machine), vec!["B"]);
    assert_eq!(count(&log, "exit A"), 1);
    assert_eq!(count(&log, "enter B"), 1);

    machine.transition(&mut scheduler, id("A"), json!(null)).unwrap();
    assert_eq!(names(&machine), vec!["A"]);

    let result = machine.transition(&mut scheduler, id("A"), json!(null));
    assert!(matches!(
        result,
        Err(MachineError::Transition(TransitionError::UnregisteredTransition { .. }))
    ));
    assert_eq!(names(&machine), vec!["A"]);

    machine.teardown(&mut scheduler);
}

#[test]
fn wait_frames_three_finishes_on_third_tick() {
    let mut scheduler = Scheduler::new();
    let handle = scheduler.submit(routine::sequence(vec![YieldCommand::WaitFrames(3)]));

    scheduler.tick(1, 0.0);
    assert!(!scheduler.is_finished(handle));
    scheduler.tick(1, 0.0);
    assert!(!scheduler.is_finished(handle));
    scheduler.tick(1, 0.0);
    assert!(scheduler.is_finished(handle));
}

#[test]
fn sibling_exit_precedes_enter_and_child_never_exits_parent() {
    let log = Log::default();
    let mut scheduler = Scheduler::new();
    let mut machine = StateMachine::new();
    machine
        .register(id("start"), Logged::factory("start", &log), [id("game")], [])
        .unwrap();
    machine
        .register(id("game"), Logged::factory("game", &log), [id("start")], [id("options")])
        .unwrap();
    machine
        .register(id("options"), Logged::factory("options", &log), [], [])
        .unwrap();

    machine.start(&mut scheduler, id("start"), json!(null)).unwrap();
    machine.transition(&mut scheduler, id("game"), json!(null)).unwrap();
    machine.transition(&mut scheduler, id("options"), json!(null)).unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["enter start", "exit start", "enter game", "enter options"]
    );
    assert_eq!(names(&machine), vec!["game", "options"]);

    machine.transition_to_parent(&mut scheduler).unwrap();
    assert_eq!(names(&machine), vec!["game"]);
    assert_eq!(count(&log, "exit game"), 0);
    assert_eq!(count(&log, "enter game"), 1);

    machine.teardown(&mut scheduler);
}

#[test]
fn hooks_reach_only_the_top_state() {
    let log = Log::default();
    let mut scheduler = Scheduler::new();
    let mut machine = StateMachine::new();
    machine
        .register(id("game"), Logged::factory("game", &log), [], [id("options")])
        .unwrap();
    machine
        .register(id("options"), Logged::factory("options", &log), [], [])
        .unwrap();
    machine.start(&mut scheduler, id("game"), json!(null)).unwrap();
    machine.transition(&mut scheduler, id("options"), json!(null)).unwrap();

    for _ in 0..3 {
        scheduler.tick(1, 0.016);
        machine.dispatch(&mut scheduler, Hook::PER_FRAME, &json!(null)).unwrap();
        machine.dispatch(&mut scheduler, Hook::PER_GUI_FRAME, &json!(null)).unwrap();
    }

    assert_eq!(count(&log, "per-frame options"), 3);
    assert_eq!(count(&log, "per-gui-frame options"), 3);
    assert_eq!(count(&log, "per-frame game"), 0);

    machine.teardown(&mut scheduler);
}

#[test]
fn entry_finishing_this_frame_gets_the_hook_this_frame() {
    let log = Log::default();
    let mut scheduler = Scheduler::new();
    let mut machine = StateMachine::new();
    machine
        .register(id("title"), Logged::slow("title", &log, 2, 0), [], [])
        .unwrap();
    machine.start(&mut scheduler, id("title"), json!(null)).unwrap();

    let mut delivered = Vec::new();
    for frame in 1..=3 {
        scheduler.tick(1, 0.016);
        if machine.dispatch(&mut scheduler, Hook::PER_FRAME, &json!(null)).unwrap() {
            delivered.push(frame);
        }
    }

    assert_eq!(delivered, vec![2, 3]);
    machine.teardown(&mut scheduler);
}

#[test]
fn transition_while_entering_is_rejected_until_entry_settles() {
    let log = Log::default();
    let mut scheduler = Scheduler::new();
    let mut machine = StateMachine::new();
    machine
        .register(id("loading"), Logged::slow("loading", &log, 3, 0), [id("game")], [])
        .unwrap();
    machine
        .register(id("game"), Logged::factory("game", &log), [], [])
        .unwrap();
    machine.start(&mut scheduler, id("loading"), json!(null)).unwrap();

    let mut attempts = 0;
    while machine.transition(&mut scheduler, id("game"), json!(null)).is_err() {
        attempts += 1;
        scheduler.tick(1, 0.016);
    }

    assert_eq!(attempts, 3);
    assert_eq!(names(&machine), vec!["game"]);
    machine.teardown(&mut scheduler);
}

#[test]
fn exit_routines_keep_running_after_the_state_is_gone() {
    let log = Log::default();
    let mut scheduler = Scheduler::new();
    let mut machine = StateMachine::new();
    machine
        .register(id("game"), Logged::slow("game", &log, 0, 2), [id("title")], [])
        .unwrap();
    machine
        .register(id("title"), Logged::factory("title", &log), [], [])
        .unwrap();
    machine.start(&mut scheduler, id("game"), json!(null)).unwrap();
    machine.transition(&mut scheduler, id("title"), json!(null)).unwrap();

    let exits: Vec<RoutineHandle> = machine.exit_routines().to_vec();
    assert_eq!(exits.len(), 1);
    assert_eq!(names(&machine), vec!["title"]);

    scheduler.tick(1, 0.016);
    assert_eq!(scheduler.status(exits[0]), RoutineStatus::Pending);
    scheduler.tick(1, 0.016);
    assert_eq!(scheduler.status(exits[0]), RoutineStatus::Finished);

    machine.teardown(&mut scheduler);
}

/// Splash screen that moves on as soon as it is entered, and a menu that
/// opens its submenu from a hook.
struct Splash;

impl Behavior<StateId, u32> for Splash {
    fn on_enter(&mut self, cx: &mut Context<'_, StateId, u32>, args: u32) -> Progress {
        cx.transition(id("menu"), args + 1);
        Progress::Done
    }
}

struct Menu {
    seen: Rc<Cell<u32>>,
}

impl Behavior<StateId, u32> for Menu {
    fn hooks() -> &'static [Hook] {
        &[Hook::PER_GUI_FRAME]
    }

    fn on_enter(&mut self, _cx: &mut Context<'_, StateId, u32>, args: u32) -> Progress {
        self.seen.set(args);
        Progress::Done
    }

    fn on_hook(&mut self, _hook: Hook, cx: &mut Context<'_, StateId, u32>, args: &u32) {
        if *args > 0 {
            cx.transition(id("submenu"), *args);
        }
    }
}

struct Submenu;

impl Behavior<StateId, u32> for Submenu {
    fn on_exit(&mut self, cx: &mut Context<'_, StateId, u32>) -> Progress {
        // Requests made while exiting are dropped.
        cx.transition(id("splash"), 0);
        Progress::Done
    }
}

#[test]
fn requests_from_callbacks_are_applied_after_they_return() {
    let seen = Rc::new(Cell::new(0));
    let menu_seen = seen.clone();
    let mut scheduler = Scheduler::new();
    let mut machine = StateMachineBuilder::<StateId, u32>::new()
        .state(state(id("splash"), || Splash).permit(id("menu")))
        .unwrap()
        .state(
            state(id("menu"), move || Menu {
                seen: menu_seen.clone(),
            })
            .permit_child(id("submenu")),
        )
        .unwrap()
        .state(state(id("submenu"), || Submenu))
        .unwrap()
        .build()
        .unwrap();

    machine.start(&mut scheduler, id("splash"), 41).unwrap();
    assert_eq!(machine.current(), Some(&id("menu")));
    assert_eq!(seen.get(), 42);

    assert!(machine.dispatch(&mut scheduler, Hook::PER_GUI_FRAME, &0).unwrap());
    assert_eq!(machine.depth(), 1);
    assert!(machine.dispatch(&mut scheduler, Hook::PER_GUI_FRAME, &1).unwrap());
    assert_eq!(machine.depth(), 2);

    machine.transition_to_parent(&mut scheduler).unwrap();
    assert_eq!(machine.current(), Some(&id("menu")));

    machine.teardown(&mut scheduler);
}

#[test]
fn failed_request_is_reported_by_the_outer_call() {
    struct Eager;
    impl Behavior<StateId, ()> for Eager {
        fn on_enter(&mut self, cx: &mut Context<'_, StateId, ()>, _args: ()) -> Progress {
            cx.transition(id("nowhere"), ());
            Progress::Done
        }
    }

    let mut scheduler = Scheduler::new();
    let mut machine = StateMachine::new();
    machine.register(id("eager"), || Eager, [], []).unwrap();

    let result = machine.start(&mut scheduler, id("eager"), ());

    assert_eq!(
        result,
        Err(MachineError::Transition(TransitionError::UnregisteredTransition {
            from: "eager".to_string(),
            to: "nowhere".to_string(),
        }))
    );
    assert_eq!(machine.current(), Some(&id("eager")));
    machine.teardown(&mut scheduler);
}

#[test]
fn argument_rules_report_every_violation() {
    let log = Log::default();
    let mut scheduler = Scheduler::new();
    let mut machine = StateMachineBuilder::new()
        .state(state(id("lobby"), Logged::factory("lobby", &log)).permit(id("match")))
        .unwrap()
        .state(
            state(id("match"), Logged::factory("match", &log)).arguments(
                ArgumentRulesBuilder::<serde_json::Value>::new()
                    .require_field("map")
                    .require_field("players")
                    .build(),
            ),
        )
        .unwrap()
        .build()
        .unwrap();
    machine.start(&mut scheduler, id("lobby"), json!(null)).unwrap();

    let result = machine.transition(&mut scheduler, id("match"), json!({ "mode": "ffa" }));
    assert_eq!(
        result,
        Err(MachineError::Argument(ArgumentError {
            state: "match".to_string(),
            violations: vec![
                ArgumentViolation::MissingField {
                    field: "map".to_string()
                },
                ArgumentViolation::MissingField {
                    field: "players".to_string()
                },
            ],
        }))
    );
    assert_eq!(names(&machine), vec!["lobby"]);
    assert_eq!(count(&log, "exit lobby"), 0);

    machine
        .transition(&mut scheduler, id("match"), json!({ "map": "dust", "players": 8 }))
        .unwrap();
    assert_eq!(names(&machine), vec!["match"]);
    machine.teardown(&mut scheduler);
}

#[test]
fn behaviors_can_spawn_routines_that_wait_on_each_other() {
    struct Cutscene {
        order: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Behavior<StateId, ()> for Cutscene {
        fn on_enter(&mut self, cx: &mut Context<'_, StateId, ()>, _args: ()) -> Progress {
            let camera_order = self.order.clone();
            let mut moved = false;
            let camera = cx.spawn(routine::from_fn(move |_| {
                if moved {
                    camera_order.borrow_mut().push("camera");
                    Step::Complete
                } else {
                    moved = true;
                    Step::Yield(YieldCommand::WaitFrames(2))
                }
            }));

            let dialog_order = self.order.clone();
            let mut waited = false;
            Progress::running(routine::from_fn(move |_| {
                if waited {
                    dialog_order.borrow_mut().push("dialog");
                    Step::Complete
                } else {
                    waited = true;
                    Step::Yield(YieldCommand::WaitOn(camera))
                }
            }))
        }
    }

    let order = Rc::new(RefCell::new(Vec::new()));
    let cutscene_order = order.clone();
    let mut scheduler = Scheduler::new();
    let mut machine = StateMachine::new();
    machine
        .register(
            id("cutscene"),
            move || Cutscene {
                order: cutscene_order.clone(),
            },
            [],
            [],
        )
        .unwrap();
    machine.start(&mut scheduler, id("cutscene"), ()).unwrap();

    scheduler.tick(1, 0.016);
    assert!(machine.is_entering(&scheduler));
    scheduler.tick(1, 0.016);
    assert!(!machine.is_entering(&scheduler));
    assert_eq!(*order.borrow(), vec!["camera", "dialog"]);

    machine.teardown(&mut scheduler);
}

#[test]
fn teardown_exits_everything_and_stops_the_machine() {
    let log = Log::default();
    let mut scheduler = Scheduler::new();
    let mut machine = StateMachine::new();
    machine
        .register(id("game"), Logged::factory("game", &log), [], [id("pause")])
        .unwrap();
    machine
        .register(id("pause"), Logged::slow("pause", &log, 10, 0), [], [])
        .unwrap();
    machine.start(&mut scheduler, id("game"), json!(null)).unwrap();
    machine.transition(&mut scheduler, id("pause"), json!(null)).unwrap();
    assert!(machine.is_entering(&scheduler));

    machine.teardown(&mut scheduler);

    assert_eq!(machine.depth(), 0);
    assert!(scheduler.is_empty());
    assert_eq!(&log.borrow()[2..], &["exit pause".to_string(), "exit game".to_string()]);
    assert!(machine
        .transition(&mut scheduler, id("game"), json!(null))
        .is_err());
}
