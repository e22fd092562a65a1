//! # Property-Based Tests
//!
//! Invariants of the journey state under arbitrary operation sequences and
//! arbitrary stored snapshots.

#![allow(clippy::unwrap_used, clippy::panic)]

use proptest::collection::vec;
use proptest::prelude::*;
use serde_json::{Map, Value, json};
use std::rc::Rc;
use terravision_core::catalog::{self, SEATS, TIMELINES};
use terravision_core::primitives::JOURNEY_KEY;
use terravision_core::{
    Focus, Habitat, JourneyField, JourneyMachine, JourneyMount, JourneyState, JourneyTiming,
    LocalTime, MemoryStore, SharedContext, SnapshotStore, StageId, TimerSupport, hydrate,
};

// =============================================================================
// HELPERS
// =============================================================================

const ALL_FIELDS: [JourneyField; 8] = [
    JourneyField::SelectedSeat,
    JourneyField::Countdown,
    JourneyField::AiFocus,
    JourneyField::Habitat,
    JourneyField::MiniNodes,
    JourneyField::MiniComplete,
    JourneyField::CrisisChoice,
    JourneyField::Timeline,
];

fn is_set(state: &JourneyState, field: JourneyField) -> bool {
    match field {
        JourneyField::SelectedSeat => state.selected_seat.is_some(),
        JourneyField::Countdown => state.countdown.is_some(),
        JourneyField::AiFocus => state.ai_focus.is_some(),
        JourneyField::Habitat => state.habitat.is_some(),
        JourneyField::MiniNodes => state.mini_nodes.iter().any(|n| *n),
        JourneyField::MiniComplete => state.mini_complete,
        JourneyField::CrisisChoice => state.crisis_choice.is_some(),
        JourneyField::Timeline => state.timeline.is_some(),
    }
}

/// Invariants every reachable or hydrated state must satisfy.
/// Invariants that hold for any hydrated state.
fn check_ledger(state: &JourneyState) -> Result<(), TestCaseError> {
    prop_assert_eq!(
        state.mini_complete,
        state.mini_nodes == catalog::mini_target(state.ai_focus)
    );
    let mut seen: Vec<StageId> = state.stamps.iter().map(|s| s.stage_id).collect();
    seen.sort();
    seen.dedup();
    prop_assert_eq!(seen.len(), state.stamps.len());
    Ok(())
}

/// Invariants that hold for any state reached through operations.
fn check_invariants(state: &JourneyState) -> Result<(), TestCaseError> {
    check_ledger(state)?;
    for stamp in &state.stamps {
        prop_assert!(stamp.stage_id < state.stage, "stamp {} at {}", stamp.stage_id, state.stage);
    }
    for field in ALL_FIELDS {
        if field.owner() > state.stage {
            prop_assert!(!is_set(state, field), "{:?} set at {}", field, state.stage);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Confirm,
    Retreat,
    Seat(usize),
    Focus(usize),
    Habitat(usize),
    Toggle(usize),
    Crisis(usize),
    Timeline(usize),
    Restart,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Confirm),
        3 => Just(Op::Retreat),
        2 => (0..SEATS.len()).prop_map(Op::Seat),
        2 => (0..Focus::ALL.len()).prop_map(Op::Focus),
        2 => (0..Habitat::ALL.len()).prop_map(Op::Habitat),
        3 => (0..4usize).prop_map(Op::Toggle),
        2 => (0..3usize).prop_map(Op::Crisis),
        2 => (0..TIMELINES.len()).prop_map(Op::Timeline),
        1 => Just(Op::Restart),
    ]
}

fn apply(machine: &mut JourneyMachine, op: Op) {
    match op {
        Op::Confirm => {
            machine.confirm(0);
        }
        Op::Retreat => {
            machine.retreat();
        }
        Op::Seat(i) => {
            machine.select_seat(SEATS[i].id);
        }
        Op::Focus(i) => {
            machine.select_focus(Focus::ALL[i].as_str());
        }
        Op::Habitat(i) => {
            machine.select_habitat(Habitat::ALL[i].as_str());
        }
        Op::Toggle(i) => {
            machine.toggle_mini_node(i);
        }
        Op::Crisis(i) => {
            let id = catalog::crisis_script(machine.state().ai_focus).options[i].id;
            machine.select_crisis(id);
        }
        Op::Timeline(i) => {
            machine.select_timeline(TIMELINES[i].id);
        }
        Op::Restart => machine.restart(),
    }
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (0u64..10).prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,8}".prop_map(Value::from),
        vec(any::<bool>(), 0..5).prop_map(|v| json!(v)),
        Just(json!("eco")),
        Just(json!("B4")),
        Just(json!(" RING ")),
        Just(json!(1.5)),
        Just(json!({"id": "2200", "label": "x", "vista": "y"})),
        Just(json!({"id": "nudge", "label": "x", "outcome": "y"})),
        Just(json!([{"stageId": "launch", "label": "l", "detail": "d"}])),
    ]
}

const SNAPSHOT_KEYS: [&str; 11] = [
    "stageIndex",
    "selectedSeat",
    "aiFocus",
    "habitat",
    "miniNodes",
    "miniComplete",
    "crisisChoice",
    "timeline",
    "stamps",
    "ambientOn",
    "introDismissed",
];

fn stored_snapshot() -> impl Strategy<Value = Value> {
    vec((prop::sample::select(SNAPSHOT_KEYS.to_vec()), leaf()), 0..12).prop_map(|entries| {
        let map: Map<String, Value> = entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        Value::Object(map)
    })
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// The solved flag always equals "nodes match the focus target".
    #[test]
    fn mini_complete_is_pure(focus in prop::option::of(0..3usize), nodes in prop::array::uniform3(any::<bool>())) {
        let mut state = JourneyState::initial();
        state.ai_focus = focus.map(|i| Focus::ALL[i]);
        state.mini_nodes = nodes;
        state.recompute_mini_complete();
        prop_assert_eq!(state.mini_complete, nodes == catalog::mini_target(state.ai_focus));
    }

    /// Any sequence of operations keeps choices and stamps behind the stage,
    /// and every written snapshot hydrates back to the live state.
    #[test]
    fn operation_sequences_preserve_invariants(ops in vec(op(), 0..60)) {
        let store = Rc::new(MemoryStore::new(JOURNEY_KEY));
        let mut machine = JourneyMachine::mount(
            JourneyMount {
                profile: None,
                mission_key: "bio-harmonics".into(),
                local_time: LocalTime::new(18, 45),
                timing: JourneyTiming { support: TimerSupport::Unavailable, ..JourneyTiming::default() },
                context: SharedContext::new(false),
                store: Rc::clone(&store) as Rc<dyn SnapshotStore>,
            },
            0,
        );
        machine.begin_journey();

        for op in ops {
            apply(&mut machine, op);
            check_invariants(machine.state())?;
            let stored = store.contents().expect("snapshot written");
            prop_assert_eq!(&hydrate(&stored).state, machine.state());
        }
    }

    /// Retreating from any stage clears exactly what the table names for the
    /// target and leaves upstream choices alone.
    #[test]
    fn retreat_clears_downstream_only(steps in 1usize..7, focus in 0..3usize) {
        let store = Rc::new(MemoryStore::new(JOURNEY_KEY));
        let mut machine = JourneyMachine::mount(
            JourneyMount {
                profile: None,
                mission_key: "solar-architect".into(),
                local_time: LocalTime::new(3, 0),
                timing: JourneyTiming { support: TimerSupport::Unavailable, ..JourneyTiming::default() },
                context: SharedContext::new(false),
                store: Rc::clone(&store) as Rc<dyn SnapshotStore>,
            },
            0,
        );
        machine.begin_journey();
        let focus = Focus::ALL[focus];
        let target = catalog::mini_target(Some(focus));
        for _ in 0..steps {
            match machine.stage() {
                StageId::Launch => { machine.select_seat("A1"); }
                StageId::AiGuide => { machine.select_focus(focus.as_str()); }
                StageId::Colony => { machine.select_habitat("dome"); }
                StageId::Purpose => {
                    for (i, on) in target.iter().enumerate() {
                        if *on { machine.toggle_mini_node(i); }
                    }
                }
                StageId::Crisis => {
                    let id = catalog::crisis_script(Some(focus)).options[0].id;
                    machine.select_crisis(id);
                }
                StageId::Vision => { machine.select_timeline("2125"); }
                StageId::Legacy => {}
            }
            prop_assert!(machine.confirm(0));
        }

        let before = machine.state().clone();
        prop_assert!(machine.retreat());
        let after = machine.state();
        let cleared = terravision_core::cleared_on_retreat_into(after.stage);
        for field in ALL_FIELDS {
            if cleared.contains(&field) {
                prop_assert!(!is_set(after, field), "{:?} survived", field);
            } else {
                prop_assert_eq!(is_set(after, field), is_set(&before, field), "{:?} changed", field);
            }
        }
        prop_assert!(after.stamps.iter().all(|s| s.stage_id < after.stage));
        check_invariants(after)?;
    }

    /// Hydration accepts any stored value and always yields a valid state.
    #[test]
    fn hydrate_never_panics(stored in stored_snapshot()) {
        let hydrated = hydrate(&stored);
        prop_assert!(hydrated.state.stage.index() <= StageId::LAST_INDEX);
        prop_assert_eq!(hydrated.state.countdown, None);
        check_ledger(&hydrated.state)?;
    }

    /// Non-object stored values hydrate to the initial state.
    #[test]
    fn hydrate_ignores_non_objects(stored in leaf().prop_filter("non-object", |v| !v.is_object())) {
        let hydrated = hydrate(&stored);
        prop_assert_eq!(hydrated.state, JourneyState::initial());
    }
}
