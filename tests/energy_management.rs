// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the energy management core decision logic.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use energy_management::types::{InputKind, InputSnapshot, PowerState};
use energy_management::{
    EnergyManagement, Error, InputBindings, StateChange, Subscribable,
};
use parking_lot::Mutex;

/// Expected decision for every input combination, one row per case.
///
/// Columns: load shed, energy saving, turn on after shedding, energy saving
/// overwritten, shedding stop requested, expected device state.
#[rustfmt::skip]
const TRUTH_TABLE: [(bool, bool, bool, bool, bool, bool); 32] = [
    (false, false, false, false, false, false),
    (true,  false, false, false, false, false),
    (false, true,  false, false, false, false),
    (true,  true,  false, false, false, false),
    (false, false, true,  false, false, true),
    (true,  false, true,  false, false, false),
    (false, true,  true,  false, false, false),
    (true,  true,  true,  false, false, false),
    (false, false, false, true,  false, false),
    (true,  false, false, true,  false, false),
    (false, true,  false, true,  false, false),
    (true,  true,  false, true,  false, true),
    (false, false, true,  true,  false, true),
    (true,  false, true,  true,  false, false),
    (false, true,  true,  true,  false, true),
    (true,  true,  true,  true,  false, true),
    (false, false, false, false, true,  false),
    (true,  false, false, false, true,  false),
    (false, true,  false, false, true,  false),
    (true,  true,  false, false, true,  false),
    (false, false, true,  false, true,  true),
    (true,  false, true,  false, true,  true),
    (false, true,  true,  false, true,  false),
    (true,  true,  true,  false, true,  false),
    (false, false, false, true,  true,  false),
    (true,  false, false, true,  true,  false),
    (false, true,  false, true,  true,  false),
    (true,  true,  false, true,  true,  false),
    (false, false, true,  true,  true,  true),
    (true,  false, true,  true,  true,  true),
    (false, true,  true,  true,  true,  true),
    (true,  true,  true,  true,  true,  true),
];

fn expected(inputs: &InputSnapshot) -> bool {
    TRUTH_TABLE
        .iter()
        .find(|(ls, es, ta, eo, sr, _)| {
            *ls == inputs.load_shed
                && *es == inputs.energy_saving
                && *ta == inputs.turn_on_after_shedding
                && *eo == inputs.energy_saving_overwritten
                && *sr == inputs.shedding_stop_requested
        })
        .map(|row| row.5)
        .unwrap_or_else(|| panic!("no truth table row for {inputs:?}"))
}

/// Actuator that applies whatever it is asked unless `stuck` is set, in
/// which case it reports the device off.
struct TestActuator {
    calls: Arc<AtomicU32>,
    stuck: Arc<AtomicBool>,
}

impl TestActuator {
    fn bind(core: &EnergyManagement) -> Self {
        let calls = Arc::new(AtomicU32::new(0));
        let stuck = Arc::new(AtomicBool::new(false));
        let (calls_clone, stuck_clone) = (calls.clone(), stuck.clone());
        core.set_device_state_function(move |on| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            on && !stuck_clone.load(Ordering::SeqCst)
        })
        .unwrap();
        Self { calls, stuck }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

fn settled_core() -> (EnergyManagement, InputBindings, TestActuator) {
    let inputs = InputBindings::new();
    let core = EnergyManagement::new();
    core.initialize(inputs.clone()).unwrap();
    let actuator = TestActuator::bind(&core);
    core.recompute().unwrap();
    (core, inputs, actuator)
}

// ============================================================================
// Truth table
// ============================================================================

mod truth_table {
    use super::*;

    #[test]
    fn recompute_matches_policy_for_all_combinations() {
        for bits in 0..32u8 {
            let snapshot = InputSnapshot::from_bits(bits);
            let inputs = InputBindings::from_snapshot(snapshot);
            let core = EnergyManagement::new();
            core.initialize(inputs).unwrap();
            TestActuator::bind(&core);

            let desired = core.recompute().unwrap();
            assert_eq!(desired, PowerState::from(expected(&snapshot)), "{snapshot:?}");
            assert_eq!(core.current_state(), expected(&snapshot), "{snapshot:?}");
        }
    }

    #[test]
    fn input_changes_settle_to_policy_for_all_combinations() {
        for bits in 0..32u8 {
            let (core, inputs, _) = settled_core();
            let snapshot = InputSnapshot::from_bits(bits);
            for kind in InputKind::ALL {
                inputs.get(kind).set(snapshot.get(kind)).unwrap();
            }
            assert_eq!(inputs.snapshot(), snapshot);
            assert_eq!(core.current_state(), expected(&snapshot), "{snapshot:?}");
            assert_eq!(core.decision(), Some(expected(&snapshot)));
        }
    }

    #[test]
    fn walking_every_transition_never_leaves_a_stale_decision() {
        let (core, inputs, _) = settled_core();
        // Gray code order flips exactly one input per step.
        for step in 1..=64u8 {
            let gray = (step ^ (step >> 1)) % 32;
            let target = InputSnapshot::from_bits(gray);
            for kind in InputKind::ALL {
                inputs.get(kind).set(target.get(kind)).unwrap();
            }
            assert_eq!(core.current_state(), expected(&target), "{target:?}");
        }
    }
}

// ============================================================================
// Policy properties
// ============================================================================

mod properties {
    use super::*;

    #[test]
    fn recompute_twice_actuates_once() {
        let (core, inputs, actuator) = settled_core();
        let before = actuator.calls();

        inputs.turn_on_after_shedding.turn_on().unwrap();
        assert_eq!(actuator.calls(), before + 1);

        core.recompute().unwrap();
        core.recompute().unwrap();
        assert_eq!(actuator.calls(), before + 1);
    }

    #[test]
    fn setting_an_input_to_its_value_does_nothing() {
        let (_core, inputs, actuator) = settled_core();
        let before = actuator.calls();
        inputs.load_shed.turn_off().unwrap();
        inputs.energy_saving.set(false).unwrap();
        assert_eq!(actuator.calls(), before);
    }

    #[test]
    fn load_shed_without_override_is_off_regardless_of_energy_saving() {
        for energy_saving in [false, true] {
            let (core, inputs, _) = settled_core();
            inputs.turn_on_after_shedding.turn_on().unwrap();
            inputs.energy_saving.set(energy_saving).unwrap();
            inputs.load_shed.turn_on().unwrap();
            assert!(!core.current_state());
        }
    }

    #[test]
    fn override_wins_over_load_shed() {
        let (core, inputs, _) = settled_core();
        inputs.load_shed.turn_on().unwrap();
        inputs.energy_saving.turn_on().unwrap();
        assert!(!core.current_state());

        inputs.energy_saving_overwritten.publish_state(true).unwrap();
        assert!(core.current_state());
    }

    #[test]
    fn shedding_end_turns_device_back_on() {
        let (core, inputs, _) = settled_core();
        inputs.turn_on_after_shedding.turn_on().unwrap();
        inputs.load_shed.turn_on().unwrap();
        assert!(!core.current_state());

        inputs.load_shed.turn_off().unwrap();
        assert!(core.current_state());
    }

    #[test]
    fn shedding_end_without_turn_on_keeps_device_off() {
        let (core, inputs, actuator) = settled_core();
        inputs.load_shed.turn_on().unwrap();
        let before = actuator.calls();
        inputs.load_shed.turn_off().unwrap();
        assert!(!core.current_state());
        assert_eq!(actuator.calls(), before);

        assert!(core.request_state(true).unwrap());
        assert!(core.current_state());
    }

    #[test]
    fn stop_request_does_not_clear_load_shed() {
        let (core, inputs, _) = settled_core();
        inputs.turn_on_after_shedding.turn_on().unwrap();
        inputs.load_shed.turn_on().unwrap();
        inputs.shedding_stop_requested.publish_state(true).unwrap();

        assert!(core.current_state());
        assert!(inputs.load_shed.state());
    }

    #[test]
    fn load_shed_dominates_energy_saving() {
        let (core, inputs, _) = settled_core();
        inputs.energy_saving.turn_on().unwrap();
        inputs.load_shed.turn_on().unwrap();
        assert_eq!(core.decision(), Some(false));
    }
}

// ============================================================================
// Explicit requests and failures
// ============================================================================

mod requests {
    use super::*;

    #[test]
    fn failed_actuation_is_observable() {
        let (core, _inputs, actuator) = settled_core();
        actuator.stuck.store(true, Ordering::SeqCst);

        let mismatches = Arc::new(Mutex::new(Vec::new()));
        let mismatches_clone = mismatches.clone();
        core.on_inconsistent_application(move |requested, applied| {
            mismatches_clone.lock().push((requested, applied));
        });

        let applied = core.request_state(true).unwrap();
        assert!(!applied);
        assert!(!core.current_state());
        assert!(!core.decision_state().is_consistent());
        assert_eq!(*mismatches.lock(), vec![(true, false)]);
    }

    #[test]
    fn request_does_not_change_the_decision() {
        let (core, _inputs, _) = settled_core();
        assert_eq!(core.decision(), Some(false));
        assert!(core.request_state(true).unwrap());
        assert!(core.current_state());
        assert_eq!(core.decision(), Some(false));
    }

    #[test]
    fn decision_matching_a_request_does_not_actuate_again() {
        let (core, inputs, actuator) = settled_core();
        assert!(core.request_state(true).unwrap());
        let before = actuator.calls();

        inputs.turn_on_after_shedding.turn_on().unwrap();
        assert_eq!(core.decision(), Some(true));
        assert!(core.current_state());
        assert_eq!(actuator.calls(), before);

        inputs.load_shed.turn_on().unwrap();
        assert!(!core.current_state());
        assert_eq!(actuator.calls(), before + 1);
    }

    #[test]
    fn unbound_core_does_not_hide_changes_from_other_cores() {
        let inputs = InputBindings::new();
        let unbound = EnergyManagement::new();
        unbound.initialize(inputs.clone()).unwrap();
        let bound = EnergyManagement::new();
        bound.initialize(inputs.clone()).unwrap();
        TestActuator::bind(&bound);
        bound.recompute().unwrap();

        assert_eq!(
            inputs.turn_on_after_shedding.turn_on(),
            Err(Error::ActuatorUnavailable)
        );
        assert!(bound.current_state());
        assert_eq!(bound.decision(), Some(true));
        assert_eq!(unbound.decision(), None);
    }

    #[test]
    fn missing_actuator_is_surfaced_without_state_change() {
        let inputs = InputBindings::new();
        let core = EnergyManagement::new();
        core.initialize(inputs.clone()).unwrap();

        assert_eq!(
            inputs.turn_on_after_shedding.turn_on(),
            Err(Error::ActuatorUnavailable)
        );
        assert_eq!(core.recompute(), Err(Error::ActuatorUnavailable));
        assert_eq!(core.request_state(true), Err(Error::ActuatorUnavailable));
        assert_eq!(core.decision(), None);
        assert!(!core.current_state());
        assert_eq!(core.decision_state().actuations(), 0);

        // Binding and retrying recovers.
        TestActuator::bind(&core);
        assert_eq!(core.recompute(), Ok(PowerState::On));
        assert!(core.current_state());
    }
}

// ============================================================================
// Observers
// ============================================================================

mod observers {
    use super::*;

    #[test]
    fn state_changes_are_published_in_order() {
        let inputs = InputBindings::new();
        let core = EnergyManagement::new();
        core.initialize(inputs.clone()).unwrap();
        TestActuator::bind(&core);

        let changes = Arc::new(Mutex::new(Vec::new()));
        let changes_clone = changes.clone();
        core.on_state_changed(move |change| changes_clone.lock().push(change.clone()));

        inputs.turn_on_after_shedding.turn_on().unwrap();

        let changes = changes.lock();
        assert_eq!(changes.len(), 3);
        assert_eq!(
            changes[0],
            StateChange::input(InputKind::TurnOnAfterShedding, true)
        );
        assert_eq!(changes[1], StateChange::decision(None, PowerState::On));
        assert!(matches!(
            changes[2],
            StateChange::Device {
                requested: true,
                applied: true,
                previous: false,
                ..
            }
        ));
    }

    #[test]
    fn device_state_callback_follows_applied_state() {
        let (core, inputs, _) = settled_core();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let id = core.on_device_state_changed(move |on| seen_clone.lock().push(on));

        inputs.turn_on_after_shedding.turn_on().unwrap();
        inputs.load_shed.turn_on().unwrap();
        assert_eq!(*seen.lock(), vec![true, false]);

        assert!(core.unsubscribe(id));
        inputs.load_shed.turn_off().unwrap();
        assert_eq!(seen.lock().len(), 2);
    }
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn concurrent_input_changes_settle_to_final_inputs() {
    let (core, inputs, _) = settled_core();

    let handles: Vec<_> = InputKind::ALL
        .into_iter()
        .map(|kind| {
            let input = inputs.get(kind).clone();
            std::thread::spawn(move || {
                for _ in 0..101 {
                    input.toggle().unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = inputs.snapshot();
    assert!(InputKind::ALL.iter().all(|kind| snapshot.get(*kind)));
    assert_eq!(core.current_state(), expected(&snapshot));
}
