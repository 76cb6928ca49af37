// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the set-device-state condition.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use energy_management::automation::{Condition, SetDeviceStateCondition, TemplatableValue};
use energy_management::{EnergyManagement, EnergyManagementConfig, Error, InputBindings};

/// Context an automation engine might pass: the current tariff in cents.
struct Tariff(u32);

#[test]
fn condition_drives_the_core_and_branches_on_success() {
    let inputs = InputBindings::new();
    let core = EnergyManagement::new();
    core.initialize(inputs.clone()).unwrap();
    core.set_device_state_function(|on| on).unwrap();

    let cheap_power = SetDeviceStateCondition::new(
        core.clone(),
        TemplatableValue::computed(|tariff: &Tariff| tariff.0 < 25),
    );

    assert!(cheap_power.evaluate(&Tariff(10)).unwrap());
    assert!(core.current_state());
    assert!(cheap_power.evaluate(&Tariff(40)).unwrap());
    assert!(!core.current_state());
}

#[test]
fn condition_reports_devices_that_do_not_follow() {
    let core = EnergyManagement::new();
    core.initialize(InputBindings::new()).unwrap();
    let calls = Arc::new(AtomicU32::new(0));
    let calls_clone = calls.clone();
    core.set_device_state_function(move |_| {
        calls_clone.fetch_add(1, Ordering::SeqCst);
        false
    })
    .unwrap();

    let turn_on = SetDeviceStateCondition::new(core.clone(), true);
    assert!(!turn_on.evaluate(&()).unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let turn_off = SetDeviceStateCondition::new(core, false);
    assert!(turn_off.evaluate(&()).unwrap());
}

#[test]
fn condition_without_actuator_fails() {
    let core = EnergyManagement::new();
    let condition = SetDeviceStateCondition::new(core, true);
    assert_eq!(condition.evaluate(&()), Err(Error::ActuatorUnavailable));
    assert_eq!(condition.play(&()), Err(Error::ActuatorUnavailable));
}

#[test]
fn conditions_as_trait_objects() {
    let core = EnergyManagement::with_config(EnergyManagementConfig::new().with_name("Pool pump"));
    core.set_device_state_function(|on| on).unwrap();

    let steps: Vec<Box<dyn Condition<()>>> = vec![
        Box::new(SetDeviceStateCondition::new(core.clone(), true)),
        Box::new(SetDeviceStateCondition::new(core.clone(), false)),
    ];
    let results: Vec<bool> = steps
        .iter()
        .map(|step| step.evaluate(&()).unwrap())
        .collect();
    assert_eq!(results, vec![true, true]);
    assert!(!core.current_state());
}

#[test]
fn tracked_condition_updates_inputs() {
    let config = EnergyManagementConfig::new().with_override_tracking(true);
    let inputs = InputBindings::from_config(&config);
    let core = EnergyManagement::with_config(config);
    core.initialize(inputs.clone()).unwrap();
    core.set_device_state_function(|on| on).unwrap();
    inputs.load_shed.turn_on().unwrap();

    let resume = SetDeviceStateCondition::new(core.clone(), true);
    assert!(resume.evaluate(&()).unwrap());
    assert!(inputs.shedding_stop_requested.state());
    assert!(core.current_state());
}
