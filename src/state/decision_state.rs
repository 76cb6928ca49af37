// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The core's own derived state.

use super::StateChange;
use crate::types::PowerState;

/// What an energy management core has decided and applied so far.
///
/// `decision` is only ever written by the decision procedure. `applied` is
/// whatever the actuator last reported, which may differ from `decision`
/// after an explicit request or a failed actuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct DecisionState {
    /// Last state dictated by the policy, `None` before the first decision.
    decision: Option<PowerState>,
    /// Last state reported by the actuator.
    applied: bool,
    /// State handed to the actuator on the last actuation.
    last_requested: Option<bool>,
    /// Number of actuator invocations.
    actuations: u64,
}

impl DecisionState {
    /// Creates a state with no decision and the device off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last policy decision.
    #[must_use]
    pub fn decision(&self) -> Option<PowerState> {
        self.decision
    }

    /// Returns the last applied device state.
    #[must_use]
    pub fn applied(&self) -> bool {
        self.applied
    }

    /// Returns the state handed to the actuator on the last actuation.
    #[must_use]
    pub fn last_requested(&self) -> Option<bool> {
        self.last_requested
    }

    /// Returns how many times the actuator has been invoked.
    #[must_use]
    pub fn actuations(&self) -> u64 {
        self.actuations
    }

    /// Returns `true` unless the last actuation applied a different state
    /// than it was asked to.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.last_requested.is_none_or(|requested| requested == self.applied)
    }

    /// Applies a change.
    ///
    /// Returns `true` if the state actually changed. Input changes carry no
    /// derived state and always return `false`.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match change {
            StateChange::Input { .. } => false,
            StateChange::Decision { desired, .. } => {
                let changed = self.decision != Some(*desired);
                self.decision = Some(*desired);
                changed
            }
            StateChange::Device {
                requested, applied, ..
            } => {
                self.last_requested = Some(*requested);
                self.actuations += 1;
                let changed = self.applied != *applied;
                self.applied = *applied;
                changed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ChangeSource;
    use crate::types::InputKind;

    fn actuation(requested: bool, applied: bool) -> StateChange {
        StateChange::Device {
            source: ChangeSource::Policy,
            previous: false,
            requested,
            applied,
        }
    }

    #[test]
    fn new_state_is_off_and_undecided() {
        let state = DecisionState::new();
        assert_eq!(state.decision(), None);
        assert!(!state.applied());
        assert_eq!(state.actuations(), 0);
        assert!(state.is_consistent());
    }

    #[test]
    fn decision_changes_are_reported_once() {
        let mut state = DecisionState::new();
        assert!(state.apply(&StateChange::decision(None, PowerState::Off)));
        assert!(!state.apply(&StateChange::decision(None, PowerState::Off)));
        assert!(state.apply(&StateChange::decision(None, PowerState::On)));
        assert_eq!(state.decision(), Some(PowerState::On));
    }

    #[test]
    fn actuation_updates_applied_and_counts() {
        let mut state = DecisionState::new();
        assert!(state.apply(&actuation(true, true)));
        assert!(!state.apply(&actuation(true, true)));
        assert_eq!(state.actuations(), 2);
        assert!(state.applied());
        assert!(state.is_consistent());
    }

    #[test]
    fn failed_actuation_is_inconsistent() {
        let mut state = DecisionState::new();
        assert!(!state.apply(&actuation(true, false)));
        assert!(!state.applied());
        assert_eq!(state.last_requested(), Some(true));
        assert!(!state.is_consistent());
    }

    #[test]
    fn input_changes_do_not_touch_derived_state() {
        let mut state = DecisionState::new();
        assert!(!state.apply(&StateChange::input(InputKind::LoadShed, true)));
        assert_eq!(state, DecisionState::new());
    }
}
