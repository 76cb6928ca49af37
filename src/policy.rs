// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decision policies mapping input values to a desired device state.
//!
//! A policy is a pure function of an [`InputSnapshot`]: the same five values
//! always produce the same desired state. [`StandardPolicy`] implements the
//! shedding/energy-saving rules; any closure of the right shape can replace it.
//!
//! # Examples
//!
//! ```
//! use energy_management::policy::{DecisionPolicy, StandardPolicy};
//! use energy_management::types::{InputSnapshot, PowerState};
//!
//! let policy = StandardPolicy::default();
//! let inputs = InputSnapshot {
//!     load_shed: true,
//!     turn_on_after_shedding: true,
//!     ..InputSnapshot::default()
//! };
//! assert_eq!(policy.decide(&inputs), PowerState::Off);
//! ```

use crate::types::{InputSnapshot, PowerState};

/// Maps the current inputs to the state the device should be driven to.
pub trait DecisionPolicy: Send + Sync {
    /// Returns the desired device state for `inputs`.
    fn decide(&self, inputs: &InputSnapshot) -> PowerState;
}

impl<F> DecisionPolicy for F
where
    F: Fn(&InputSnapshot) -> PowerState + Send + Sync,
{
    fn decide(&self, inputs: &InputSnapshot) -> PowerState {
        self(inputs)
    }
}

/// Precedence between energy saving and a shedding stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precedence {
    /// A stop request only lifts shedding; energy saving still applies.
    #[default]
    EnergySavingFirst,
    /// A stop request during shedding resumes the device regardless of
    /// energy saving.
    StopRequestFirst,
}

/// The built-in policy.
///
/// - Shedding is active while `load_shed` is set and no stop was requested.
/// - During shedding the device is off, unless energy saving was overwritten,
///   in which case the device follows `energy_saving`.
/// - Outside shedding, energy saving keeps the device off unless overwritten.
/// - Otherwise the device is on exactly when `turn_on_after_shedding` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StandardPolicy {
    precedence: Precedence,
}

impl StandardPolicy {
    /// Creates a policy with the given precedence.
    #[must_use]
    pub const fn new(precedence: Precedence) -> Self {
        Self { precedence }
    }

    /// Returns the configured precedence.
    #[must_use]
    pub const fn precedence(&self) -> Precedence {
        self.precedence
    }
}

impl DecisionPolicy for StandardPolicy {
    fn decide(&self, inputs: &InputSnapshot) -> PowerState {
        let shedding = inputs.load_shed && !inputs.shedding_stop_requested;
        if shedding {
            return PowerState::from(inputs.energy_saving_overwritten && inputs.energy_saving);
        }

        let stop_overrides_saving = self.precedence == Precedence::StopRequestFirst
            && inputs.load_shed
            && inputs.shedding_stop_requested;
        if !stop_overrides_saving && inputs.energy_saving && !inputs.energy_saving_overwritten {
            return PowerState::Off;
        }

        PowerState::from(inputs.turn_on_after_shedding)
    }
}
