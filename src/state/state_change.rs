// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! State changes are what an energy management core publishes to its
//! observers, and what a [`DecisionState`](super::DecisionState) is updated from.
//!
//! # Change Types
//!
//! - [`StateChange::Input`] - One of the five inputs changed value
//! - [`StateChange::Decision`] - The policy produced a new desired state
//! - [`StateChange::Device`] - The actuator was invoked
//!
//! # Examples
//!
//! ```
//! use energy_management::state::{DecisionState, StateChange};
//! use energy_management::types::PowerState;
//!
//! let mut state = DecisionState::new();
//!
//! // Apply returns true if state actually changed
//! let changed = state.apply(&StateChange::decision(None, PowerState::On));
//! assert!(changed);
//!
//! // Applying same change again returns false
//! let changed = state.apply(&StateChange::decision(None, PowerState::On));
//! assert!(!changed);
//! ```

use crate::types::{InputKind, PowerState};

/// What caused an actuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeSource {
    /// The decision policy reacted to the inputs.
    Policy,
    /// An explicit state request.
    Request,
}

/// Represents a change observed or made by an energy management core.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateChange {
    /// An input the core is bound to changed value.
    Input {
        /// The input that changed.
        kind: InputKind,
        /// Its new value.
        value: bool,
    },

    /// The decision policy produced a new desired state.
    Decision {
        /// The previous decision, `None` before the first one.
        previous: Option<PowerState>,
        /// The new desired state.
        desired: PowerState,
    },

    /// The actuator was invoked.
    Device {
        /// What triggered the actuation.
        source: ChangeSource,
        /// Applied state before the actuation.
        previous: bool,
        /// State handed to the actuator.
        requested: bool,
        /// State the actuator reported as applied.
        applied: bool,
    },
}

impl StateChange {
    /// Creates an input change.
    #[must_use]
    pub fn input(kind: InputKind, value: bool) -> Self {
        Self::Input { kind, value }
    }

    /// Creates a decision change.
    #[must_use]
    pub fn decision(previous: Option<PowerState>, desired: PowerState) -> Self {
        Self::Decision { previous, desired }
    }

    /// Returns `false` only for an actuation whose applied state differs from
    /// the requested one.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        match self {
            Self::Device {
                requested, applied, ..
            } => requested == applied,
            Self::Input { .. } | Self::Decision { .. } => true,
        }
    }
}
