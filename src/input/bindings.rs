// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The five inputs an energy management core is bound to.

use super::BooleanInput;
use crate::error::ConfigurationError;
use crate::types::{InputKind, InputSnapshot};

/// Handles to the three policy switches and the two status sensors.
///
/// # Examples
///
/// ```
/// use energy_management::input::InputBindings;
/// use energy_management::types::InputKind;
///
/// let inputs = InputBindings::new();
/// let load_shed = inputs.get(InputKind::LoadShed).clone();
/// assert!(!inputs.snapshot().load_shed);
/// # let _ = load_shed;
/// ```
#[derive(Debug, Clone)]
pub struct InputBindings {
    /// Forced load shedding switch.
    pub load_shed: BooleanInput,
    /// Energy saving switch.
    pub energy_saving: BooleanInput,
    /// Turn-on-after-shedding switch.
    pub turn_on_after_shedding: BooleanInput,
    /// Energy-saving-overwritten sensor.
    pub energy_saving_overwritten: BooleanInput,
    /// Shedding-stop-requested sensor.
    pub shedding_stop_requested: BooleanInput,
}

impl InputBindings {
    /// Creates five fresh inputs, all `false`.
    #[must_use]
    pub fn new() -> Self {
        Self::from_snapshot(InputSnapshot::default())
    }

    /// Creates five fresh inputs with the given initial values.
    #[must_use]
    pub fn from_snapshot(initial: InputSnapshot) -> Self {
        let input = |kind| BooleanInput::new(kind, initial.get(kind));
        Self {
            load_shed: input(InputKind::LoadShed),
            energy_saving: input(InputKind::EnergySaving),
            turn_on_after_shedding: input(InputKind::TurnOnAfterShedding),
            energy_saving_overwritten: input(InputKind::EnergySavingOverwritten),
            shedding_stop_requested: input(InputKind::SheddingStopRequested),
        }
    }

    /// Assembles bindings from optional references.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingInput`] for the first reference
    /// that is `None`.
    pub fn try_from_parts(
        load_shed: Option<BooleanInput>,
        energy_saving: Option<BooleanInput>,
        turn_on_after_shedding: Option<BooleanInput>,
        energy_saving_overwritten: Option<BooleanInput>,
        shedding_stop_requested: Option<BooleanInput>,
    ) -> Result<Self, ConfigurationError> {
        let require = |input: Option<BooleanInput>, kind| {
            input.ok_or(ConfigurationError::MissingInput(kind))
        };
        Ok(Self {
            load_shed: require(load_shed, InputKind::LoadShed)?,
            energy_saving: require(energy_saving, InputKind::EnergySaving)?,
            turn_on_after_shedding: require(
                turn_on_after_shedding,
                InputKind::TurnOnAfterShedding,
            )?,
            energy_saving_overwritten: require(
                energy_saving_overwritten,
                InputKind::EnergySavingOverwritten,
            )?,
            shedding_stop_requested: require(
                shedding_stop_requested,
                InputKind::SheddingStopRequested,
            )?,
        })
    }

    /// Returns the handle bound to `kind`.
    #[must_use]
    pub fn get(&self, kind: InputKind) -> &BooleanInput {
        match kind {
            InputKind::LoadShed => &self.load_shed,
            InputKind::EnergySaving => &self.energy_saving,
            InputKind::TurnOnAfterShedding => &self.turn_on_after_shedding,
            InputKind::EnergySavingOverwritten => &self.energy_saving_overwritten,
            InputKind::SheddingStopRequested => &self.shedding_stop_requested,
        }
    }

    /// Iterates over `(role, handle)` pairs in [`InputKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (InputKind, &BooleanInput)> {
        InputKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    /// Reads all five values.
    #[must_use]
    pub fn snapshot(&self) -> InputSnapshot {
        self.iter()
            .fold(InputSnapshot::default(), |snapshot, (kind, input)| {
                snapshot.with(kind, input.state())
            })
    }

    /// Checks that every handle was created for the role it is bound to.
    ///
    /// A handle carries a single role, so this also rules out one state
    /// holder being bound to two roles.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MismatchedInput`] for the first handle
    /// bound to the wrong role.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self.iter().find(|(kind, input)| input.kind() != *kind) {
            Some((expected, input)) => Err(ConfigurationError::MismatchedInput {
                expected,
                actual: input.kind(),
            }),
            None => Ok(()),
        }
    }
}

impl Default for InputBindings {
    fn default() -> Self {
        Self::new()
    }
}
