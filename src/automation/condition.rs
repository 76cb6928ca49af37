// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The set-device-state condition.

use std::fmt;

use super::TemplatableValue;
use crate::error::Result;
use crate::management::EnergyManagement;

/// Something an automation engine can evaluate against a context.
pub trait Condition<C> {
    /// Evaluates the condition.
    ///
    /// # Errors
    ///
    /// Returns an error if the condition could not be evaluated at all.
    fn evaluate(&self, ctx: &C) -> Result<bool>;
}

/// Asks an energy management core to apply a state and reports success.
///
/// Holds no state besides the core handle and the target value.
///
/// # Examples
///
/// ```
/// use energy_management::automation::{Condition, SetDeviceStateCondition};
/// use energy_management::{EnergyManagement, InputBindings};
///
/// # fn main() -> energy_management::Result<()> {
/// let core = EnergyManagement::new();
/// core.initialize(InputBindings::new())?;
/// core.set_device_state_function(|on| on)?;
///
/// let turn_on = SetDeviceStateCondition::new(core.clone(), true);
/// assert!(turn_on.evaluate(&())?);
/// assert!(core.current_state());
/// # Ok(())
/// # }
/// ```
pub struct SetDeviceStateCondition<C> {
    core: EnergyManagement,
    state: TemplatableValue<bool, C>,
}

impl<C> SetDeviceStateCondition<C> {
    /// Creates a condition targeting `state`, literal or computed.
    #[must_use]
    pub fn new(core: EnergyManagement, state: impl Into<TemplatableValue<bool, C>>) -> Self {
        Self {
            core,
            state: state.into(),
        }
    }

    /// Replaces the target value.
    pub fn set_state(&mut self, state: impl Into<TemplatableValue<bool, C>>) {
        self.state = state.into();
    }

    /// Returns the core this condition drives.
    #[must_use]
    pub fn core(&self) -> &EnergyManagement {
        &self.core
    }

    /// Runs the condition as an action, ignoring whether the device followed.
    ///
    /// # Errors
    ///
    /// See [`EnergyManagement::request_state`].
    pub fn play(&self, ctx: &C) -> Result<()> {
        self.core.request_state(self.state.value(ctx)).map(|_| ())
    }
}

impl<C> Clone for SetDeviceStateCondition<C> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            state: self.state.clone(),
        }
    }
}

impl<C> fmt::Debug for SetDeviceStateCondition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetDeviceStateCondition")
            .field("core", &self.core.id())
            .field("state", &self.state)
            .finish()
    }
}

impl<C> Condition<C> for SetDeviceStateCondition<C> {
    fn evaluate(&self, ctx: &C) -> Result<bool> {
        let target = self.state.value(ctx);
        self.core.request_state(target)?;
        let matched = self.core.current_state() == target;
        tracing::debug!(manager = %self.core.name(), target, matched, "Evaluated set device state");
        Ok(matched)
    }
}
