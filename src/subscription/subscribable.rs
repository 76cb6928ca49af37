// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for observers of a core's decisions.

use crate::state::StateChange;
use crate::subscription::SubscriptionId;

/// Trait for types that publish their decisions to subscribers.
///
/// # Examples
///
/// ```
/// use energy_management::{EnergyManagement, InputBindings};
/// use energy_management::subscription::Subscribable;
///
/// # fn main() -> energy_management::Result<()> {
/// let core = EnergyManagement::new();
/// core.initialize(InputBindings::new())?;
/// core.set_device_state_function(|on| on)?;
///
/// let sub_id = core.on_device_state_changed(|on| {
///     println!("device is now {}", if on { "on" } else { "off" });
/// });
///
/// core.request_state(true)?;
/// core.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to all state changes: observed input changes, decisions
    /// and actuations.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static;

    /// Subscribes to changes of the applied device state.
    fn on_device_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static;

    /// Subscribes to actuations that applied something other than what was
    /// requested. The callback receives `(requested, applied)`.
    fn on_inconsistent_application<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool, bool) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
