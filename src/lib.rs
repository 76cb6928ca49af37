// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Energy management - coordinate a device's power state under load
//! shedding and energy-saving policy.
//!
//! A controlled device is pulled in two directions: forced load shedding
//! (utility- or grid-driven demand reduction) and voluntary energy saving.
//! A user or automation may override either. This crate decides, from five
//! boolean inputs, what state the device should be in, and drives it there
//! through a single actuator hook.
//!
//! # Inputs
//!
//! - **Policy switches**: load shed, energy saving, turn on after shedding
//! - **Status sensors**: energy saving overwritten, shedding stop requested
//!
//! # Quick Start
//!
//! ```
//! use energy_management::{EnergyManagement, InputBindings};
//!
//! # fn main() -> energy_management::Result<()> {
//! let inputs = InputBindings::new();
//! let core = EnergyManagement::new();
//! core.initialize(inputs.clone())?;
//! core.set_device_state_function(|on| {
//!     // Switch the relay and report what was applied.
//!     on
//! })?;
//!
//! // The device comes back on after shedding.
//! inputs.turn_on_after_shedding.turn_on()?;
//! inputs.load_shed.turn_on()?;
//! assert!(!core.current_state());
//! inputs.load_shed.turn_off()?;
//! assert!(core.current_state());
//! # Ok(())
//! # }
//! ```
//!
//! ## Automation
//!
//! ```
//! use energy_management::automation::{Condition, SetDeviceStateCondition};
//! use energy_management::{EnergyManagement, InputBindings};
//!
//! # fn main() -> energy_management::Result<()> {
//! let core = EnergyManagement::new();
//! core.initialize(InputBindings::new())?;
//! core.set_device_state_function(|_| false)?; // relay stuck off
//!
//! let turn_on = SetDeviceStateCondition::new(core.clone(), true);
//! assert!(!turn_on.evaluate(&())?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Observing decisions
//!
//! ```
//! use energy_management::{EnergyManagement, InputBindings, Subscribable};
//!
//! # fn main() -> energy_management::Result<()> {
//! let core = EnergyManagement::new();
//! core.on_state_changed(|change| println!("{change:?}"));
//! core.on_inconsistent_application(|requested, applied| {
//!     eprintln!("asked for {requested}, device applied {applied}");
//! });
//! core.initialize(InputBindings::new())?;
//! core.set_device_state_function(|on| on)?;
//! core.recompute()?;
//! # Ok(())
//! # }
//! ```

pub mod automation;
pub mod error;
pub mod input;
mod management;
pub mod policy;
pub mod state;
pub mod subscription;
pub mod types;

pub use automation::{Condition, SetDeviceStateCondition, TemplatableValue};
pub use error::{ConfigurationError, Error, Result, ValueError};
pub use input::{BooleanInput, InputBindings};
pub use management::{EnergyManagement, EnergyManagementConfig, ManagerId};
pub use policy::{DecisionPolicy, Precedence, StandardPolicy};
pub use state::{ChangeSource, DecisionState, StateChange};
pub use subscription::{Subscribable, SubscriptionId};
pub use types::{InputKind, InputSnapshot, PowerState};
