// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The energy management core and its configuration.
//!
//! An [`EnergyManagement`] receives already-constructed inputs and a device
//! state function. It performs no discovery or registration of its own.
//!
//! # Examples
//!
//! ```
//! use energy_management::{EnergyManagement, EnergyManagementConfig, InputBindings};
//!
//! # fn main() -> energy_management::Result<()> {
//! let config = EnergyManagementConfig::from_json(r#"{"name": "Heat pump"}"#)?;
//! let inputs = InputBindings::from_config(&config);
//! let core = EnergyManagement::with_config(config);
//!
//! core.initialize(inputs.clone())?;
//! core.set_device_state_function(|on| {
//!     // Drive the relay here and report what was applied.
//!     on
//! })?;
//! core.recompute()?;
//!
//! inputs.energy_saving.turn_on()?;
//! assert!(!core.current_state());
//! # Ok(())
//! # }
//! ```

mod config;
mod energy_management;
mod manager_id;

pub use config::EnergyManagementConfig;
pub use energy_management::EnergyManagement;
pub use manager_id::ManagerId;
