// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration types for an energy management core.

use crate::error::ConfigurationError;
use crate::input::InputBindings;
use crate::policy::Precedence;
use crate::types::InputSnapshot;

/// Configuration for an energy management core.
///
/// Every field has a default, so a configuration document only needs to
/// name what it changes.
///
/// # Examples
///
/// ```
/// use energy_management::EnergyManagementConfig;
/// use energy_management::policy::Precedence;
///
/// let config = EnergyManagementConfig::new()
///     .with_name("Water heater")
///     .with_precedence(Precedence::StopRequestFirst)
///     .with_override_tracking(true);
///
/// let parsed = EnergyManagementConfig::from_json(
///     r#"{"name": "Water heater", "precedence": "stop_request_first", "track_overrides": true}"#,
/// )
/// .unwrap();
/// assert_eq!(config, parsed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnergyManagementConfig {
    /// Optional friendly name used in log events.
    pub name: Option<String>,
    /// Precedence between energy saving and a shedding stop request.
    pub precedence: Precedence,
    /// Whether the core maintains the status sensors and the
    /// turn-on-after-shedding switch after explicit state requests.
    pub track_overrides: bool,
    /// Initial input values for [`InputBindings::from_config`].
    pub initial: InputSnapshot,
}

impl EnergyManagementConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidConfig`] if the document is not
    /// valid JSON or contains unknown fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::InvalidConfig(e.to_string()))
    }

    /// Sets a friendly name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the precedence used by the standard policy.
    #[must_use]
    pub fn with_precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Enables or disables override tracking.
    #[must_use]
    pub fn with_override_tracking(mut self, enabled: bool) -> Self {
        self.track_overrides = enabled;
        self
    }

    /// Sets the initial input values.
    #[must_use]
    pub fn with_initial(mut self, initial: InputSnapshot) -> Self {
        self.initial = initial;
        self
    }
}

impl InputBindings {
    /// Creates five fresh inputs with the configured initial values.
    #[must_use]
    pub fn from_config(config: &EnergyManagementConfig) -> Self {
        Self::from_snapshot(config.initial)
    }
}
