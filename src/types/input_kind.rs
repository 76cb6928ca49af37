// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Identities and snapshots of the five boolean inputs.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Role of a boolean input in the energy management core.
///
/// The first three are policy switches, toggled by a user or by automation.
/// The last two are status sensors, written by external sensing logic (or by
/// the core itself when override tracking is enabled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Forced load shedding is active.
    LoadShed,
    /// Voluntary energy saving is active.
    EnergySaving,
    /// The device should come back on once shedding ends.
    TurnOnAfterShedding,
    /// Energy saving was manually overridden.
    EnergySavingOverwritten,
    /// An early end of shedding was requested.
    SheddingStopRequested,
}

impl InputKind {
    /// All input kinds, in binding order.
    pub const ALL: [Self; 5] = [
        Self::LoadShed,
        Self::EnergySaving,
        Self::TurnOnAfterShedding,
        Self::EnergySavingOverwritten,
        Self::SheddingStopRequested,
    ];

    /// Returns the snake case name of this input.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LoadShed => "load_shed",
            Self::EnergySaving => "energy_saving",
            Self::TurnOnAfterShedding => "turn_on_after_shedding",
            Self::EnergySavingOverwritten => "energy_saving_overwritten",
            Self::SheddingStopRequested => "shedding_stop_requested",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputKind {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValueError::InvalidInputKind(s.to_string()))
    }
}

/// Values of all five inputs at one instant.
///
/// This is what a [`DecisionPolicy`](crate::policy::DecisionPolicy) sees.
///
/// # Examples
///
/// ```
/// use energy_management::types::{InputKind, InputSnapshot};
///
/// let snapshot = InputSnapshot::default().with(InputKind::LoadShed, true);
/// assert!(snapshot.load_shed);
/// assert!(snapshot.get(InputKind::LoadShed));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InputSnapshot {
    /// Forced load shedding switch.
    pub load_shed: bool,
    /// Energy saving switch.
    pub energy_saving: bool,
    /// Turn-on-after-shedding switch.
    pub turn_on_after_shedding: bool,
    /// Energy-saving-overwritten sensor.
    pub energy_saving_overwritten: bool,
    /// Shedding-stop-requested sensor.
    pub shedding_stop_requested: bool,
}

impl InputSnapshot {
    /// Returns the value of one input.
    #[must_use]
    pub const fn get(&self, kind: InputKind) -> bool {
        match kind {
            InputKind::LoadShed => self.load_shed,
            InputKind::EnergySaving => self.energy_saving,
            InputKind::TurnOnAfterShedding => self.turn_on_after_shedding,
            InputKind::EnergySavingOverwritten => self.energy_saving_overwritten,
            InputKind::SheddingStopRequested => self.shedding_stop_requested,
        }
    }

    /// Sets the value of one input.
    pub fn set(&mut self, kind: InputKind, value: bool) {
        match kind {
            InputKind::LoadShed => self.load_shed = value,
            InputKind::EnergySaving => self.energy_saving = value,
            InputKind::TurnOnAfterShedding => self.turn_on_after_shedding = value,
            InputKind::EnergySavingOverwritten => self.energy_saving_overwritten = value,
            InputKind::SheddingStopRequested => self.shedding_stop_requested = value,
        }
    }

    /// Returns a copy with one input changed.
    #[must_use]
    pub fn with(mut self, kind: InputKind, value: bool) -> Self {
        self.set(kind, value);
        self
    }

    /// Builds a snapshot from the low five bits of `bits`, one bit per
    /// input in [`InputKind::ALL`] order.
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        InputKind::ALL
            .into_iter()
            .enumerate()
            .fold(Self::default(), |snapshot, (i, kind)| {
                snapshot.with(kind, bits & (1 << i) != 0)
            })
    }
}
