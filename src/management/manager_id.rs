// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Energy management core identifier type.

use std::fmt;

use uuid::Uuid;

/// Unique identifier for an energy management core.
///
/// Appears as the `manager` field of every log event a core emits, so the
/// decisions of several cores in one process can be told apart.
///
/// # Examples
///
/// ```
/// use energy_management::EnergyManagement;
///
/// let core = EnergyManagement::new();
/// println!("Core: {}", core.id());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ManagerId(Uuid);

impl ManagerId {
    /// Creates a new unique core identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a core identifier from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Returns the first eight hex digits, used as a short log label.
    #[must_use]
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for ManagerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ManagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ManagerId({}...)", self.short())
    }
}

impl fmt::Display for ManagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ManagerId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ManagerId> for Uuid {
    fn from(id: ManagerId) -> Self {
        id.0
    }
}
