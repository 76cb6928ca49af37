// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the energy management core.
//!
//! Two families of failure exist: setup mistakes ([`ConfigurationError`]),
//! which are fatal to the misconfigured binding, and runtime failures such as
//! [`Error::ActuatorUnavailable`], which are recoverable by binding what is
//! missing and retrying.
//!
//! A device that reports a different applied state than the one requested is
//! *not* an error. Compare the value returned by
//! [`EnergyManagement::request_state`](crate::EnergyManagement::request_state)
//! with the requested one, or inspect
//! [`DecisionState::is_consistent`](crate::state::DecisionState::is_consistent).

use thiserror::Error;

use crate::types::InputKind;

/// The main error type for this library.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Inputs or actuator were bound incorrectly.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A decision needed the actuator before one was bound.
    #[error("device state actuator is not bound")]
    ActuatorUnavailable,

    /// A decision needed the inputs before they were bound.
    #[error("inputs are not initialized")]
    NotInitialized,

    /// An explicit state request arrived while another decision was running.
    #[error("another device state decision is in flight")]
    DecisionInFlight,

    /// A value could not be parsed.
    #[error("value error: {0}")]
    Value(#[from] ValueError),
}

/// Errors detected while wiring the core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The inputs were already bound to this core.
    #[error("inputs are already initialized")]
    AlreadyInitialized,

    /// A required input reference was not supplied.
    #[error("missing input: {0}")]
    MissingInput(InputKind),

    /// An input handle was bound to a role it was not created for, or one
    /// handle was bound to two roles.
    #[error("input bound as {expected} was created as {actual}")]
    MismatchedInput {
        /// The role the handle was bound to.
        expected: InputKind,
        /// The role the handle was created with.
        actual: InputKind,
    },

    /// The actuator was already bound to this core.
    #[error("device state function is already bound")]
    ActuatorAlreadyBound,

    /// A configuration document could not be decoded.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors related to parsing values from text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// An unknown input name was provided.
    #[error("invalid input name: {0}")]
    InvalidInputKind(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
