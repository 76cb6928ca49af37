// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared, observable boolean state holder.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::subscription::{InputCallbackRegistry, SubscriptionId};
use crate::types::InputKind;

struct Inner {
    kind: InputKind,
    name: Option<String>,
    state: RwLock<bool>,
    callbacks: InputCallbackRegistry,
}

/// A switch or sensor value owned by the host environment.
///
/// Cloning a `BooleanInput` yields another handle to the same state, so the
/// host and the energy management core observe the same value.
///
/// # Examples
///
/// ```
/// use energy_management::input::BooleanInput;
/// use energy_management::types::InputKind;
///
/// # fn main() -> energy_management::Result<()> {
/// let load_shed = BooleanInput::new(InputKind::LoadShed, false);
/// let handle = load_shed.clone();
///
/// load_shed.turn_on()?;
/// assert!(handle.state());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BooleanInput {
    inner: Arc<Inner>,
}

impl BooleanInput {
    /// Creates an input with an initial value.
    #[must_use]
    pub fn new(kind: InputKind, initial: bool) -> Self {
        Self::build(kind, None, initial)
    }

    /// Creates an input with a friendly name used in logs.
    #[must_use]
    pub fn with_name(kind: InputKind, name: impl Into<String>, initial: bool) -> Self {
        Self::build(kind, Some(name.into()), initial)
    }

    fn build(kind: InputKind, name: Option<String>, initial: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                kind,
                name,
                state: RwLock::new(initial),
                callbacks: InputCallbackRegistry::new(),
            }),
        }
    }

    /// Returns the role this input was created for.
    #[must_use]
    pub fn kind(&self) -> InputKind {
        self.inner.kind
    }

    /// Returns the friendly name, or the role name when none was given.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner
            .name
            .as_deref()
            .unwrap_or_else(|| self.inner.kind.as_str())
    }

    /// Returns the current value.
    #[must_use]
    pub fn state(&self) -> bool {
        *self.inner.state.read()
    }

    /// Sets the value and notifies listeners if it changed.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by a listener, typically
    /// [`Error::ActuatorUnavailable`](crate::Error::ActuatorUnavailable) from
    /// an energy management core with no actuator bound. The new value is kept.
    pub fn set(&self, value: bool) -> Result<()> {
        {
            let mut state = self.inner.state.write();
            if *state == value {
                return Ok(());
            }
            *state = value;
        }
        tracing::debug!(input = %self.name(), value, "Input changed");
        self.inner.callbacks.dispatch(value)
    }

    /// Sets the value to `true`.
    ///
    /// # Errors
    ///
    /// See [`BooleanInput::set`].
    pub fn turn_on(&self) -> Result<()> {
        self.set(true)
    }

    /// Sets the value to `false`.
    ///
    /// # Errors
    ///
    /// See [`BooleanInput::set`].
    pub fn turn_off(&self) -> Result<()> {
        self.set(false)
    }

    /// Inverts the value.
    ///
    /// # Errors
    ///
    /// See [`BooleanInput::set`].
    pub fn toggle(&self) -> Result<()> {
        // Read and write under one lock so concurrent toggles do not cancel out.
        let value = {
            let mut state = self.inner.state.write();
            *state = !*state;
            *state
        };
        tracing::debug!(input = %self.name(), value, "Input toggled");
        self.inner.callbacks.dispatch(value)
    }

    /// Publishes a sensor reading. Same as [`BooleanInput::set`].
    ///
    /// # Errors
    ///
    /// See [`BooleanInput::set`].
    pub fn publish_state(&self, value: bool) -> Result<()> {
        self.set(value)
    }

    /// Registers a listener called with the new value on every change.
    pub fn on_state<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) -> Result<()> + Send + Sync + 'static,
    {
        self.inner.callbacks.on_state(callback)
    }

    /// Removes a listener.
    ///
    /// Returns `true` if the listener was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.callbacks.unsubscribe(id)
    }

    /// Returns the number of listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.callbacks.len()
    }
}

impl fmt::Debug for BooleanInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BooleanInput")
            .field("kind", &self.inner.kind)
            .field("name", &self.name())
            .field("state", &self.state())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
