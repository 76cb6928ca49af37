// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for input and core state subscriptions.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`InputCallbackRegistry`] - Listeners attached to one boolean input
//! - [`CallbackRegistry`] - Listeners attached to an energy management core

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::error::Result;
use crate::state::StateChange;

/// Unique identifier for a subscription.
///
/// This ID is returned when creating a subscription and can be used to
/// unsubscribe later. IDs are unique within one registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for input state callbacks. A returned error aborts the
/// notification and is surfaced to whoever changed the input.
type InputCallback = Arc<dyn Fn(bool) -> Result<()> + Send + Sync>;

/// Type alias for generic state change callbacks.
type StateChangedCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// Type alias for applied device state callbacks.
type DeviceStateCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Type alias for inconsistent application callbacks (requested, applied).
type MismatchCallback = Arc<dyn Fn(bool, bool) + Send + Sync>;

/// Registry of listeners attached to a single boolean input.
///
/// Listeners are dispatched in subscription order, so the core that
/// subscribed first reacts first.
pub struct InputCallbackRegistry {
    next_id: AtomicU64,
    callbacks: RwLock<Vec<(SubscriptionId, InputCallback)>>,
}

impl InputCallbackRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            callbacks: RwLock::new(Vec::new()),
        }
    }

    /// Registers a listener for value changes.
    pub fn on_state<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) -> Result<()> + Send + Sync + 'static,
    {
        let id = SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.callbacks.write().push((id, Arc::new(callback)));
        id
    }

    /// Unregisters a listener.
    ///
    /// Returns `true` if a listener was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut callbacks = self.callbacks.write();
        let before = callbacks.len();
        callbacks.retain(|(existing, _)| *existing != id);
        callbacks.len() != before
    }

    /// Notifies every listener of a new value.
    ///
    /// The listener list is cloned before dispatch so a listener may
    /// subscribe or unsubscribe without deadlocking.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by a listener. Every listener is
    /// still called, so one failing subscriber does not hide the change from
    /// the others.
    pub fn dispatch(&self, value: bool) -> Result<()> {
        let callbacks: Vec<InputCallback> = self
            .callbacks
            .read()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        let mut first_error = None;
        for callback in callbacks {
            if let Err(e) = callback(value) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.read().len()
    }

    /// Returns `true` if there are no registered listeners.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InputCallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InputCallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputCallbackRegistry")
            .field("callback_count", &self.len())
            .finish()
    }
}

/// Registry for managing energy management core callbacks.
///
/// It uses thread-safe interior mutability via `parking_lot::RwLock`.
/// Callbacks are wrapped in `Arc` and cloned out of the lock before they
/// run, so a callback may read the core or subscribe again.
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// Generic state change callbacks (receives all changes).
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
    /// Applied device state callbacks.
    device_state_callbacks: RwLock<HashMap<SubscriptionId, DeviceStateCallback>>,
    /// Callbacks for actuations that did not apply the requested state.
    mismatch_callbacks: RwLock<HashMap<SubscriptionId, MismatchCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            state_changed_callbacks: RwLock::new(HashMap::new()),
            device_state_callbacks: RwLock::new(HashMap::new()),
            mismatch_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for all state changes.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for changes of the applied device state.
    pub fn on_device_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.device_state_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for actuations whose applied state differs from
    /// the requested one. It receives `(requested, applied)`.
    pub fn on_inconsistent_application<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool, bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.mismatch_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        if self.state_changed_callbacks.write().remove(&id).is_some() {
            return true;
        }
        if self.device_state_callbacks.write().remove(&id).is_some() {
            return true;
        }
        self.mismatch_callbacks.write().remove(&id).is_some()
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Dispatches a state change to relevant callbacks.
    pub fn dispatch(&self, change: &StateChange) {
        let callbacks: Vec<_> = self
            .state_changed_callbacks
            .read()
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback(change);
        }

        if let StateChange::Device {
            requested,
            applied,
            previous,
            ..
        } = change
        {
            if previous != applied {
                let callbacks: Vec<_> = self
                    .device_state_callbacks
                    .read()
                    .values()
                    .cloned()
                    .collect();
                for callback in callbacks {
                    callback(*applied);
                }
            }
            if requested != applied {
                let callbacks: Vec<_> =
                    self.mismatch_callbacks.read().values().cloned().collect();
                for callback in callbacks {
                    callback(*requested, *applied);
                }
            }
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.state_changed_callbacks.read().len()
            + self.device_state_callbacks.read().len()
            + self.mismatch_callbacks.read().len()
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}
