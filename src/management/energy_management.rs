// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The energy management core.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::{Mutex, RwLock};

use super::{EnergyManagementConfig, ManagerId};
use crate::error::{ConfigurationError, Error, Result};
use crate::input::{BooleanInput, InputBindings};
use crate::policy::{DecisionPolicy, StandardPolicy};
use crate::state::{ChangeSource, DecisionState, StateChange};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};
use crate::types::{InputKind, PowerState};

type Actuator = Arc<dyn Fn(bool) -> bool + Send + Sync>;

#[derive(Default)]
struct CoreState {
    decision: DecisionState,
    /// A decision or request is running.
    in_flight: bool,
    /// An input changed while a decision was running.
    pending: bool,
}

struct Shared {
    id: ManagerId,
    config: EnergyManagementConfig,
    policy: RwLock<Arc<dyn DecisionPolicy>>,
    inputs: OnceLock<InputBindings>,
    subscriptions: Mutex<Vec<(InputKind, SubscriptionId)>>,
    actuator: OnceLock<Actuator>,
    state: Mutex<CoreState>,
    callbacks: CallbackRegistry,
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Some(inputs) = self.inputs.get() {
            for (kind, id) in self.subscriptions.get_mut().drain(..) {
                inputs.get(kind).unsubscribe(id);
            }
        }
    }
}

/// Clears the in-flight flag if an actuator or policy panics mid-decision.
struct InFlight<'a> {
    state: &'a Mutex<CoreState>,
    armed: bool,
}

impl InFlight<'_> {
    /// Releases the flag. Returns whether changes were queued meanwhile.
    fn release(&mut self) -> bool {
        let mut state = self.state.lock();
        state.in_flight = false;
        self.armed = false;
        std::mem::take(&mut state.pending)
    }

    /// Keeps the flag if changes were queued, otherwise releases it.
    /// Returns whether another round is needed.
    fn continue_if_pending(&mut self) -> bool {
        let mut state = self.state.lock();
        if std::mem::take(&mut state.pending) {
            return true;
        }
        state.in_flight = false;
        self.armed = false;
        false
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.state.lock();
            state.in_flight = false;
            state.pending = false;
        }
    }
}

/// Coordinates a device's power state between load shedding and energy saving.
///
/// The core is bound once to five [`BooleanInput`]s and to a device state
/// function (the actuator). Whenever an input changes it re-runs its
/// [`DecisionPolicy`] and, when the decision differs from the previous one,
/// drives the device through the actuator. The actuator's return value is
/// recorded as the applied state.
///
/// `EnergyManagement` is a cheap handle; clones refer to the same core.
///
/// # Examples
///
/// ```
/// use energy_management::{EnergyManagement, InputBindings};
///
/// # fn main() -> energy_management::Result<()> {
/// let inputs = InputBindings::new();
/// let core = EnergyManagement::new();
/// core.initialize(inputs.clone())?;
/// core.set_device_state_function(|on| on)?;
///
/// inputs.turn_on_after_shedding.turn_on()?;
/// assert!(core.current_state());
///
/// inputs.load_shed.turn_on()?;
/// assert!(!core.current_state());
///
/// inputs.load_shed.turn_off()?;
/// assert!(core.current_state());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EnergyManagement {
    shared: Arc<Shared>,
}

impl EnergyManagement {
    /// Creates a core with the default configuration and [`StandardPolicy`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EnergyManagementConfig::default())
    }

    /// Creates a core from a configuration.
    #[must_use]
    pub fn with_config(config: EnergyManagementConfig) -> Self {
        let policy: Arc<dyn DecisionPolicy> = Arc::new(StandardPolicy::new(config.precedence));
        let shared = Shared {
            id: ManagerId::new(),
            config,
            policy: RwLock::new(policy),
            inputs: OnceLock::new(),
            subscriptions: Mutex::new(Vec::new()),
            actuator: OnceLock::new(),
            state: Mutex::new(CoreState::default()),
            callbacks: CallbackRegistry::new(),
        };
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Returns this core's identifier.
    #[must_use]
    pub fn id(&self) -> ManagerId {
        self.shared.id
    }

    /// Returns the configured friendly name, or the short identifier.
    #[must_use]
    pub fn name(&self) -> String {
        self.shared
            .config
            .name
            .clone()
            .unwrap_or_else(|| self.shared.id.short())
    }

    /// Returns the configuration this core was built with.
    #[must_use]
    pub fn config(&self) -> &EnergyManagementConfig {
        &self.shared.config
    }

    // =========================================================================
    // Binding
    // =========================================================================

    /// Replaces the decision policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::AlreadyInitialized`] once inputs are
    /// bound, since decisions may already have been made under the old policy.
    pub fn set_policy<P>(&self, policy: P) -> Result<()>
    where
        P: DecisionPolicy + 'static,
    {
        if self.is_initialized() {
            return Err(ConfigurationError::AlreadyInitialized.into());
        }
        *self.shared.policy.write() = Arc::new(policy);
        Ok(())
    }

    /// Binds the five inputs and subscribes to their changes.
    ///
    /// Binding does not make a decision; call [`EnergyManagement::recompute`]
    /// once the actuator is bound to settle the initial state.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if inputs were already bound or if a
    /// handle was created for a different role.
    pub fn initialize(&self, inputs: InputBindings) -> Result<()> {
        inputs.validate().inspect_err(|e| {
            tracing::warn!(manager = %self.name(), error = %e, "Rejected input bindings");
        })?;
        if self.shared.inputs.set(inputs).is_err() {
            tracing::warn!(manager = %self.name(), "Tried to initialize an initialized core");
            return Err(ConfigurationError::AlreadyInitialized.into());
        }
        let Some(inputs) = self.shared.inputs.get() else {
            return Err(Error::NotInitialized);
        };

        let mut subscriptions = self.shared.subscriptions.lock();
        for (kind, input) in inputs.iter() {
            let core = Arc::downgrade(&self.shared);
            let id = input.on_state(move |value| Self::notify(&core, kind, value));
            subscriptions.push((kind, id));
        }
        tracing::debug!(manager = %self.name(), inputs = ?inputs.snapshot(), "Inputs bound");
        Ok(())
    }

    /// Binds the five inputs from individual, possibly missing references.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingInput`] for the first `None`,
    /// otherwise as [`EnergyManagement::initialize`].
    pub fn initialize_with(
        &self,
        load_shed: Option<BooleanInput>,
        energy_saving: Option<BooleanInput>,
        turn_on_after_shedding: Option<BooleanInput>,
        energy_saving_overwritten: Option<BooleanInput>,
        shedding_stop_requested: Option<BooleanInput>,
    ) -> Result<()> {
        let inputs = InputBindings::try_from_parts(
            load_shed,
            energy_saving,
            turn_on_after_shedding,
            energy_saving_overwritten,
            shedding_stop_requested,
        )?;
        self.initialize(inputs)
    }

    /// Binds the device state function.
    ///
    /// The function receives the desired state and returns the state that
    /// was actually applied. It is called synchronously and must return
    /// before the core proceeds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::ActuatorAlreadyBound`] if a function was
    /// already bound.
    pub fn set_device_state_function<F>(&self, actuator: F) -> Result<()>
    where
        F: Fn(bool) -> bool + Send + Sync + 'static,
    {
        if self.shared.actuator.set(Arc::new(actuator)).is_err() {
            tracing::warn!(manager = %self.name(), "Tried to rebind the device state function");
            return Err(ConfigurationError::ActuatorAlreadyBound.into());
        }
        tracing::debug!(manager = %self.name(), "Device state function bound");
        Ok(())
    }

    /// Returns `true` once inputs are bound.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.shared.inputs.get().is_some()
    }

    /// Returns `true` once the device state function is bound.
    #[must_use]
    pub fn has_actuator(&self) -> bool {
        self.shared.actuator.get().is_some()
    }

    /// Returns the bound inputs.
    #[must_use]
    pub fn inputs(&self) -> Option<&InputBindings> {
        self.shared.inputs.get()
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Returns the most recently applied device state.
    #[must_use]
    pub fn current_state(&self) -> bool {
        self.shared.state.lock().decision.applied()
    }

    /// Returns the last policy decision, `None` before the first one.
    #[must_use]
    pub fn decision(&self) -> Option<bool> {
        self.shared
            .state
            .lock()
            .decision
            .decision()
            .map(bool::from)
    }

    /// Returns a copy of the decision state.
    #[must_use]
    pub fn decision_state(&self) -> DecisionState {
        self.shared.state.lock().decision
    }

    // =========================================================================
    // Decisions
    // =========================================================================

    /// Runs the decision policy against the current inputs.
    ///
    /// The actuator is only invoked when the decision differs from the
    /// previous one, so recomputing with unchanged inputs does nothing. If
    /// another decision is running (an actuator that flips an input, or a
    /// concurrent caller), this one is queued and re-evaluated by the running
    /// decision before it returns.
    ///
    /// Returns the desired state.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInitialized`] if inputs are not bound
    /// - [`Error::ActuatorUnavailable`] if the device state function is not bound
    ///
    /// Nothing is recorded in either case.
    pub fn recompute(&self) -> Result<PowerState> {
        let inputs = self.shared.inputs.get().ok_or(Error::NotInitialized)?;
        let actuator = self
            .shared
            .actuator
            .get()
            .ok_or(Error::ActuatorUnavailable)?;
        let policy = Arc::clone(&*self.shared.policy.read());

        {
            let mut state = self.shared.state.lock();
            if state.in_flight {
                state.pending = true;
                drop(state);
                tracing::trace!(manager = %self.name(), "Decision in flight, queued recomputation");
                return Ok(policy.decide(&inputs.snapshot()));
            }
            state.in_flight = true;
        }
        let mut guard = InFlight {
            state: &self.shared.state,
            armed: true,
        };

        loop {
            let snapshot = inputs.snapshot();
            let desired = policy.decide(&snapshot);
            let previous = self.shared.state.lock().decision.decision();

            if previous == Some(desired) {
                tracing::trace!(manager = %self.name(), %desired, "Decision unchanged");
            } else {
                let change = StateChange::decision(previous, desired);
                let already_applied = {
                    let mut state = self.shared.state.lock();
                    state.decision.apply(&change);
                    state.decision.last_requested() == Some(desired.is_on())
                        && state.decision.applied() == desired.is_on()
                };
                self.shared.callbacks.dispatch(&change);
                tracing::info!(
                    manager = %self.name(),
                    ?previous,
                    %desired,
                    inputs = ?snapshot,
                    "Decision changed"
                );
                if already_applied {
                    tracing::debug!(
                        manager = %self.name(),
                        %desired,
                        "Device already in decided state"
                    );
                } else {
                    self.actuate(actuator, desired.is_on(), ChangeSource::Policy);
                }
            }

            if !guard.continue_if_pending() {
                return Ok(desired);
            }
        }
    }

    /// Attempts to drive the device to `desired`, independent of the policy.
    ///
    /// Uses the same actuation path as a policy decision and returns the
    /// state the actuator reported as applied. A return value different from
    /// `desired` means the device did not follow; [`current_state`] reflects
    /// what was applied and the policy decision is left untouched.
    ///
    /// With override tracking enabled, a request that was applied also
    /// updates the status sensors and the turn-on-after-shedding switch. The
    /// decision is recomputed once after all of those writes, and a decision
    /// matching the state the request already applied does not invoke the
    /// actuator again.
    ///
    /// [`current_state`]: EnergyManagement::current_state
    ///
    /// # Errors
    ///
    /// - [`Error::ActuatorUnavailable`] if the device state function is not bound
    /// - [`Error::DecisionInFlight`] if called from within a running decision
    pub fn request_state(&self, desired: bool) -> Result<bool> {
        let actuator = self
            .shared
            .actuator
            .get()
            .ok_or(Error::ActuatorUnavailable)?;

        {
            let mut state = self.shared.state.lock();
            if state.in_flight {
                return Err(Error::DecisionInFlight);
            }
            state.in_flight = true;
        }
        let mut guard = InFlight {
            state: &self.shared.state,
            armed: true,
        };

        tracing::debug!(manager = %self.name(), desired, "State requested");
        let applied = self.actuate(actuator, desired, ChangeSource::Request);

        // Tracking writes run while the request still holds the core, so
        // their recomputations collapse into the single one below.
        let tracked = if self.shared.config.track_overrides && applied == desired {
            self.track_request(desired)
        } else {
            Ok(())
        };
        if guard.release() {
            self.recompute()?;
        }
        tracked?;
        Ok(applied)
    }

    fn actuate(&self, actuator: &Actuator, requested: bool, source: ChangeSource) -> bool {
        let applied = actuator(requested);
        let change = {
            let mut state = self.shared.state.lock();
            let change = StateChange::Device {
                source,
                previous: state.decision.applied(),
                requested,
                applied,
            };
            state.decision.apply(&change);
            change
        };
        if !change.is_consistent() {
            tracing::warn!(
                manager = %self.name(),
                requested,
                applied,
                ?source,
                "Device did not apply the requested state"
            );
        }
        self.shared.callbacks.dispatch(&change);
        applied
    }

    // =========================================================================
    // Input reactions
    // =========================================================================

    fn notify(core: &Weak<Shared>, kind: InputKind, value: bool) -> Result<()> {
        match core.upgrade() {
            Some(shared) => Self { shared }.on_input_changed(kind, value),
            None => Ok(()),
        }
    }

    fn on_input_changed(&self, kind: InputKind, value: bool) -> Result<()> {
        tracing::debug!(manager = %self.name(), input = %kind, value, "Observed input change");
        self.shared
            .callbacks
            .dispatch(&StateChange::input(kind, value));
        if self.shared.config.track_overrides {
            self.track_input(kind, value)?;
        }
        self.recompute().map(|_| ())
    }

    /// Status bookkeeping after an input change.
    fn track_input(&self, kind: InputKind, value: bool) -> Result<()> {
        let Some(inputs) = self.shared.inputs.get() else {
            return Ok(());
        };
        match (kind, value) {
            // An override only lasts while energy saving does.
            (InputKind::EnergySaving, false) => {
                inputs.energy_saving_overwritten.publish_state(false)
            }
            // Shedding ended, so the resume request has been consumed.
            (InputKind::LoadShed, false) => inputs.shedding_stop_requested.publish_state(false),
            _ => Ok(()),
        }
    }

    /// Status bookkeeping after an applied explicit request.
    fn track_request(&self, desired: bool) -> Result<()> {
        let Some(inputs) = self.shared.inputs.get() else {
            return Ok(());
        };
        if desired {
            inputs.turn_on_after_shedding.turn_on()?;
            if inputs.load_shed.state() {
                inputs.shedding_stop_requested.publish_state(true)?;
            }
            if inputs.energy_saving.state() {
                inputs.energy_saving_overwritten.publish_state(true)?;
            }
        } else {
            // Cleared in this order so no intermediate decision turns the
            // device back on.
            inputs.energy_saving_overwritten.publish_state(false)?;
            inputs.shedding_stop_requested.publish_state(false)?;
            inputs.turn_on_after_shedding.turn_off()?;
        }
        Ok(())
    }
}

impl Default for EnergyManagement {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscribable for EnergyManagement {
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_state_changed(callback)
    }

    fn on_device_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_device_state_changed(callback)
    }

    fn on_inconsistent_application<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool, bool) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_inconsistent_application(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.callbacks.unsubscribe(id)
    }
}

impl fmt::Debug for EnergyManagement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnergyManagement")
            .field("id", &self.shared.id)
            .field("name", &self.shared.config.name)
            .field("initialized", &self.is_initialized())
            .field("has_actuator", &self.has_actuator())
            .field("state", &self.decision_state())
            .finish_non_exhaustive()
    }
}
