// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for input and decision changes.
//!
//! Two kinds of listeners exist:
//!
//! - Input listeners, attached to a [`BooleanInput`](crate::input::BooleanInput)
//!   through an [`InputCallbackRegistry`]. The energy management core is one of them.
//! - Core observers, attached to an [`EnergyManagement`](crate::EnergyManagement)
//!   through the [`Subscribable`] trait and stored in a [`CallbackRegistry`].
//!
//! Every subscription returns a [`SubscriptionId`] that can be used to
//! unsubscribe later.

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, InputCallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;
