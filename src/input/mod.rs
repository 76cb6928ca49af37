// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Switch and sensor inputs.
//!
//! The host environment owns these state holders; an energy management core
//! receives handles to them at initialization and subscribes to their changes.

mod bindings;
mod boolean_input;

pub use bindings::InputBindings;
pub use boolean_input::BooleanInput;
