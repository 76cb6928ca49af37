// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Automation surface.
//!
//! An automation engine evaluates [`Condition`]s on demand, handing them
//! whatever context the triggering event carries. [`SetDeviceStateCondition`]
//! drives an energy management core and reports whether the device followed,
//! so it works both as an action and as a branch condition.

mod condition;
mod templatable;

pub use condition::{Condition, SetDeviceStateCondition};
pub use templatable::TemplatableValue;
