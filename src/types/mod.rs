// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the crate.
//!
//! # Types
//!
//! - [`PowerState`] - On/Off state of the controlled device
//! - [`InputKind`] - Role of one of the five boolean inputs
//! - [`InputSnapshot`] - Values of all five inputs at one instant

mod input_kind;
mod power;

pub use input_kind::{InputKind, InputSnapshot};
pub use power::PowerState;
