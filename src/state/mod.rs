// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decision state tracking types.
//!
//! [`DecisionState`] holds what a core has decided and applied, while
//! [`StateChange`] represents individual changes that update it and are
//! published to subscribers.

mod decision_state;
mod state_change;

pub use decision_state::DecisionState;
pub use state_change::{ChangeSource, StateChange};
