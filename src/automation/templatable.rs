// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Values that are either literal or computed from automation context.

use std::fmt;
use std::sync::Arc;

type Template<T, C> = Arc<dyn Fn(&C) -> T + Send + Sync>;

/// A literal value, or a function computing it from the evaluation context.
///
/// # Examples
///
/// ```
/// use energy_management::automation::TemplatableValue;
///
/// let literal: TemplatableValue<bool, u32> = true.into();
/// assert!(literal.value(&0));
///
/// let computed = TemplatableValue::computed(|hour: &u32| (6..22).contains(hour));
/// assert!(computed.value(&12));
/// assert!(!computed.value(&23));
/// ```
pub enum TemplatableValue<T, C> {
    /// A fixed value.
    Static(T),
    /// A value computed at evaluation time.
    Computed(Template<T, C>),
}

impl<T: Clone, C> TemplatableValue<T, C> {
    /// Wraps a function computing the value from the context.
    #[must_use]
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&C) -> T + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    /// Returns the value for `ctx`.
    #[must_use]
    pub fn value(&self, ctx: &C) -> T {
        match self {
            Self::Static(value) => value.clone(),
            Self::Computed(f) => f(ctx),
        }
    }
}

impl<T, C> From<T> for TemplatableValue<T, C> {
    fn from(value: T) -> Self {
        Self::Static(value)
    }
}

impl<T: Clone, C> Clone for TemplatableValue<T, C> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(value) => Self::Static(value.clone()),
            Self::Computed(f) => Self::Computed(Arc::clone(f)),
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for TemplatableValue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_value() {
        let value: TemplatableValue<bool, ()> = TemplatableValue::from(false);
        assert!(!value.value(&()));
        assert_eq!(format!("{value:?}"), "Static(false)");
    }

    #[test]
    fn computed_value_sees_context() {
        let value = TemplatableValue::computed(|ctx: &(bool, bool)| ctx.0 && ctx.1);
        assert!(value.value(&(true, true)));
        assert!(!value.value(&(true, false)));
        assert_eq!(format!("{value:?}"), "Computed(..)");
    }

    #[test]
    fn clones_share_the_function() {
        let value = TemplatableValue::computed(|n: &u8| *n > 3);
        let other = value.clone();
        assert_eq!(value.value(&5), other.value(&5));
    }
}
