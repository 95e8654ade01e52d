// SPDX-License-Identifier: MPL-2.0
//! Registry construction settings.

use super::toast::AutoDismiss;
use crate::config::{
    DEFAULT_DURATION_MS, DEFAULT_MAX_VISIBLE, MAX_MAX_VISIBLE, MIN_MAX_VISIBLE,
};

/// Upper bound on simultaneously active toasts.
///
/// This newtype enforces validity at the type level, ensuring the value
/// is always within the valid range (1–50).
///
/// # Example
///
/// ```
/// use toastbox::notifications::MaxVisible;
///
/// assert_eq!(MaxVisible::new(3).value(), 3);
/// assert_eq!(MaxVisible::new(0).value(), 1); // Clamped to min
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxVisible(usize);

impl MaxVisible {
    /// Creates a new cap, clamping to the valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(MIN_MAX_VISIBLE, MAX_MAX_VISIBLE))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for MaxVisible {
    fn default() -> Self {
        Self(DEFAULT_MAX_VISIBLE)
    }
}

/// Settings a [`ToastRegistry`](super::ToastRegistry) is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrySettings {
    /// Cap on active toasts; older ones are evicted past it.
    pub max_visible: MaxVisible,
    /// Window applied to non-loading toasts shown without an explicit one.
    pub default_duration: AutoDismiss,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            max_visible: MaxVisible::default(),
            default_duration: AutoDismiss::from_millis(DEFAULT_DURATION_MS),
        }
    }
}
