// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Toasts**: Visible cap and auto-dismiss window
//! - **Logging**: Default tracing filter

// ==========================================================================
// Toast Defaults
// ==========================================================================

/// Default number of toasts kept at once; showing more evicts the oldest.
pub const DEFAULT_MAX_VISIBLE: usize = 5;

/// Smallest accepted visible cap.
pub const MIN_MAX_VISIBLE: usize = 1;

/// Largest accepted visible cap.
pub const MAX_MAX_VISIBLE: usize = 50;

/// Auto-dismiss window applied when a non-loading toast has no explicit duration.
pub const DEFAULT_DURATION_MS: i64 = 10_000;

// ==========================================================================
// Logging Defaults
// ==========================================================================

/// Tracing filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "info";
