// SPDX-License-Identifier: MPL-2.0
//! Core toast data structures.
//!
//! This module defines the `Toast` record, its `ToastKind`, the
//! `AutoDismiss` window, and the option/patch types producers pass to the
//! registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Opaque toast identifier, stable across updates to the same toast.
///
/// Producers may pick their own ids (to re-show or update a known toast) or
/// let the registry generate one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToastId(String);

impl ToastId {
    /// Wraps an explicit id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh id: `t_<unix millis>_<sequence>`, both base36.
    ///
    /// The sequence is process-wide, so generated ids never collide within a
    /// process even when the clock stalls or steps back.
    #[must_use]
    pub fn generate() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        Self(format!("t_{}_{}", base36(millis), base36(seq)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToastId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ToastId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ToastId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ToastId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Kind of toast; determines styling downstream and whether it can expire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
    /// Work in progress. Never expires on its own.
    Loading,
}

impl ToastKind {
    pub const ALL: [ToastKind; 5] = [
        ToastKind::Info,
        ToastKind::Success,
        ToastKind::Warning,
        ToastKind::Danger,
        ToastKind::Loading,
    ];

    #[must_use]
    pub fn is_loading(self) -> bool {
        self == ToastKind::Loading
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Warning => "warning",
            ToastKind::Danger => "danger",
            ToastKind::Loading => "loading",
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Auto-dismiss window of a toast.
///
/// Serialized as milliseconds; `0` means [`AutoDismiss::Disabled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AutoDismiss {
    /// Stays until dismissed explicitly.
    Disabled,
    /// Dismisses itself after the given delay.
    After(Duration),
}

impl AutoDismiss {
    /// Converts a millisecond count; zero and negative values disable expiry.
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        match u64::try_from(millis) {
            Ok(ms) if ms > 0 => AutoDismiss::After(Duration::from_millis(ms)),
            _ => AutoDismiss::Disabled,
        }
    }

    /// Delay after which a timer should fire, if any.
    #[must_use]
    pub fn window(self) -> Option<Duration> {
        match self {
            AutoDismiss::After(delay) if !delay.is_zero() => Some(delay),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_millis(self) -> i64 {
        self.window()
            .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
    }
}

impl From<Duration> for AutoDismiss {
    fn from(delay: Duration) -> Self {
        if delay.is_zero() {
            AutoDismiss::Disabled
        } else {
            AutoDismiss::After(delay)
        }
    }
}

impl Serialize for AutoDismiss {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_millis())
    }
}

impl<'de> Deserialize<'de> for AutoDismiss {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(AutoDismiss::from_millis)
    }
}

/// Resolves the stored window for a toast of `kind`.
///
/// Loading toasts never carry one; everything else falls back to `default`.
pub(crate) fn effective_duration(
    kind: ToastKind,
    requested: Option<AutoDismiss>,
    default: AutoDismiss,
) -> Option<AutoDismiss> {
    if kind.is_loading() {
        None
    } else {
        Some(requested.unwrap_or(default))
    }
}

/// A toast as seen by subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    id: ToastId,
    kind: ToastKind,
    message: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(rename = "duration_ms")]
    duration: Option<AutoDismiss>,
    dismissible: bool,
}

impl Toast {
    pub(crate) fn new(
        id: ToastId,
        kind: ToastKind,
        message: String,
        created_at: DateTime<Utc>,
        duration: Option<AutoDismiss>,
        dismissible: bool,
    ) -> Self {
        Self {
            id,
            kind,
            message,
            created_at,
            updated_at: created_at,
            duration,
            dismissible,
        }
    }

    #[must_use]
    pub fn id(&self) -> &ToastId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> ToastKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// When the toast was first shown. Preserved across re-shows and updates.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Stored auto-dismiss window; `None` for loading toasts.
    #[must_use]
    pub fn duration(&self) -> Option<AutoDismiss> {
        self.duration
    }

    #[must_use]
    pub fn dismissible(&self) -> bool {
        self.dismissible
    }

    /// Delay of the timer this toast should have pending, if any.
    #[must_use]
    pub fn expiry_window(&self) -> Option<Duration> {
        if self.kind.is_loading() {
            return None;
        }
        self.duration.and_then(AutoDismiss::window)
    }

    /// Advances `updated_at`, never moving it backwards.
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at).max(self.created_at);
    }

    /// Merges `patch` in place. Position in the display order is untouched.
    ///
    /// The duration is recomputed against the new kind: switching to loading
    /// drops it, switching away from loading takes the patch duration, then the
    /// stored one, then `default`.
    pub(crate) fn apply_patch(&mut self, patch: ToastPatch, default: AutoDismiss, now: DateTime<Utc>) {
        let kind = patch.kind.unwrap_or(self.kind);
        let duration = match patch.duration {
            Some(requested) => effective_duration(kind, Some(requested), default),
            None => effective_duration(kind, self.duration, default),
        };

        self.kind = kind;
        if let Some(message) = patch.message {
            self.message = message;
        }
        if let Some(dismissible) = patch.dismissible {
            self.dismissible = dismissible;
        }
        self.duration = duration;
        self.touch(now);
    }
}

/// Options for [`ToastRegistry::show`](super::ToastRegistry::show).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowOptions {
    /// Explicit id; re-showing an existing id updates it in place.
    pub id: Option<ToastId>,
    /// Auto-dismiss window; ignored for loading toasts.
    pub duration: Option<AutoDismiss>,
    /// Whether consumers may dismiss the toast. Defaults to `true`.
    pub dismissible: Option<bool>,
}

impl ShowOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<ToastId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn duration(mut self, duration: impl Into<AutoDismiss>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    /// Sets the window in milliseconds; zero or negative disables expiry.
    #[must_use]
    pub fn duration_ms(mut self, millis: i64) -> Self {
        self.duration = Some(AutoDismiss::from_millis(millis));
        self
    }

    #[must_use]
    pub fn dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = Some(dismissible);
        self
    }
}

/// Partial update for [`ToastRegistry::update`](super::ToastRegistry::update).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastPatch {
    pub kind: Option<ToastKind>,
    pub message: Option<String>,
    pub duration: Option<AutoDismiss>,
    pub dismissible: Option<bool>,
}

impl ToastPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn kind(mut self, kind: ToastKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn duration(mut self, duration: impl Into<AutoDismiss>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    #[must_use]
    pub fn duration_ms(mut self, millis: i64) -> Self {
        self.duration = Some(AutoDismiss::from_millis(millis));
        self
    }

    #[must_use]
    pub fn dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = Some(dismissible);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: AutoDismiss = AutoDismiss::After(Duration::from_secs(10));

    fn toast(kind: ToastKind, duration: Option<AutoDismiss>) -> Toast {
        Toast::new(
            ToastId::from("t"),
            kind,
            "hello".to_string(),
            Utc::now(),
            duration,
            true,
        )
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = ToastId::generate();
        let b = ToastId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("t_"));
    }

    #[test]
    fn base36_encodes_known_values() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
    }

    #[test]
    fn non_positive_millis_disable_auto_dismiss() {
        assert_eq!(AutoDismiss::from_millis(0), AutoDismiss::Disabled);
        assert_eq!(AutoDismiss::from_millis(-250), AutoDismiss::Disabled);
        assert_eq!(
            AutoDismiss::from_millis(250),
            AutoDismiss::After(Duration::from_millis(250))
        );
    }

    #[test]
    fn zero_duration_has_no_window() {
        assert_eq!(AutoDismiss::After(Duration::ZERO).window(), None);
        assert_eq!(AutoDismiss::from(Duration::ZERO), AutoDismiss::Disabled);
    }

    #[test]
    fn loading_never_carries_a_duration() {
        assert_eq!(
            effective_duration(ToastKind::Loading, Some(DEFAULT), DEFAULT),
            None
        );
        assert_eq!(
            effective_duration(ToastKind::Info, None, DEFAULT),
            Some(DEFAULT)
        );
    }

    #[test]
    fn patch_to_loading_drops_duration() {
        let mut t = toast(ToastKind::Info, Some(DEFAULT));
        t.apply_patch(
            ToastPatch::new().kind(ToastKind::Loading).duration_ms(500),
            DEFAULT,
            Utc::now(),
        );
        assert_eq!(t.duration(), None);
        assert_eq!(t.expiry_window(), None);
    }

    #[test]
    fn patch_from_loading_uses_default_without_explicit_duration() {
        let mut t = toast(ToastKind::Loading, None);
        t.apply_patch(ToastPatch::new().kind(ToastKind::Success), DEFAULT, Utc::now());
        assert_eq!(t.duration(), Some(DEFAULT));
    }

    #[test]
    fn patch_keeps_stored_duration_when_not_given() {
        let mut t = toast(ToastKind::Info, Some(AutoDismiss::Disabled));
        t.apply_patch(ToastPatch::new().message("still here"), DEFAULT, Utc::now());
        assert_eq!(t.duration(), Some(AutoDismiss::Disabled));
        assert_eq!(t.message(), "still here");
    }

    #[test]
    fn touch_never_moves_updated_at_backwards() {
        let mut t = toast(ToastKind::Info, Some(DEFAULT));
        let created = t.created_at();
        t.touch(created - chrono::Duration::seconds(5));
        assert_eq!(t.updated_at(), created);
    }

    #[test]
    fn toast_serializes_duration_as_millis() {
        let t = toast(ToastKind::Warning, Some(AutoDismiss::from_millis(1500)));
        let json = serde_json::to_value(&t).expect("serialize toast");
        assert_eq!(json["duration_ms"], 1500);
        assert_eq!(json["kind"], "warning");

        let loading = toast(ToastKind::Loading, None);
        let json = serde_json::to_value(&loading).expect("serialize toast");
        assert!(json["duration_ms"].is_null());
    }
}
