// SPDX-License-Identifier: MPL-2.0
//! Toast notification system.
//!
//! Toasts are transient, non-blocking messages (save succeeded, upload
//! failed, work in progress). Producers talk to one [`ToastRegistry`];
//! any number of rendering surfaces subscribe to it and redraw from the
//! ordered snapshot they receive on every change.
//!
//! # Components
//!
//! - [`toast`] - `Toast` record, kinds, auto-dismiss windows, show options and patches
//! - [`registry`] - `ToastRegistry` owning order, capacity, timers and fan-out
//! - [`subscribers`] - change-notification callbacks and `Snapshot`
//! - [`toaster`] - headless surface reconciling views with snapshots
//!
//! # Usage
//!
//! ```no_run
//! use toastbox::notifications::{
//!     RegistrySettings, ShowOptions, ToastKind, ToastPatch, ToastRegistry, Toaster,
//! };
//!
//! # #[tokio::main] async fn main() -> toastbox::error::Result<()> {
//! let registry = ToastRegistry::new(RegistrySettings::default())?;
//! let toaster = Toaster::attach(&registry);
//!
//! let id = registry.loading("Uploading…", ShowOptions::new());
//! registry.update(&id, ToastPatch::new().kind(ToastKind::Success).message("Uploaded"));
//!
//! for line in toaster.render_lines() {
//!     println!("{line}");
//! }
//! # Ok(()) }
//! ```
//!
//! # Behaviour
//!
//! - At most `max_visible` toasts (default 5); showing more evicts the oldest
//! - Non-loading toasts auto-dismiss after their window (default 10s)
//! - Loading toasts stay until updated to another kind or dismissed
//! - Every mutating call emits exactly one snapshot

pub mod registry;
mod settings;
pub mod subscribers;
pub mod toast;
pub mod toaster;

pub use registry::ToastRegistry;
pub use settings::{MaxVisible, RegistrySettings};
pub use subscribers::{Snapshot, SubscriptionId};
pub use toast::{AutoDismiss, ShowOptions, Toast, ToastId, ToastKind, ToastPatch};
pub use toaster::{RenderPass, Theme, ToastView, Toaster};
