// SPDX-License-Identifier: MPL-2.0
//! `toastbox` manages the lifecycle of toast notifications.
//!
//! A single [`notifications::ToastRegistry`] keeps a bounded, most-recent-first
//! queue of toasts, retires them on timers or on request, and fans every
//! change out to subscribed rendering surfaces.

#![doc(html_root_url = "https://docs.rs/toastbox/0.1.0")]

pub mod config;
pub mod error;
pub mod logging;
pub mod notifications;
pub mod paths;
