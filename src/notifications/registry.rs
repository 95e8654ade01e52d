// SPDX-License-Identifier: MPL-2.0
//! Toast lifecycle management.
//!
//! The `ToastRegistry` owns the active toasts, their display order
//! (most recently shown first), one auto-dismiss timer per toast and the
//! change channel. Every mutating call changes state under one lock, then
//! publishes exactly one snapshot after the lock is released.

use super::settings::RegistrySettings;
use super::subscribers::{dispatch, Snapshot, SubscriberList, SubscriptionId};
use super::toast::{effective_duration, ShowOptions, Toast, ToastId, ToastKind, ToastPatch};
use crate::error::Result;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, trace};

/// Timer armed for one toast.
///
/// `generation` identifies this particular arming, so a timer that already
/// woke up can tell whether it was cancelled or replaced in the meantime.
struct PendingTimer {
    generation: u64,
    handle: AbortHandle,
}

#[derive(Default)]
struct State {
    toasts: HashMap<ToastId, Toast>,
    /// Ids, newest first. Always exactly the key set of `toasts`.
    order: VecDeque<ToastId>,
    timers: HashMap<ToastId, PendingTimer>,
    next_generation: u64,
    revision: u64,
}

impl State {
    fn cancel_timer(&mut self, id: &str) {
        if let Some(timer) = self.timers.remove(id) {
            timer.handle.abort();
            trace!(id, generation = timer.generation, "auto-dismiss timer cancelled");
        }
    }

    fn cancel_all_timers(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.handle.abort();
        }
    }

    /// The single removal path: drops the toast, its order slot and its timer.
    fn remove(&mut self, id: &str) -> Option<Toast> {
        let toast = self.toasts.remove(id)?;
        self.order.retain(|entry| entry.as_str() != id);
        self.cancel_timer(id);
        Some(toast)
    }

    fn ordered(&self) -> Vec<Toast> {
        self.order
            .iter()
            .filter_map(|id| self.toasts.get(id))
            .cloned()
            .collect()
    }

    fn snapshot(&mut self) -> Snapshot {
        self.revision += 1;
        self.current()
    }

    fn current(&self) -> Snapshot {
        Snapshot::new(self.revision, self.ordered())
    }
}

struct Shared {
    settings: RegistrySettings,
    runtime: Handle,
    state: Mutex<State>,
    subscribers: Mutex<SubscriberList>,
    latest: watch::Sender<Snapshot>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.state.get_mut().cancel_all_timers();
    }
}

/// Registry of active toasts.
///
/// Cheap to clone; clones share the same state. Timers run on the tokio
/// runtime the registry was built with and only hold a weak reference, so
/// dropping the last handle cancels every pending timer.
#[derive(Clone)]
pub struct ToastRegistry {
    shared: Arc<Shared>,
}

impl fmt::Debug for ToastRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("ToastRegistry")
            .field("settings", &self.shared.settings)
            .field("active", &state.order.len())
            .field("pending_timers", &state.timers.len())
            .finish_non_exhaustive()
    }
}

impl ToastRegistry {
    /// Creates a registry driving its timers on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Runtime`](crate::error::Error::Runtime) when called
    /// outside of a tokio runtime.
    pub fn new(settings: RegistrySettings) -> Result<Self> {
        let runtime = Handle::try_current()?;
        Ok(Self::with_runtime(settings, runtime))
    }

    /// Creates a registry driving its timers on `runtime`.
    #[must_use]
    pub fn with_runtime(settings: RegistrySettings, runtime: Handle) -> Self {
        let (latest, _) = watch::channel(Snapshot::default());
        Self {
            shared: Arc::new(Shared {
                settings,
                runtime,
                state: Mutex::new(State::default()),
                subscribers: Mutex::new(SubscriberList::default()),
                latest,
            }),
        }
    }

    #[must_use]
    pub fn settings(&self) -> RegistrySettings {
        self.shared.settings
    }

    /// Shows a toast, or re-shows the one with `options.id`.
    ///
    /// A re-show replaces kind, message, duration and dismissibility, keeps
    /// `created_at` and moves the toast to the front. Past the visible cap the
    /// oldest toasts are dismissed. Emits one notification.
    pub fn show(&self, kind: ToastKind, message: impl Into<String>, options: ShowOptions) -> ToastId {
        let settings = self.shared.settings;
        let id = options.id.unwrap_or_else(ToastId::generate);
        let now = Utc::now();

        let snapshot = {
            let mut state = self.shared.state.lock();
            let previous = state
                .toasts
                .get(&id)
                .map(|t| (t.created_at(), t.updated_at()));
            let created_at = previous.map_or(now, |(created, _)| created);

            let mut toast = Toast::new(
                id.clone(),
                kind,
                message.into(),
                created_at,
                effective_duration(kind, options.duration, settings.default_duration),
                options.dismissible.unwrap_or(true),
            );
            toast.touch(now);
            if let Some((_, updated)) = previous {
                toast.touch(updated);
            }
            let window = toast.expiry_window();

            state.toasts.insert(id.clone(), toast);
            state.order.retain(|entry| entry != &id);
            state.order.push_front(id.clone());
            debug!(id = %id, kind = %kind, reshow = previous.is_some(), "toast shown");

            while state.order.len() > settings.max_visible.value() {
                let Some(oldest) = state.order.back().cloned() else {
                    break;
                };
                state.remove(oldest.as_str());
                debug!(id = %oldest, "toast evicted over capacity");
            }

            self.reschedule(&mut state, &id, window);
            state.snapshot()
        };

        self.publish(snapshot);
        id
    }

    pub fn info(&self, message: impl Into<String>, options: ShowOptions) -> ToastId {
        self.show(ToastKind::Info, message, options)
    }

    pub fn success(&self, message: impl Into<String>, options: ShowOptions) -> ToastId {
        self.show(ToastKind::Success, message, options)
    }

    pub fn warning(&self, message: impl Into<String>, options: ShowOptions) -> ToastId {
        self.show(ToastKind::Warning, message, options)
    }

    pub fn danger(&self, message: impl Into<String>, options: ShowOptions) -> ToastId {
        self.show(ToastKind::Danger, message, options)
    }

    pub fn loading(&self, message: impl Into<String>, options: ShowOptions) -> ToastId {
        self.show(ToastKind::Loading, message, options)
    }

    /// Merges `patch` into an active toast without changing its position.
    ///
    /// Unknown ids are ignored and emit nothing.
    pub fn update(&self, id: impl AsRef<str>, patch: ToastPatch) {
        let id = id.as_ref();
        let default = self.shared.settings.default_duration;

        let snapshot = {
            let mut state = self.shared.state.lock();
            let Some(toast) = state.toasts.get_mut(id) else {
                trace!(id, "update ignored for unknown toast");
                return;
            };
            toast.apply_patch(patch, default, Utc::now());
            let window = toast.expiry_window();
            let key = toast.id().clone();
            debug!(id, kind = %toast.kind(), "toast updated");

            self.reschedule(&mut state, &key, window);
            state.snapshot()
        };

        self.publish(snapshot);
    }

    /// Removes a toast and cancels its timer. Unknown ids are ignored.
    pub fn dismiss(&self, id: impl AsRef<str>) {
        let id = id.as_ref();
        let snapshot = {
            let mut state = self.shared.state.lock();
            if state.remove(id).is_none() {
                return;
            }
            debug!(id, "toast dismissed");
            state.snapshot()
        };
        self.publish(snapshot);
    }

    /// Removes every toast and cancels every timer, emitting one notification.
    pub fn clear_all(&self) {
        let snapshot = {
            let mut state = self.shared.state.lock();
            state.cancel_all_timers();
            let cleared = state.order.len();
            state.toasts.clear();
            state.order.clear();
            debug!(cleared, "all toasts cleared");
            state.snapshot()
        };
        self.publish(snapshot);
    }

    /// Current toasts, newest first. A fresh collection on every call.
    #[must_use]
    pub fn get_all(&self) -> Vec<Toast> {
        self.shared.state.lock().ordered()
    }

    #[must_use]
    pub fn get(&self, id: impl AsRef<str>) -> Option<Toast> {
        self.shared.state.lock().toasts.get(id.as_ref()).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.state.lock().order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn has_pending_timer(&self, id: impl AsRef<str>) -> bool {
        self.shared.state.lock().timers.contains_key(id.as_ref())
    }

    #[must_use]
    pub fn pending_timer_count(&self) -> usize {
        self.shared.state.lock().timers.len()
    }

    /// Registers `callback` to receive every snapshot from now on.
    ///
    /// Callbacks run after the state lock is released. When several threads
    /// mutate the registry at once, snapshots may arrive out of order; compare
    /// [`Snapshot::revision`] and drop anything older than what was last seen.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        let id = self.shared.subscribers.lock().add(Arc::new(callback));
        debug!(?id, "subscriber attached");
        id
    }

    /// Detaches a subscriber. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.shared.subscribers.lock().remove(id);
        if removed {
            debug!(?id, "subscriber detached");
        }
        removed
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.lock().len()
    }

    /// Current contents, tagged with the revision of the last change.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.shared.state.lock().current()
    }

    /// Receiver that always holds the latest snapshot, for async consumers.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.shared.latest.subscribe()
    }

    /// Tears the registry down: cancels all timers, drops all toasts and
    /// detaches all subscribers. Callbacks are not invoked; the watch channel
    /// is moved to an empty snapshot so late readers see no leftovers.
    pub fn shutdown(&self) {
        self.shared.subscribers.lock().clear();
        let snapshot = {
            let mut state = self.shared.state.lock();
            state.cancel_all_timers();
            state.toasts.clear();
            state.order.clear();
            state.snapshot()
        };
        self.store_latest(&snapshot);
        debug!("toast registry shut down");
    }

    /// Cancels the current timer for `id` and arms a new one if `window` is set.
    fn reschedule(&self, state: &mut State, id: &ToastId, window: Option<Duration>) {
        state.cancel_timer(id.as_str());
        let Some(window) = window else {
            return;
        };

        let generation = state.next_generation;
        state.next_generation += 1;

        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        let timer_id = id.clone();
        let task = self.shared.runtime.spawn(async move {
            tokio::time::sleep(window).await;
            if let Some(shared) = weak.upgrade() {
                ToastRegistry { shared }.expire(&timer_id, generation);
            }
        });

        trace!(id = %id, generation, ?window, "auto-dismiss timer armed");
        state.timers.insert(
            id.clone(),
            PendingTimer {
                generation,
                handle: task.abort_handle(),
            },
        );
    }

    /// Timer callback: dismisses `id` if this timer is still the current one.
    fn expire(&self, id: &ToastId, generation: u64) {
        let snapshot = {
            let mut state = self.shared.state.lock();
            match state.timers.get(id.as_str()) {
                Some(timer) if timer.generation == generation => {}
                _ => {
                    trace!(id = %id, generation, "stale auto-dismiss timer discarded");
                    return;
                }
            }
            state.timers.remove(id.as_str());
            if state.remove(id.as_str()).is_none() {
                return;
            }
            debug!(id = %id, "toast expired");
            state.snapshot()
        };
        self.publish(snapshot);
    }

    fn publish(&self, snapshot: Snapshot) {
        self.store_latest(&snapshot);
        dispatch(&self.shared.subscribers, &snapshot);
    }

    /// Moves the watch channel forward; older revisions are dropped.
    fn store_latest(&self, snapshot: &Snapshot) {
        self.shared.latest.send_if_modified(|current| {
            if snapshot.revision() > current.revision() {
                *current = snapshot.clone();
                true
            } else {
                false
            }
        });
    }
}
