// SPDX-License-Identifier: MPL-2.0
//! Change-notification fan-out.
//!
//! Subscribers are plain callbacks invoked synchronously with the full
//! ordered snapshot. The list is copied before dispatch, so a callback may
//! subscribe, unsubscribe or call back into the registry.

use super::toast::Toast;
use parking_lot::Mutex;
use serde::Serialize;
use std::ops::Deref;
use std::sync::Arc;

/// Callback invoked on every registry change.
pub type Callback = Arc<dyn Fn(&Snapshot) + Send + Sync>;

/// Handle returned by `subscribe`, used to detach again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Read-only view of the registry at one point in time, newest first.
///
/// `revision` grows by one for every notification, letting a consumer
/// drop a snapshot that arrives after a newer one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    revision: u64,
    toasts: Arc<[Toast]>,
}

impl Snapshot {
    pub(crate) fn new(revision: u64, toasts: Vec<Toast>) -> Self {
        Self {
            revision,
            toasts: toasts.into(),
        }
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }
}

impl Deref for Snapshot {
    type Target = [Toast];

    fn deref(&self) -> &[Toast] {
        &self.toasts
    }
}

#[derive(Default)]
pub(crate) struct SubscriberList {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback)>,
}

impl SubscriberList {
    pub(crate) fn add(&mut self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    fn callbacks(&self) -> Vec<Callback> {
        self.entries.iter().map(|(_, cb)| Arc::clone(cb)).collect()
    }
}

/// Invokes every subscriber registered at call time, in subscription order.
pub(crate) fn dispatch(list: &Mutex<SubscriberList>, snapshot: &Snapshot) {
    let callbacks = list.lock().callbacks();
    for callback in callbacks {
        callback(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>) -> Callback {
        let counter = Arc::clone(counter);
        Arc::new(move |_: &Snapshot| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn dispatch_reaches_every_subscriber() {
        let list = Mutex::new(SubscriberList::default());
        let counter = Arc::new(AtomicUsize::new(0));
        list.lock().add(counting(&counter));
        list.lock().add(counting(&counter));

        dispatch(&list, &Snapshot::default());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn removed_subscriber_is_not_called() {
        let list = Mutex::new(SubscriberList::default());
        let counter = Arc::new(AtomicUsize::new(0));
        let id = list.lock().add(counting(&counter));

        assert!(list.lock().remove(id));
        assert!(!list.lock().remove(id));
        dispatch(&list, &Snapshot::default());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn callback_may_unsubscribe_during_dispatch() {
        let list = Arc::new(Mutex::new(SubscriberList::default()));
        let inner = Arc::clone(&list);
        let id_slot = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&id_slot);
        let id = list.lock().add(Arc::new(move |_: &Snapshot| {
            if let Some(id) = *slot.lock() {
                inner.lock().remove(id);
            }
        }));
        *id_slot.lock() = Some(id);

        dispatch(&list, &Snapshot::default());
        assert_eq!(list.lock().len(), 0);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut list = SubscriberList::default();
        let counter = Arc::new(AtomicUsize::new(0));
        let a = list.add(counting(&counter));
        list.remove(a);
        let b = list.add(counting(&counter));
        assert_ne!(a, b);
    }
}
