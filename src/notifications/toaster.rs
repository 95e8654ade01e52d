// SPDX-License-Identifier: MPL-2.0
//! Headless toast surface.
//!
//! A `Toaster` is the rendering side of the registry: it subscribes to
//! change notifications and keeps a keyed list of views in sync with the
//! latest snapshot, so a frontend only has to draw `views()`.

use super::registry::ToastRegistry;
use super::subscribers::{Snapshot, SubscriptionId};
use super::toast::{Toast, ToastId, ToastKind};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Visual theme token a toast kind renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Info,
    Success,
    Warning,
    Danger,
    Secondary,
}

impl From<ToastKind> for Theme {
    fn from(kind: ToastKind) -> Self {
        match kind {
            ToastKind::Danger => Theme::Danger,
            ToastKind::Warning => Theme::Warning,
            ToastKind::Success => Theme::Success,
            ToastKind::Info => Theme::Info,
            ToastKind::Loading => Theme::Secondary,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Info => "info",
            Theme::Success => "success",
            Theme::Warning => "warning",
            Theme::Danger => "danger",
            Theme::Secondary => "secondary",
        })
    }
}

/// What the surface draws for one toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub id: ToastId,
    pub kind: ToastKind,
    pub theme: Theme,
    pub message: String,
    /// Whether the dismiss control is active.
    pub dismissible: bool,
}

impl ToastView {
    fn from_toast(toast: &Toast) -> Self {
        Self {
            id: toast.id().clone(),
            kind: toast.kind(),
            theme: Theme::from(toast.kind()),
            message: toast.message().to_string(),
            dismissible: toast.dismissible(),
        }
    }

    /// Refreshes the view in place. Returns `true` if anything visible changed.
    fn refresh(&mut self, toast: &Toast) -> bool {
        let next = Self::from_toast(toast);
        if *self == next {
            false
        } else {
            *self = next;
            true
        }
    }

    /// Plain-text rendering, e.g. `[danger] Upload failed (x)`.
    #[must_use]
    pub fn line(&self) -> String {
        if self.dismissible {
            format!("[{}] {} (x)", self.theme, self.message)
        } else {
            format!("[{}] {}", self.theme, self.message)
        }
    }
}

/// Outcome of reconciling the surface with one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderPass {
    pub added: Vec<ToastId>,
    pub updated: Vec<ToastId>,
    pub removed: Vec<ToastId>,
}

impl RenderPass {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// Called after each applied snapshot with the pass and the new views.
pub type RenderHook = Arc<dyn Fn(&RenderPass, &[ToastView]) + Send + Sync>;

#[derive(Default)]
struct Surface {
    revision: Option<u64>,
    views: Vec<ToastView>,
    last_pass: RenderPass,
}

impl Surface {
    /// Keyed reconciliation against `snapshot`, newest first.
    ///
    /// Returns `None` when the snapshot is older than the one already shown.
    fn apply(&mut self, snapshot: &Snapshot) -> Option<RenderPass> {
        if self
            .revision
            .is_some_and(|applied| snapshot.revision() <= applied)
        {
            return None;
        }
        self.revision = Some(snapshot.revision());

        let next_ids: HashSet<&ToastId> = snapshot.iter().map(Toast::id).collect();
        let mut pass = RenderPass {
            removed: self
                .views
                .iter()
                .filter(|view| !next_ids.contains(&view.id))
                .map(|view| view.id.clone())
                .collect(),
            ..RenderPass::default()
        };

        let mut existing: HashMap<ToastId, ToastView> = self
            .views
            .drain(..)
            .map(|view| (view.id.clone(), view))
            .collect();

        for toast in snapshot.iter() {
            match existing.remove(toast.id()) {
                Some(mut view) => {
                    if view.refresh(toast) {
                        pass.updated.push(view.id.clone());
                    }
                    self.views.push(view);
                }
                None => {
                    pass.added.push(toast.id().clone());
                    self.views.push(ToastView::from_toast(toast));
                }
            }
        }

        self.last_pass = pass.clone();
        Some(pass)
    }
}

/// Registry observer that maintains renderable toast views.
pub struct Toaster {
    registry: ToastRegistry,
    surface: Arc<Mutex<Surface>>,
    subscription: Option<SubscriptionId>,
}

impl fmt::Debug for Toaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toaster")
            .field("attached", &self.subscription.is_some())
            .field("views", &self.surface.lock().views.len())
            .finish_non_exhaustive()
    }
}

impl Toaster {
    /// Attaches to `registry` and renders its current contents.
    #[must_use]
    pub fn attach(registry: &ToastRegistry) -> Self {
        Self::attach_inner(registry, None)
    }

    /// Like [`Toaster::attach`], also calling `hook` after every applied pass.
    #[must_use]
    pub fn attach_with<F>(registry: &ToastRegistry, hook: F) -> Self
    where
        F: Fn(&RenderPass, &[ToastView]) + Send + Sync + 'static,
    {
        let hook: RenderHook = Arc::new(hook);
        Self::attach_inner(registry, Some(hook))
    }

    fn attach_inner(registry: &ToastRegistry, hook: Option<RenderHook>) -> Self {
        let surface = Arc::new(Mutex::new(Surface::default()));

        let receiver = {
            let surface = Arc::clone(&surface);
            let hook = hook.clone();
            move |snapshot: &Snapshot| render(&surface, hook.as_ref(), snapshot)
        };
        // Subscribe before reading the current state so no change slips between.
        let subscription = registry.subscribe(receiver);
        let initial = registry.snapshot();
        render(&surface, hook.as_ref(), &initial);

        Self {
            registry: registry.clone(),
            surface,
            subscription: Some(subscription),
        }
    }

    /// Stops receiving snapshots. The last rendered views stay readable.
    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.registry.unsubscribe(subscription);
        }
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Current views, newest first.
    #[must_use]
    pub fn views(&self) -> Vec<ToastView> {
        self.surface.lock().views.clone()
    }

    #[must_use]
    pub fn last_pass(&self) -> RenderPass {
        self.surface.lock().last_pass.clone()
    }

    /// Revision of the last applied snapshot.
    #[must_use]
    pub fn revision(&self) -> Option<u64> {
        self.surface.lock().revision
    }

    #[must_use]
    pub fn render_lines(&self) -> Vec<String> {
        self.surface.lock().views.iter().map(ToastView::line).collect()
    }

    /// Handles a click on the dismiss control of `id`.
    ///
    /// Only dismissible toasts react; returns whether a dismissal was sent.
    pub fn click(&self, id: impl AsRef<str>) -> bool {
        let id = id.as_ref();
        let dismissible = self
            .surface
            .lock()
            .views
            .iter()
            .find(|view| view.id.as_str() == id)
            .is_some_and(|view| view.dismissible);
        if dismissible {
            self.registry.dismiss(id);
        }
        dismissible
    }
}

impl Drop for Toaster {
    fn drop(&mut self) {
        self.detach();
    }
}

fn render(surface: &Mutex<Surface>, hook: Option<&RenderHook>, snapshot: &Snapshot) {
    let rendered = {
        let mut surface = surface.lock();
        surface
            .apply(snapshot)
            .map(|pass| (pass, surface.views.clone()))
    };
    // Hook runs unlocked so it may click through to the registry.
    if let (Some(hook), Some((pass, views))) = (hook, rendered) {
        hook(&pass, &views);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::{RegistrySettings, ShowOptions, ToastPatch};

    fn registry() -> ToastRegistry {
        ToastRegistry::new(RegistrySettings::default()).expect("inside a runtime")
    }

    #[test]
    fn theme_mapping_matches_kinds() {
        assert_eq!(Theme::from(ToastKind::Danger), Theme::Danger);
        assert_eq!(Theme::from(ToastKind::Warning), Theme::Warning);
        assert_eq!(Theme::from(ToastKind::Success), Theme::Success);
        assert_eq!(Theme::from(ToastKind::Info), Theme::Info);
        assert_eq!(Theme::from(ToastKind::Loading), Theme::Secondary);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn attach_renders_existing_toasts() {
        let registry = registry();
        registry.info("A", ShowOptions::new().id("a"));
        registry.danger("B", ShowOptions::new().id("b"));

        let toaster = Toaster::attach(&registry);

        assert_eq!(
            toaster.render_lines(),
            vec!["[danger] B (x)".to_string(), "[info] A (x)".to_string()]
        );
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn attach_after_shutdown_shows_nothing() {
        let registry = registry();
        registry.info("ghost", ShowOptions::new().id("g"));
        registry.shutdown();

        let toaster = Toaster::attach(&registry);

        assert!(toaster.views().is_empty());
        assert!(toaster.render_lines().is_empty());
        assert!(!toaster.click("g"));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn reconciliation_reports_added_updated_removed() {
        let registry = registry();
        let toaster = Toaster::attach(&registry);
        registry.info("A", ShowOptions::new().id("a"));
        assert_eq!(toaster.last_pass().added, vec![ToastId::from("a")]);

        registry.update("a", ToastPatch::new().message("A2"));
        assert_eq!(toaster.last_pass().updated, vec![ToastId::from("a")]);

        registry.dismiss("a");
        let pass = toaster.last_pass();
        assert_eq!(pass.removed, vec![ToastId::from("a")]);
        assert!(toaster.views().is_empty());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn click_respects_dismissible() {
        let registry = registry();
        let toaster = Toaster::attach(&registry);
        registry.info("pinned", ShowOptions::new().id("pinned").dismissible(false));
        registry.info("closable", ShowOptions::new().id("closable"));

        assert!(!toaster.click("pinned"));
        assert!(toaster.click("closable"));
        assert!(!toaster.click("unknown"));

        let ids: Vec<_> = toaster.views().into_iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![ToastId::from("pinned")]);
        assert_eq!(toaster.render_lines(), vec!["[info] pinned".to_string()]);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn detached_toaster_stops_updating() {
        let registry = registry();
        let mut toaster = Toaster::attach(&registry);
        registry.info("A", ShowOptions::new());
        toaster.detach();
        registry.info("B", ShowOptions::new());

        assert!(!toaster.is_attached());
        assert_eq!(toaster.views().len(), 1);
        assert_eq!(registry.subscriber_count(), 0);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn dropping_toaster_unsubscribes() {
        let registry = registry();
        {
            let _toaster = Toaster::attach(&registry);
            assert_eq!(registry.subscriber_count(), 1);
        }
        assert_eq!(registry.subscriber_count(), 0);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn hook_may_click_through() {
        let registry = registry();
        let slot: Arc<Mutex<Option<Arc<Toaster>>>> = Arc::new(Mutex::new(None));
        let hook_slot = Arc::clone(&slot);
        let toaster = Arc::new(Toaster::attach_with(&registry, move |pass, _| {
            let toaster = hook_slot.lock().clone();
            if let Some(toaster) = toaster {
                for id in &pass.added {
                    toaster.click(id);
                }
            }
        }));
        *slot.lock() = Some(Arc::clone(&toaster));

        registry.info("gone at once", ShowOptions::new());
        assert!(registry.is_empty());
        assert!(toaster.views().is_empty());
        slot.lock().take();
    }

    #[test]
    fn stale_snapshots_are_ignored() {
        let mut surface = Surface::default();
        let toast = Toast::new(
            ToastId::from("a"),
            ToastKind::Info,
            "A".to_string(),
            chrono::Utc::now(),
            None,
            true,
        );
        assert!(surface.apply(&Snapshot::new(2, vec![toast])).is_some());
        assert!(surface.apply(&Snapshot::new(1, Vec::new())).is_none());
        assert_eq!(surface.views.len(), 1);
    }
}
