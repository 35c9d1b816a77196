//! The mount/update/unmount contract between a declarative component and the
//! imperative widget it wraps.
//!
//! A reactive framework re-creates component *values* freely, but the widget
//! and its coordinator must survive across those re-renders. [`Representable`]
//! is the contract a component implements; [`RepresentableHost`] is the
//! driver that owns the long-lived pieces and calls into the contract at the
//! right time.
//!
//! # Lifecycle
//!
//! ```text
//! render(v0) ──> make_coordinator ──> make_widget          (mount)
//! render(v1) ──> update_widget                             (update)
//! State change ──> dirty ──> flush ──> update_widget       (update)
//! unmount / drop ──> dismantle_widget                      (teardown)
//! ```
//!
//! # Thread Safety
//!
//! A host is bound to the thread it was created on. Mount and update entry
//! points check this in debug builds.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use lattice_collection_core::logging::targets;
use lattice_collection_core::{ConnectionGuard, State, ThreadAffinity};

use crate::error::{CollectionError, Result};

/// A declarative component backed by an imperative widget.
pub trait Representable {
    /// The long-lived object the widget delegates to.
    type Coordinator;

    /// The imperative widget.
    type Widget;

    /// Creates the coordinator. Called once, before the widget is made.
    fn make_coordinator(&self) -> Self::Coordinator;

    /// Creates and fully configures the widget.
    fn make_widget(&self, coordinator: &Self::Coordinator) -> Result<Self::Widget>;

    /// Brings an existing widget in line with this (newer) component value.
    fn update_widget(
        &self,
        widget: &mut Self::Widget,
        coordinator: &Self::Coordinator,
    ) -> Result<()>;

    /// Releases widget resources before the widget is dropped.
    fn dismantle_widget(_widget: &mut Self::Widget, _coordinator: &Self::Coordinator) {}
}

struct Mounted<V: Representable> {
    coordinator: V::Coordinator,
    widget: V::Widget,
}

/// Drives one component instance through its lifecycle.
pub struct RepresentableHost<V: Representable> {
    view: Option<V>,
    mounted: Option<Mounted<V>>,
    dirty: Arc<AtomicBool>,
    subscriptions: Vec<ConnectionGuard>,
    affinity: ThreadAffinity,
    updates: usize,
}

impl<V: Representable> RepresentableHost<V> {
    /// Creates an empty host bound to the current thread.
    pub fn new() -> Self {
        Self {
            view: None,
            mounted: None,
            dirty: Arc::new(AtomicBool::new(false)),
            subscriptions: Vec::new(),
            affinity: ThreadAffinity::current(),
            updates: 0,
        }
    }

    /// Renders a component value.
    ///
    /// The first call mounts. Later calls keep the widget and coordinator and
    /// run [`Representable::update_widget`] with the new value.
    pub fn render(&mut self, view: V) -> Result<()> {
        self.affinity
            .debug_assert_same_thread_with_msg("collection components must render on the UI thread");

        let view = self.view.insert(view);
        match &mut self.mounted {
            Some(mounted) => {
                view.update_widget(&mut mounted.widget, &mounted.coordinator)?;
                self.updates += 1;
                tracing::debug!(target: targets::LIFECYCLE, updates = self.updates, "updated");
            }
            None => {
                let coordinator = view.make_coordinator();
                let widget = view.make_widget(&coordinator)?;
                self.mounted = Some(Mounted {
                    coordinator,
                    widget,
                });
                tracing::debug!(target: targets::LIFECYCLE, "mounted");
            }
        }
        self.dirty.store(false, Ordering::Release);
        Ok(())
    }

    /// Re-runs the update with the current component value.
    pub fn update(&mut self) -> Result<()> {
        self.affinity
            .debug_assert_same_thread_with_msg("collection components must update on the UI thread");

        let (Some(view), Some(mounted)) = (&self.view, &mut self.mounted) else {
            return Err(CollectionError::NotMounted);
        };
        view.update_widget(&mut mounted.widget, &mounted.coordinator)?;
        self.updates += 1;
        self.dirty.store(false, Ordering::Release);
        tracing::debug!(target: targets::LIFECYCLE, updates = self.updates, "updated");
        Ok(())
    }

    /// Marks the host dirty whenever `state` changes.
    pub fn invalidate_on<U>(&mut self, state: &State<U>)
    where
        U: Send + Sync + 'static,
    {
        let dirty = self.dirty.clone();
        self.subscriptions.push(state.on_change_scoped(move |&revision| {
            tracing::trace!(target: targets::LIFECYCLE, revision, "invalidated");
            dirty.store(true, Ordering::Release);
        }));
    }

    /// Updates the widget if a watched state changed since the last render.
    ///
    /// Returns whether an update ran.
    pub fn flush(&mut self) -> Result<bool> {
        if self.mounted.is_none() {
            return Err(CollectionError::NotMounted);
        }
        if !self.dirty.load(Ordering::Acquire) {
            return Ok(false);
        }
        self.update()?;
        Ok(true)
    }

    /// Tears the widget and coordinator down together.
    ///
    /// Returns `false` if nothing was mounted.
    pub fn unmount(&mut self) -> bool {
        self.subscriptions.clear();
        match self.mounted.take() {
            Some(mut mounted) => {
                V::dismantle_widget(&mut mounted.widget, &mounted.coordinator);
                tracing::debug!(target: targets::LIFECYCLE, "unmounted");
                true
            }
            None => false,
        }
    }

    /// Returns `true` between mount and unmount.
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Returns `true` if a watched state changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Number of updates run since mount.
    pub fn update_count(&self) -> usize {
        self.updates
    }

    /// The current component value.
    pub fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }

    /// The mounted widget.
    pub fn widget(&self) -> Option<&V::Widget> {
        self.mounted.as_ref().map(|mounted| &mounted.widget)
    }

    /// The mounted widget, mutably. Used by hosts to deliver input.
    pub fn widget_mut(&mut self) -> Option<&mut V::Widget> {
        self.mounted.as_mut().map(|mounted| &mut mounted.widget)
    }

    /// The mounted coordinator.
    pub fn coordinator(&self) -> Option<&V::Coordinator> {
        self.mounted.as_ref().map(|mounted| &mounted.coordinator)
    }
}

impl<V: Representable> Default for RepresentableHost<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Representable> Drop for RepresentableHost<V> {
    fn drop(&mut self) {
        self.unmount();
    }
}
