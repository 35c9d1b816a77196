//! The coordinator: the widget's single source of truth.
//!
//! A [`Coordinator`] is created once per mounted component and installed as
//! the host widget's delegate. The widget consults it synchronously, on its
//! own schedule, for structure, content, sizes, and selection. The coordinator
//! in turn reads the live data snapshot through a [`StateReader`] and invokes
//! the caller's content providers.
//!
//! # Invariants
//!
//! - The data snapshot is only ever read. The coordinator holds no write
//!   handle to it.
//! - Reported item counts never exceed the data length: an items-per-section
//!   override larger than the data is clamped.
//! - Every population path clears the slot before installing, so a reused
//!   slot never shows stale content stacked under new content.
//! - Configuration (layout and providers) is swapped wholesale on update and
//!   never mutated in place.
//!
//! # Concurrency
//!
//! Queries are expected on the UI thread. Each query nevertheless runs inside
//! one re-entrant mutual-exclusion scope, so a host that queries from several
//! threads is serialized. Providers run without the data lock held and may
//! read the binding themselves.

use std::fmt;
use std::sync::Arc;

use lattice_collection_core::logging::targets;
use lattice_collection_core::StateReader;
use parking_lot::{Mutex, ReentrantMutex, RwLock};

use crate::diff::{ChangeSet, StructureSnapshot};
use crate::geometry::Size;
use crate::layout::LayoutConfiguration;
use crate::position::{Position, SupplementaryKind};
use crate::provider::ContentProviders;
use crate::slot::{HostedContent, ReusableSlot};
use crate::widget::{ContentSource, SelectionSink, SizeSource, StructureSource};

/// The layout and providers a coordinator answers queries with.
pub struct CoordinatorConfig<R> {
    layout: LayoutConfiguration,
    providers: ContentProviders<R>,
}

impl<R> CoordinatorConfig<R> {
    /// Creates a configuration.
    pub fn new(layout: LayoutConfiguration, providers: ContentProviders<R>) -> Self {
        Self { layout, providers }
    }

    /// The layout configuration.
    pub fn layout(&self) -> &LayoutConfiguration {
        &self.layout
    }

    /// The content providers.
    pub fn providers(&self) -> &ContentProviders<R> {
        &self.providers
    }
}

struct Published {
    snapshot: StructureSnapshot,
    providers_replaced: bool,
    rebound: bool,
}

/// Answers a collection widget's structure, content, size, and selection
/// queries for one mounted component.
///
/// # Example
///
/// ```
/// use lattice_collection::{ContentProviders, Coordinator, LayoutConfiguration, Position};
/// use lattice_collection_core::State;
///
/// let data = State::new((0..10).collect::<Vec<u32>>());
/// let coordinator = Coordinator::new(
///     data.reader(),
///     LayoutConfiguration::default().with_items_per_section(Some(20)),
///     ContentProviders::new(|p: Position| p.item(), |_| {}),
/// );
///
/// assert_eq!(coordinator.section_count(), 1);
/// assert_eq!(coordinator.item_count(0), 10);
/// ```
pub struct Coordinator<T, R> {
    data: RwLock<StateReader<Vec<T>>>,
    config: RwLock<Arc<CoordinatorConfig<R>>>,
    published: Mutex<Published>,
    gate: ReentrantMutex<()>,
}

impl<T, R> Coordinator<T, R>
where
    T: Send + Sync + 'static,
    R: 'static,
{
    /// Creates a coordinator bound to a data snapshot and a configuration.
    pub fn new(
        data: StateReader<Vec<T>>,
        layout: LayoutConfiguration,
        providers: ContentProviders<R>,
    ) -> Self {
        let revision = data.revision();
        Self {
            data: RwLock::new(data),
            config: RwLock::new(Arc::new(CoordinatorConfig::new(layout, providers))),
            published: Mutex::new(Published {
                snapshot: StructureSnapshot::new(Vec::new(), revision),
                providers_replaced: false,
                rebound: false,
            }),
            gate: ReentrantMutex::new(()),
        }
    }

    /// The read-only view of the data snapshot currently bound.
    pub fn data(&self) -> StateReader<Vec<T>> {
        self.data.read().clone()
    }

    /// The current configuration.
    pub fn config(&self) -> Arc<CoordinatorConfig<R>> {
        self.config.read().clone()
    }

    /// The current layout configuration.
    pub fn layout(&self) -> LayoutConfiguration {
        self.config.read().layout.clone()
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Returns the section count override, or 1.
    pub fn section_count(&self) -> usize {
        let _gate = self.gate.lock();
        let count = self.config.read().layout.section_count().unwrap_or(1);
        tracing::trace!(target: targets::COORDINATOR, count, "section count");
        count
    }

    /// Returns the number of items in a section.
    ///
    /// Without an items-per-section override this is the full data length.
    /// With one, it is the override clamped to the data length.
    pub fn item_count(&self, section: usize) -> usize {
        let _gate = self.gate.lock();
        let per_section = self.config.read().layout.items_per_section();
        let len = self.data.read().with(|items| items.len());
        let count = per_section.map_or(len, |limit| limit.min(len));
        tracing::trace!(
            target: targets::COORDINATOR,
            section,
            count,
            clamped = per_section.is_some_and(|limit| limit > len),
            "item count"
        );
        count
    }

    /// The structure as it would be reported right now.
    pub fn structure(&self) -> StructureSnapshot {
        let _gate = self.gate.lock();
        let counts = (0..self.section_count())
            .map(|section| self.item_count(section))
            .collect();
        StructureSnapshot::new(counts, self.data.read().revision())
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Populates a cell slot for `position`.
    ///
    /// Clears the slot, invokes the cell provider exactly once, and installs
    /// its output filling the slot's bounds.
    pub fn content(&self, position: Position, slot: &mut dyn ReusableSlot<R>) {
        let _gate = self.gate.lock();
        let config = self.config();
        slot.clear();
        let content = config.providers.cell(position);
        slot.install(HostedContent::filling(content));
        tracing::trace!(target: targets::COORDINATOR, %position, "populated cell");
    }

    /// Populates a header or footer slot for `section`.
    ///
    /// Clears the slot first. Without a provider for `kind` the slot stays
    /// empty and `false` is returned; the widget still reserves the configured
    /// size for it.
    pub fn supplementary_content(
        &self,
        kind: SupplementaryKind,
        section: usize,
        slot: &mut dyn ReusableSlot<R>,
    ) -> bool {
        let _gate = self.gate.lock();
        let config = self.config();
        slot.clear();
        let installed = match config.providers.supplementary(kind, section) {
            Some(content) => {
                slot.install(HostedContent::filling(content));
                true
            }
            None => false,
        };
        tracing::trace!(
            target: targets::COORDINATOR,
            ?kind,
            section,
            installed,
            "populated supplementary view"
        );
        installed
    }

    // =========================================================================
    // Sizes and selection
    // =========================================================================

    /// Returns the configured `(width, height)` for a header or footer.
    ///
    /// Sizes are not customizable per section.
    pub fn supplementary_size(&self, kind: SupplementaryKind, _section: usize) -> Size {
        let _gate = self.gate.lock();
        self.config.read().layout.supplementary_size(kind)
    }

    /// Returns the configured item size.
    pub fn item_size(&self, _position: Position) -> Size {
        let _gate = self.gate.lock();
        self.config.read().layout.item_size()
    }

    /// Forwards a selection event to the selection handler.
    pub fn on_select(&self, position: Position) {
        let _gate = self.gate.lock();
        let config = self.config();
        tracing::debug!(target: targets::COORDINATOR, %position, "item selected");
        config.providers.select(position);
    }

    // =========================================================================
    // Updates
    // =========================================================================

    /// Swaps in the data binding and configuration of a re-rendered
    /// component.
    ///
    /// A different data binding makes the next [`plan_update`] a full
    /// reload, since positions of the old data say nothing about the new.
    ///
    /// [`plan_update`]: Coordinator::plan_update
    pub fn replace_config(
        &self,
        data: StateReader<Vec<T>>,
        layout: LayoutConfiguration,
        providers: ContentProviders<R>,
    ) {
        let _gate = self.gate.lock();
        let mut config = self.config.write();
        let mut published = self.published.lock();
        if !config.providers.same_callbacks(&providers) {
            published.providers_replaced = true;
        }
        let mut bound = self.data.write();
        if !bound.same_source(&data) {
            tracing::debug!(target: targets::COORDINATOR, "data binding replaced");
            published.rebound = true;
            *bound = data;
        }
        *config = Arc::new(CoordinatorConfig::new(layout, providers));
    }

    /// Records the current structure as what the widget has seen.
    pub fn publish(&self) -> StructureSnapshot {
        let snapshot = self.structure();
        let mut published = self.published.lock();
        published.snapshot = snapshot.clone();
        published.providers_replaced = false;
        published.rebound = false;
        snapshot
    }

    /// Computes what changed since the last publish and publishes the
    /// current structure.
    pub fn plan_update(&self) -> ChangeSet {
        let current = self.structure();
        let mut published = self.published.lock();
        let changes = if published.rebound {
            ChangeSet::full()
        } else {
            ChangeSet::between(&published.snapshot, &current, published.providers_replaced)
        };
        tracing::debug!(
            target: targets::COORDINATOR,
            full_reload = changes.is_full_reload(),
            sections = changes.sections().len(),
            revision = current.revision,
            "planned update"
        );
        published.snapshot = current;
        published.providers_replaced = false;
        published.rebound = false;
        changes
    }
}

impl<T, R> StructureSource for Coordinator<T, R>
where
    T: Send + Sync + 'static,
    R: 'static,
{
    fn section_count(&self) -> usize {
        Coordinator::section_count(self)
    }

    fn item_count(&self, section: usize) -> usize {
        Coordinator::item_count(self, section)
    }
}

impl<T, R> ContentSource<R> for Coordinator<T, R>
where
    T: Send + Sync + 'static,
    R: 'static,
{
    fn populate_cell(&self, position: Position, slot: &mut dyn ReusableSlot<R>) {
        self.content(position, slot);
    }

    fn populate_supplementary(
        &self,
        kind: SupplementaryKind,
        section: usize,
        slot: &mut dyn ReusableSlot<R>,
    ) -> bool {
        self.supplementary_content(kind, section, slot)
    }
}

impl<T, R> SizeSource for Coordinator<T, R>
where
    T: Send + Sync + 'static,
    R: 'static,
{
    fn supplementary_size(&self, kind: SupplementaryKind, section: usize) -> Size {
        Coordinator::supplementary_size(self, kind, section)
    }

    fn item_size(&self, position: Position) -> Size {
        Coordinator::item_size(self, position)
    }
}

impl<T, R> SelectionSink for Coordinator<T, R>
where
    T: Send + Sync + 'static,
    R: 'static,
{
    fn did_select(&self, position: Position) {
        self.on_select(position);
    }
}

impl<T, R> fmt::Debug for Coordinator<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.config.read();
        f.debug_struct("Coordinator")
            .field("layout", &config.layout)
            .field("providers", &config.providers)
            .finish_non_exhaustive()
    }
}
