//! An in-memory collection widget.
//!
//! [`HeadlessCollection`] implements [`CollectionWidget`] without any native
//! toolkit. It behaves the way a virtualized grid does, which makes it a
//! faithful stand-in for tests and for hosts that render elsewhere:
//!
//! - slots are recycled through a reuse pool per [`ReuseKind`] and come back
//!   still holding whatever they showed last;
//! - only positions inside the viewport are populated, using a flow layout
//!   along the configured scroll axis;
//! - structure is always queried before content.
//!
//! Every delegate interaction is recorded as a [`HostEvent`] and counted in
//! [`HeadlessStats`].

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use lattice_collection_core::PerfSpan;
use lattice_collection_core::logging::{span_names, targets};

use crate::diff::ChangeSet;
use crate::error::HostError;
use crate::geometry::Size;
use crate::layout::{LayoutConfiguration, ScrollAxis};
use crate::position::{Position, ReuseKind, SupplementaryKind};
use crate::slot::{HostedContent, ReusableSlot};
use crate::widget::{CollectionDelegate, CollectionWidget};

/// The viewport a headless widget starts with.
pub const DEFAULT_VIEWPORT: Size = Size::new(400.0, 800.0);

// ============================================================================
// RecordingSlot
// ============================================================================

/// A reusable slot that remembers everything installed into it.
///
/// A correctly cleared slot holds at most one piece of content. Seeing more
/// than one means content was stacked.
pub struct RecordingSlot<R> {
    id: usize,
    kind: ReuseKind,
    installed: Vec<HostedContent<R>>,
    install_count: usize,
}

impl<R> RecordingSlot<R> {
    fn new(id: usize, kind: ReuseKind) -> Self {
        Self {
            id,
            kind,
            installed: Vec::new(),
            install_count: 0,
        }
    }

    /// A stable identity, used to observe reuse.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The reuse pool this slot belongs to.
    pub fn kind(&self) -> ReuseKind {
        self.kind
    }

    /// Everything currently installed.
    pub fn installed(&self) -> &[HostedContent<R>] {
        &self.installed
    }

    /// The most recently installed content.
    pub fn content(&self) -> Option<&R> {
        self.installed.last().map(HostedContent::content)
    }

    /// How many times content was installed over the slot's lifetime.
    pub fn install_count(&self) -> usize {
        self.install_count
    }
}

impl<R> ReusableSlot<R> for RecordingSlot<R> {
    fn clear(&mut self) {
        self.installed.clear();
    }

    fn install(&mut self, content: HostedContent<R>) {
        self.installed.push(content);
        self.install_count += 1;
    }

    fn is_empty(&self) -> bool {
        self.installed.is_empty()
    }
}

impl<R: fmt::Debug> fmt::Debug for RecordingSlot<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingSlot")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("installed", &self.installed)
            .finish()
    }
}

// ============================================================================
// Events and statistics
// ============================================================================

/// A delegate interaction performed by the headless widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Section and item counts were queried.
    Structure { sections: usize },
    /// A cell slot was populated.
    Cell(Position),
    /// A header or footer slot was populated.
    Supplementary(SupplementaryKind, usize),
    /// A selection was delivered.
    Select(Position),
}

/// Counters describing what the widget was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeadlessStats {
    /// Full reloads performed.
    pub reloads: usize,
    /// Non-empty change sets applied.
    pub change_sets: usize,
    /// Layout configurations applied.
    pub layout_applications: usize,
    /// Delegates installed.
    pub delegates_installed: usize,
    /// Slots handed out from a pool instead of being created.
    pub reused_slots: usize,
    /// Slots created because the pool was empty.
    pub created_slots: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Element {
    Header(usize),
    Cell(Position),
    Footer(usize),
}

impl Element {
    fn reuse_kind(self) -> ReuseKind {
        match self {
            Element::Header(_) => ReuseKind::Supplementary(SupplementaryKind::Header),
            Element::Cell(_) => ReuseKind::Cell,
            Element::Footer(_) => ReuseKind::Supplementary(SupplementaryKind::Footer),
        }
    }
}

// ============================================================================
// HeadlessCollection
// ============================================================================

/// An in-memory, virtualized collection widget.
pub struct HeadlessCollection<R> {
    delegate: Option<Arc<dyn CollectionDelegate<R>>>,
    layout: Option<LayoutConfiguration>,
    registered: Vec<ReuseKind>,
    viewport: Size,
    offset: f32,
    reported: Vec<usize>,
    pools: HashMap<ReuseKind, Vec<RecordingSlot<R>>>,
    visible: BTreeMap<Element, RecordingSlot<R>>,
    next_slot_id: usize,
    events: Vec<HostEvent>,
    stats: HeadlessStats,
}

impl<R> HeadlessCollection<R> {
    /// Creates a widget with the given viewport.
    pub fn new(viewport: Size) -> Self {
        Self {
            delegate: None,
            layout: None,
            registered: Vec::new(),
            viewport,
            offset: 0.0,
            reported: Vec::new(),
            pools: HashMap::new(),
            visible: BTreeMap::new(),
            next_slot_id: 0,
            events: Vec::new(),
            stats: HeadlessStats::default(),
        }
    }

    /// The installed delegate.
    pub fn delegate(&self) -> Option<&Arc<dyn CollectionDelegate<R>>> {
        self.delegate.as_ref()
    }

    /// The last applied layout.
    pub fn layout(&self) -> Option<&LayoutConfiguration> {
        self.layout.as_ref()
    }

    /// Reuse kinds registered so far, in registration order.
    pub fn registered_kinds(&self) -> &[ReuseKind] {
        &self.registered
    }

    /// The viewport extent.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// The scroll offset along the scroll axis.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Item counts per section as last reported by the delegate.
    pub fn reported_counts(&self) -> &[usize] {
        &self.reported
    }

    /// Positions of the cells currently on screen, in order.
    pub fn visible_positions(&self) -> Vec<Position> {
        self.visible
            .keys()
            .filter_map(|element| match element {
                Element::Cell(position) => Some(*position),
                _ => None,
            })
            .collect()
    }

    /// The on-screen slot for a cell.
    pub fn cell(&self, position: Position) -> Option<&RecordingSlot<R>> {
        self.visible.get(&Element::Cell(position))
    }

    /// The on-screen slot for a header or footer.
    pub fn supplementary(
        &self,
        kind: SupplementaryKind,
        section: usize,
    ) -> Option<&RecordingSlot<R>> {
        let element = match kind {
            SupplementaryKind::Header => Element::Header(section),
            SupplementaryKind::Footer => Element::Footer(section),
        };
        self.visible.get(&element)
    }

    /// Slots currently waiting in a reuse pool.
    pub fn pooled(&self, kind: ReuseKind) -> usize {
        self.pools.get(&kind).map_or(0, Vec::len)
    }

    /// Every delegate interaction so far.
    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Forgets recorded events.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Counters.
    pub fn stats(&self) -> HeadlessStats {
        self.stats
    }

    /// Resizes the viewport and refreshes what is on screen.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.refresh(|_| false);
    }

    /// Scrolls to `offset` along the scroll axis and refreshes what is on
    /// screen.
    pub fn scroll_to(&mut self, offset: f32) {
        self.offset = offset.max(0.0);
        self.refresh(|_| false);
    }

    /// Delivers a discrete selection of `position` to the delegate.
    ///
    /// Returns `false` without notifying anyone if the position is outside
    /// the reported structure.
    pub fn tap(&mut self, position: Position) -> bool {
        let in_bounds = self
            .reported
            .get(position.section())
            .is_some_and(|&count| position.item() < count);
        let Some(delegate) = self.delegate.clone() else {
            return false;
        };
        if !in_bounds {
            tracing::debug!(target: targets::HEADLESS, %position, "tap outside structure");
            return false;
        }
        self.events.push(HostEvent::Select(position));
        delegate.did_select(position);
        true
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn query_structure(&mut self, delegate: &dyn CollectionDelegate<R>) {
        let sections = delegate.section_count();
        self.reported = (0..sections).map(|section| delegate.item_count(section)).collect();
        self.events.push(HostEvent::Structure { sections });
    }

    /// Brings the on-screen slots in line with the reported structure.
    ///
    /// Slots that scrolled out go back to their pool. Newly visible elements
    /// get a dequeued slot. Cells for which `reload` returns `true` are
    /// populated again in place. Visible supplementary views are always
    /// repopulated.
    fn refresh(&mut self, reload: impl Fn(Position) -> bool) {
        let Some(delegate) = self.delegate.clone() else {
            return;
        };
        let Some(layout) = self.layout.clone() else {
            return;
        };

        let wanted = self.visible_elements(delegate.as_ref(), &layout);
        let wanted_set: HashSet<Element> = wanted.iter().copied().collect();

        let gone: Vec<Element> = self
            .visible
            .keys()
            .filter(|element| !wanted_set.contains(*element))
            .copied()
            .collect();
        for element in gone {
            if let Some(slot) = self.visible.remove(&element) {
                self.enqueue(slot);
            }
        }

        for element in wanted {
            let mut slot = match self.visible.remove(&element) {
                Some(slot) => {
                    if let Element::Cell(position) = element
                        && !reload(position)
                    {
                        self.visible.insert(element, slot);
                        continue;
                    }
                    slot
                }
                None => self.dequeue(element.reuse_kind()),
            };

            match element {
                Element::Cell(position) => {
                    delegate.populate_cell(position, &mut slot);
                    self.events.push(HostEvent::Cell(position));
                }
                Element::Header(section) => {
                    delegate.populate_supplementary(SupplementaryKind::Header, section, &mut slot);
                    self.events
                        .push(HostEvent::Supplementary(SupplementaryKind::Header, section));
                }
                Element::Footer(section) => {
                    delegate.populate_supplementary(SupplementaryKind::Footer, section, &mut slot);
                    self.events
                        .push(HostEvent::Supplementary(SupplementaryKind::Footer, section));
                }
            }
            self.visible.insert(element, slot);
        }
    }

    fn dequeue(&mut self, kind: ReuseKind) -> RecordingSlot<R> {
        if !self.registered.contains(&kind) {
            tracing::warn!(target: targets::HEADLESS, %kind, "dequeue from unregistered reuse kind");
        }
        match self.pools.get_mut(&kind).and_then(Vec::pop) {
            Some(slot) => {
                self.stats.reused_slots += 1;
                slot
            }
            None => {
                self.stats.created_slots += 1;
                let id = self.next_slot_id;
                self.next_slot_id += 1;
                RecordingSlot::new(id, kind)
            }
        }
    }

    fn enqueue(&mut self, slot: RecordingSlot<R>) {
        self.pools.entry(slot.kind()).or_default().push(slot);
    }

    fn recycle_all(&mut self) {
        let visible = std::mem::take(&mut self.visible);
        for slot in visible.into_values() {
            self.enqueue(slot);
        }
    }

    /// Computes the elements intersecting the viewport with a flow layout.
    ///
    /// Sections are stacked along the scroll axis: header, inset, lines of
    /// items, inset, footer. Extents come from the delegate, spacing and
    /// insets from the layout. Negative extents are treated as zero.
    fn visible_elements(
        &self,
        delegate: &dyn CollectionDelegate<R>,
        layout: &LayoutConfiguration,
    ) -> Vec<Element> {
        let axis = layout.scroll_axis();
        let line_spacing = layout.minimum_line_spacing().max(0.0);
        let interitem = layout.minimum_interitem_spacing().max(0.0);
        let inset = layout.section_inset();
        let (inset_before, inset_after, inset_cross) = match axis {
            ScrollAxis::Vertical => (inset.top, inset.bottom, inset.horizontal()),
            ScrollAxis::Horizontal => (inset.left, inset.right, inset.vertical()),
        };

        let start = self.offset;
        let end = self.offset + self.viewport.main(axis).max(0.0);
        let intersects = |from: f32, extent: f32| from < end && from + extent > start;
        let available = (self.viewport.cross(axis) - inset_cross).max(0.0);

        let mut elements = Vec::new();
        let mut cursor = 0.0f32;
        for (section, &count) in self.reported.iter().enumerate() {
            if cursor >= end {
                break;
            }

            let header = delegate
                .supplementary_size(SupplementaryKind::Header, section)
                .main(axis)
                .max(0.0);
            if header > 0.0 && intersects(cursor, header) {
                elements.push(Element::Header(section));
            }
            cursor += header + inset_before.max(0.0);

            if count > 0 {
                let item = delegate.item_size(Position::new(section, 0));
                let item_main = item.main(axis).max(0.0);
                let stride = item.cross(axis).max(0.0) + interitem;
                let per_line = if stride > 0.0 {
                    (((available + interitem) / stride).floor() as usize).clamp(1, count)
                } else {
                    count
                };
                let lines = count.div_ceil(per_line);

                for line in 0..lines {
                    let line_start = cursor + line as f32 * (item_main + line_spacing);
                    if line_start >= end {
                        break;
                    }
                    if item_main > 0.0 && !intersects(line_start, item_main) {
                        continue;
                    }
                    let first = line * per_line;
                    let last = (first + per_line).min(count);
                    elements.extend((first..last).map(|i| Element::Cell(Position::new(section, i))));
                }
                cursor += lines as f32 * item_main + (lines - 1) as f32 * line_spacing;
            }
            cursor += inset_after.max(0.0);

            let footer = delegate
                .supplementary_size(SupplementaryKind::Footer, section)
                .main(axis)
                .max(0.0);
            if footer > 0.0 && intersects(cursor, footer) {
                elements.push(Element::Footer(section));
            }
            cursor += footer;
        }
        elements
    }
}

impl<R> Default for HeadlessCollection<R> {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT)
    }
}

impl<R> CollectionWidget<R> for HeadlessCollection<R> {
    fn create() -> Result<Self, HostError> {
        Ok(Self::default())
    }

    fn register_reuse(&mut self, kind: ReuseKind) {
        if !self.registered.contains(&kind) {
            tracing::trace!(target: targets::HEADLESS, %kind, "registered reuse kind");
            self.registered.push(kind);
            self.pools.entry(kind).or_default();
        }
    }

    fn set_delegate(&mut self, delegate: Arc<dyn CollectionDelegate<R>>) {
        self.stats.delegates_installed += 1;
        self.delegate = Some(delegate);
    }

    fn apply_layout(&mut self, layout: &LayoutConfiguration) -> Result<(), HostError> {
        self.stats.layout_applications += 1;
        tracing::debug!(target: targets::HEADLESS, ?layout, "applied layout");
        self.layout = Some(layout.clone());
        if let Some(delegate) = self.delegate.clone() {
            self.query_structure(delegate.as_ref());
            self.refresh(|_| false);
        }
        Ok(())
    }

    fn reload_data(&mut self) {
        let _span = PerfSpan::new(span_names::RELOAD);
        let Some(delegate) = self.delegate.clone() else {
            tracing::warn!(target: targets::HEADLESS, "reload without a delegate");
            return;
        };
        self.stats.reloads += 1;
        self.query_structure(delegate.as_ref());
        self.recycle_all();
        self.refresh(|_| true);
        tracing::debug!(
            target: targets::HEADLESS,
            sections = self.reported.len(),
            visible = self.visible.len(),
            "reloaded"
        );
    }

    fn apply_changes(&mut self, changes: &ChangeSet) {
        if changes.is_empty() {
            return;
        }
        self.stats.change_sets += 1;
        if changes.is_full_reload() {
            self.reload_data();
            return;
        }
        let Some(delegate) = self.delegate.clone() else {
            return;
        };
        self.query_structure(delegate.as_ref());
        let reloaded: HashSet<Position> = changes.reloaded().into_iter().collect();
        self.refresh(|position| reloaded.contains(&position));
    }
}

impl<R> fmt::Debug for HeadlessCollection<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessCollection")
            .field("viewport", &self.viewport)
            .field("offset", &self.offset)
            .field("reported", &self.reported)
            .field("visible", &self.visible.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
