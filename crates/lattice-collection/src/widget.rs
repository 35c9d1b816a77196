//! The protocol between the adapter and a host collection widget.
//!
//! The host widget (a native grid/collection view) owns cell recycling, scroll
//! physics, and compositing. It consults a delegate for everything data
//! related. The delegate's responsibilities are split into four capabilities:
//!
//! - [`StructureSource`]: how many sections and items there are
//! - [`ContentSource`]: what to show in a cell or supplementary slot
//! - [`SizeSource`]: how large supplementary views and items are
//! - [`SelectionSink`]: where selection events go
//!
//! [`CollectionDelegate`] bundles all four and is implemented automatically
//! for any type that provides them.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────┐  counts / content / sizes  ┌──────────────┐
//! │ Host widget  │───────────────────────────>│ Coordinator  │
//! │ (W: Collec-  │<───────────────────────────│ (delegate)   │
//! │  tionWidget) │       populated slots      └──────────────┘
//! └──────────────┘                                   │
//!        │ taps                                      │ reads
//!        └──────────────> did_select ──> handler     v
//!                                              State<Vec<T>>
//! ```
//!
//! # Ordering
//!
//! Within one refresh pass the widget queries the counts that bound a position
//! before it asks for that position's content, and it only asks for positions
//! within the bounds the delegate reported.

use std::sync::Arc;

use crate::diff::ChangeSet;
use crate::error::HostError;
use crate::geometry::Size;
use crate::layout::LayoutConfiguration;
use crate::position::{Position, ReuseKind, SupplementaryKind};
use crate::slot::ReusableSlot;

/// Reports the structure of the collection.
pub trait StructureSource: Send + Sync {
    /// Returns the number of sections.
    fn section_count(&self) -> usize;

    /// Returns the number of items in a section.
    fn item_count(&self, section: usize) -> usize;
}

/// Populates reusable slots with content.
pub trait ContentSource<R>: Send + Sync {
    /// Fills a cell slot with the content for `position`.
    ///
    /// The slot is cleared first, whatever it held before.
    fn populate_cell(&self, position: Position, slot: &mut dyn ReusableSlot<R>);

    /// Fills a header or footer slot for `section`.
    ///
    /// The slot is cleared first. Returns `false` if no provider exists for
    /// the kind, in which case the slot is left empty.
    fn populate_supplementary(
        &self,
        kind: SupplementaryKind,
        section: usize,
        slot: &mut dyn ReusableSlot<R>,
    ) -> bool;
}

/// Reports sizes the layout engine needs per element.
pub trait SizeSource: Send + Sync {
    /// Returns the extent of a header or footer.
    fn supplementary_size(&self, kind: SupplementaryKind, section: usize) -> Size;

    /// Returns the extent of an item.
    fn item_size(&self, position: Position) -> Size;
}

/// Receives selection events from the widget.
pub trait SelectionSink: Send + Sync {
    /// Called once per discrete user selection of `position`.
    fn did_select(&self, position: Position);
}

/// The full capability set a widget delegate provides.
pub trait CollectionDelegate<R>: StructureSource + ContentSource<R> + SizeSource + SelectionSink {}

impl<R, D> CollectionDelegate<R> for D where
    D: StructureSource + ContentSource<R> + SizeSource + SelectionSink
{
}

/// The imperative, virtualized widget supplied by the host toolkit.
///
/// # Implementation Requirements
///
/// - [`create`](CollectionWidget::create) constructs the native widget
/// - [`register_reuse`](CollectionWidget::register_reuse) prepares a reuse pool
/// - [`set_delegate`](CollectionWidget::set_delegate) installs the delegate
/// - [`apply_layout`](CollectionWidget::apply_layout) configures the layout engine
/// - [`reload_data`](CollectionWidget::reload_data) re-queries everything
///
/// Hosts that can animate fine-grained changes override
/// [`apply_changes`](CollectionWidget::apply_changes).
pub trait CollectionWidget<R> {
    /// Constructs the native widget.
    fn create() -> Result<Self, HostError>
    where
        Self: Sized;

    /// Registers a reuse pool for the given kind.
    fn register_reuse(&mut self, kind: ReuseKind);

    /// Installs the structure/content/size/selection authority.
    fn set_delegate(&mut self, delegate: Arc<dyn CollectionDelegate<R>>);

    /// Applies a complete layout configuration in one pass.
    fn apply_layout(&mut self, layout: &LayoutConfiguration) -> Result<(), HostError>;

    /// Re-queries structure and re-pulls content for visible positions.
    fn reload_data(&mut self);

    /// Applies a set of structural and content changes.
    ///
    /// The default performs a full reload, which is always correct.
    fn apply_changes(&mut self, changes: &ChangeSet) {
        if !changes.is_empty() {
            self.reload_data();
        }
    }
}
