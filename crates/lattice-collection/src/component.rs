//! The declarative collection component.
//!
//! [`CollectionView`] is the value a caller builds to describe a collection:
//! a data binding, content providers, and a layout. Mounting it through a
//! [`RepresentableHost`](crate::lifecycle::RepresentableHost) creates one
//! widget and one coordinator that live until unmount; every later render
//! only updates them.
//!
//! # Example
//!
//! ```
//! use lattice_collection::prelude::*;
//! use lattice_collection_core::State;
//!
//! let items = State::new((0..10).map(|i| format!("item {i}")).collect::<Vec<_>>());
//!
//! let labels = items.reader();
//! let view: CollectionView<String, String, HeadlessCollection<String>> = CollectionView::new(
//!     &items,
//!     move |p: Position| labels.with(|v| v[p.item()].clone()),
//!     |p| println!("selected {p}"),
//! )
//! .item_size(Size::new(120.0, 40.0))
//! .minimum_line_spacing(4.0);
//!
//! let mut host = RepresentableHost::new();
//! host.render(view).unwrap();
//! assert_eq!(host.widget().unwrap().reported_counts(), &[10]);
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use lattice_collection_core::logging::{span_names, targets};
use lattice_collection_core::{collection_debug, collection_trace, collection_warn};
use lattice_collection_core::{PerfSpan, State, StateReader};

use crate::coordinator::Coordinator;
use crate::error::Result;
use crate::geometry::{EdgeInsets, Size};
use crate::layout::{LayoutConfiguration, ScrollAxis};
use crate::lifecycle::Representable;
use crate::position::{Position, ReuseKind};
use crate::provider::ContentProviders;
use crate::widget::{CollectionDelegate, CollectionWidget};

/// A sectioned, scrollable grid or list described declaratively.
///
/// `T` is the element type of the bound data, `R` the renderable type the
/// providers produce, and `W` the host widget that displays it.
///
/// Every builder method returns a new value and leaves the receiver as it
/// was.
pub struct CollectionView<T, R, W> {
    data: StateReader<Vec<T>>,
    layout: LayoutConfiguration,
    providers: ContentProviders<R>,
    _widget: PhantomData<fn() -> W>,
}

impl<T, R, W> CollectionView<T, R, W>
where
    T: Send + Sync + 'static,
    R: 'static,
    W: CollectionWidget<R>,
{
    /// Creates a component bound to `data` with a cell provider and a
    /// selection handler, using the default layout.
    pub fn new<C, S>(data: &State<Vec<T>>, cell: C, on_select: S) -> Self
    where
        C: Fn(Position) -> R + Send + Sync + 'static,
        S: Fn(Position) + Send + Sync + 'static,
    {
        Self {
            data: data.reader(),
            layout: LayoutConfiguration::default(),
            providers: ContentProviders::new(cell, on_select),
            _widget: PhantomData,
        }
    }

    /// Returns a component that also shows section headers.
    #[must_use]
    pub fn with_header<H>(&self, header: H) -> Self
    where
        H: Fn(usize) -> R + Send + Sync + 'static,
    {
        self.with_providers(self.providers.with_header(header))
    }

    /// Returns a component that also shows section footers.
    #[must_use]
    pub fn with_footer<F>(&self, footer: F) -> Self
    where
        F: Fn(usize) -> R + Send + Sync + 'static,
    {
        self.with_providers(self.providers.with_footer(footer))
    }

    /// Returns a component with a whole layout configuration replaced.
    #[must_use]
    pub fn with_layout(&self, layout: LayoutConfiguration) -> Self {
        Self {
            layout,
            ..self.clone()
        }
    }

    fn with_providers(&self, providers: ContentProviders<R>) -> Self {
        Self {
            providers,
            ..self.clone()
        }
    }

    /// Sets the scroll axis.
    #[must_use]
    pub fn scroll_axis(&self, axis: ScrollAxis) -> Self {
        self.with_layout(self.layout.with_scroll_axis(axis))
    }

    /// Sets the item size.
    #[must_use]
    pub fn item_size(&self, size: Size) -> Self {
        self.with_layout(self.layout.with_item_size(size))
    }

    /// Sets the minimum spacing between lines.
    #[must_use]
    pub fn minimum_line_spacing(&self, spacing: f32) -> Self {
        self.with_layout(self.layout.with_minimum_line_spacing(spacing))
    }

    /// Sets the minimum spacing between items in a line.
    #[must_use]
    pub fn minimum_interitem_spacing(&self, spacing: f32) -> Self {
        self.with_layout(self.layout.with_minimum_interitem_spacing(spacing))
    }

    /// Sets the insets around each section's items.
    #[must_use]
    pub fn section_inset(&self, inset: EdgeInsets) -> Self {
        self.with_layout(self.layout.with_section_inset(inset))
    }

    /// Sets the header size.
    #[must_use]
    pub fn header_size(&self, size: Size) -> Self {
        self.with_layout(self.layout.with_header_size(size))
    }

    /// Sets the footer size.
    #[must_use]
    pub fn footer_size(&self, size: Size) -> Self {
        self.with_layout(self.layout.with_footer_size(size))
    }

    /// Overrides the number of sections.
    #[must_use]
    pub fn section_count(&self, count: Option<usize>) -> Self {
        self.with_layout(self.layout.with_section_count(count))
    }

    /// Overrides the number of items per section. Clamped to the data length.
    #[must_use]
    pub fn items_per_section(&self, count: Option<usize>) -> Self {
        self.with_layout(self.layout.with_items_per_section(count))
    }

    /// The layout configuration.
    pub fn layout(&self) -> &LayoutConfiguration {
        &self.layout
    }

    /// The content providers.
    pub fn providers(&self) -> &ContentProviders<R> {
        &self.providers
    }

    /// The data binding.
    pub fn data(&self) -> &StateReader<Vec<T>> {
        &self.data
    }

    fn warn_on_negative_extents(&self) {
        if self.layout.has_negative_extents() {
            collection_warn!(layout = ?self.layout, "layout has negative extents; passing through");
        }
    }
}

impl<T, R, W> Representable for CollectionView<T, R, W>
where
    T: Send + Sync + 'static,
    R: 'static,
    W: CollectionWidget<R>,
{
    type Coordinator = Arc<Coordinator<T, R>>;
    type Widget = W;

    fn make_coordinator(&self) -> Self::Coordinator {
        Arc::new(Coordinator::new(
            self.data.clone(),
            self.layout.clone(),
            self.providers.clone(),
        ))
    }

    fn make_widget(&self, coordinator: &Self::Coordinator) -> Result<W> {
        let _span = PerfSpan::new(span_names::MOUNT);
        self.warn_on_negative_extents();

        let mut widget = W::create()?;
        for kind in ReuseKind::ALL {
            widget.register_reuse(kind);
        }
        widget.apply_layout(&self.layout)?;

        let delegate: Arc<dyn CollectionDelegate<R>> = coordinator.clone();
        widget.set_delegate(delegate);
        widget.reload_data();

        let published = coordinator.publish();
        collection_debug!(
            sections = published.section_count(),
            items = published.total_items(),
            "mounted collection"
        );
        Ok(widget)
    }

    fn update_widget(&self, widget: &mut W, coordinator: &Self::Coordinator) -> Result<()> {
        let _span = PerfSpan::new(span_names::UPDATE);
        self.warn_on_negative_extents();

        // The coordinator only ever holds a layout the widget accepted.
        if coordinator.layout().geometry_differs(&self.layout) {
            tracing::debug!(target: targets::LAYOUT, "layout geometry changed");
            widget.apply_layout(&self.layout)?;
        }
        coordinator.replace_config(self.data.clone(), self.layout.clone(), self.providers.clone());

        let changes = coordinator.plan_update();
        collection_trace!(
            full_reload = changes.is_full_reload(),
            sections = changes.sections().len(),
            "applying changes"
        );
        widget.apply_changes(&changes);
        Ok(())
    }
}

impl<T, R, W> Clone for CollectionView<T, R, W> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            layout: self.layout.clone(),
            providers: self.providers.clone(),
            _widget: PhantomData,
        }
    }
}

impl<T, R, W> fmt::Debug for CollectionView<T, R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionView")
            .field("layout", &self.layout)
            .field("providers", &self.providers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CollectionError, HostError};
    use crate::headless::HeadlessCollection;
    use crate::lifecycle::RepresentableHost;

    type View = CollectionView<u32, u32, HeadlessCollection<u32>>;

    fn view(data: &State<Vec<u32>>) -> View {
        let reader = data.reader();
        CollectionView::new(data, move |p: Position| reader.with(|v| v[p.item()]), |_| {})
    }

    #[test]
    fn test_builders_leave_receiver_unchanged() {
        let data = State::new(vec![1, 2, 3]);
        let base = view(&data);
        let changed = base
            .scroll_axis(ScrollAxis::Horizontal)
            .item_size(Size::new(50.0, 20.0))
            .section_inset(EdgeInsets::uniform(4.0))
            .items_per_section(Some(2));

        assert_eq!(base.layout(), &LayoutConfiguration::default());
        assert_eq!(changed.layout().scroll_axis(), ScrollAxis::Horizontal);
        assert_eq!(changed.layout().item_size(), Size::new(50.0, 20.0));
        assert_eq!(changed.layout().items_per_section(), Some(2));
        assert!(!base.providers().has_header());
        assert!(base.with_header(|s| s as u32).providers().has_header());
    }

    #[test]
    fn test_mount_configures_widget_once() {
        let data = State::new((0..10).collect());
        let mut host = RepresentableHost::new();
        host.render(view(&data).header_size(Size::new(400.0, 30.0))).unwrap();

        let widget = host.widget().unwrap();
        assert_eq!(widget.registered_kinds(), &ReuseKind::ALL);
        assert_eq!(widget.stats().layout_applications, 1);
        assert_eq!(widget.stats().delegates_installed, 1);
        assert_eq!(widget.stats().reloads, 1);
        assert_eq!(widget.layout().unwrap().header_size(), Size::new(400.0, 30.0));
    }

    #[test]
    fn test_installed_delegate_is_the_coordinator() {
        let data = State::new((0..3).collect());
        let mut host = RepresentableHost::new();
        host.render(view(&data)).unwrap();

        let coordinator = host.coordinator().unwrap().clone();
        let delegate = host.widget().unwrap().delegate().unwrap().clone();
        assert!(std::ptr::addr_eq(
            Arc::as_ptr(&coordinator),
            Arc::as_ptr(&delegate)
        ));
    }

    #[test]
    fn test_update_reapplies_layout_only_when_changed() {
        let data = State::new((0..10).collect());
        let mut host = RepresentableHost::new();
        host.render(view(&data)).unwrap();

        host.render(view(&data).items_per_section(Some(4))).unwrap();
        assert_eq!(host.widget().unwrap().stats().layout_applications, 1);
        assert_eq!(host.widget().unwrap().reported_counts(), &[4]);

        host.render(view(&data).item_size(Size::new(10.0, 10.0))).unwrap();
        assert_eq!(host.widget().unwrap().stats().layout_applications, 2);
    }

    #[test]
    fn test_update_follows_a_new_data_binding() {
        let first = State::new((0..3).collect());
        let second = State::new((10..17).collect());
        let mut host = RepresentableHost::new();
        host.render(view(&first)).unwrap();

        host.render(view(&second)).unwrap();

        let coordinator = host.coordinator().unwrap();
        assert_eq!(coordinator.item_count(0), 7);
        let widget = host.widget().unwrap();
        assert_eq!(widget.reported_counts(), &[7]);
        assert_eq!(widget.stats().reloads, 2);
        assert_eq!(widget.cell(Position::new(0, 6)).unwrap().content(), Some(&16));
    }

    /// A headless widget whose next layout application can be made to fail.
    #[derive(Default)]
    struct Flaky {
        inner: HeadlessCollection<u32>,
        fail_next_layout: bool,
    }

    impl CollectionWidget<u32> for Flaky {
        fn create() -> std::result::Result<Self, HostError> {
            Ok(Self::default())
        }

        fn register_reuse(&mut self, kind: ReuseKind) {
            self.inner.register_reuse(kind);
        }

        fn set_delegate(&mut self, delegate: Arc<dyn CollectionDelegate<u32>>) {
            self.inner.set_delegate(delegate);
        }

        fn apply_layout(&mut self, layout: &LayoutConfiguration) -> std::result::Result<(), HostError> {
            if std::mem::take(&mut self.fail_next_layout) {
                return Err(HostError::new("apply layout", "layout engine busy"));
            }
            self.inner.apply_layout(layout)
        }

        fn reload_data(&mut self) {
            self.inner.reload_data();
        }

        fn apply_changes(&mut self, changes: &crate::diff::ChangeSet) {
            self.inner.apply_changes(changes);
        }
    }

    #[test]
    fn test_failed_layout_is_applied_on_next_update() {
        let data = State::new((0..10).collect());
        let reader = data.reader();
        let base: CollectionView<u32, u32, Flaky> =
            CollectionView::new(&data, move |p: Position| reader.with(|v| v[p.item()]), |_| {});
        let resized = base.item_size(Size::new(50.0, 50.0));

        let mut host = RepresentableHost::new();
        host.render(base).unwrap();

        host.widget_mut().unwrap().fail_next_layout = true;
        let err = host.render(resized.clone()).unwrap_err();
        assert!(matches!(err, CollectionError::Host(_)));
        assert_eq!(
            host.coordinator().unwrap().layout().item_size(),
            Size::new(100.0, 100.0)
        );

        host.render(resized).unwrap();
        let widget = &host.widget().unwrap().inner;
        assert_eq!(widget.layout().unwrap().item_size(), Size::new(50.0, 50.0));
        assert_eq!(
            host.coordinator().unwrap().layout().item_size(),
            Size::new(50.0, 50.0)
        );
    }
}
