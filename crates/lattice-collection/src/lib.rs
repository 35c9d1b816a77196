//! Lattice Collection - a declarative adapter over virtualized collection
//! widgets.
//!
//! A caller describes a sectioned, scrollable grid or list as a value: a data
//! binding, a cell provider, optional header and footer providers, a
//! selection handler, and a layout. The adapter bridges that description to
//! an imperative, cell-recycling widget supplied by the host toolkit, which
//! consults a single [`Coordinator`] for structure, content, sizes, and
//! selection.
//!
//! # Features
//!
//! - `headless` (default): [`HeadlessCollection`], an in-memory widget for
//!   tests and for hosts that render elsewhere.
//!
//! # Example
//!
//! ```
//! use lattice_collection::prelude::*;
//! use lattice_collection_core::State;
//!
//! let items = State::new(vec![1u32, 2, 3]);
//! let reader = items.reader();
//!
//! let view: CollectionView<u32, String, HeadlessCollection<String>> = CollectionView::new(
//!     &items,
//!     move |p: Position| reader.with(|v| format!("#{}", v[p.item()])),
//!     |_| {},
//! )
//! .with_header(|section| format!("Section {section}"));
//!
//! let mut host = RepresentableHost::new();
//! host.invalidate_on(&items);
//! host.render(view).unwrap();
//!
//! items.update(|v| v.push(4));
//! assert!(host.flush().unwrap());
//! assert_eq!(host.widget().unwrap().reported_counts(), &[4]);
//! ```

pub mod component;
pub mod coordinator;
pub mod diff;
mod error;
pub mod geometry;
#[cfg(any(test, feature = "headless"))]
pub mod headless;
pub mod layout;
pub mod lifecycle;
pub mod position;
pub mod prelude;
pub mod provider;
pub mod slot;
pub mod widget;

pub use component::CollectionView;
pub use coordinator::{Coordinator, CoordinatorConfig};
pub use diff::{ChangeSet, SectionChange, StructureSnapshot};
pub use error::{CollectionError, HostError, Result};
pub use geometry::{EdgeInsets, Size};
#[cfg(any(test, feature = "headless"))]
pub use headless::{HeadlessCollection, HeadlessStats, HostEvent, RecordingSlot};
pub use layout::{LayoutConfiguration, ScrollAxis};
pub use lifecycle::{Representable, RepresentableHost};
pub use position::{Position, ReuseKind, SupplementaryKind};
pub use provider::{CellProvider, ContentProviders, SelectionHandler, SupplementaryProvider};
pub use slot::{Anchoring, HostedContent, ReusableSlot};
pub use widget::{
    CollectionDelegate, CollectionWidget, ContentSource, SelectionSink, SizeSource,
    StructureSource,
};

static_assertions::assert_impl_all!(Coordinator<u32, String>: Send, Sync);
static_assertions::assert_impl_all!(ContentProviders<String>: Send, Sync, Clone);
static_assertions::assert_impl_all!(LayoutConfiguration: Send, Sync, Clone);
