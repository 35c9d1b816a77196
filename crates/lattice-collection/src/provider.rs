//! Content-producing callbacks supplied by the caller.
//!
//! A collection is described by three content providers and one selection
//! handler:
//!
//! - **cell**: `Position -> R`, called for every cell the widget shows
//! - **header** (optional): `section -> R`
//! - **footer** (optional): `section -> R`
//! - **selection**: `Position -> ()`, called once per selection event
//!
//! `R` is whatever renderable type the host framework knows how to mount into
//! a widget slot. Providers are invoked synchronously on the UI thread,
//! potentially many times per scroll frame, and are trusted to be total: a
//! panicking provider propagates to the host.

use std::fmt;
use std::sync::Arc;

use crate::position::{Position, SupplementaryKind};

/// Produces the content of one cell.
pub type CellProvider<R> = Arc<dyn Fn(Position) -> R + Send + Sync>;

/// Produces the content of a header or footer for a section.
pub type SupplementaryProvider<R> = Arc<dyn Fn(usize) -> R + Send + Sync>;

/// Receives selection notifications.
pub type SelectionHandler = Arc<dyn Fn(Position) + Send + Sync>;

/// The bundle of callbacks one collection component is configured with.
///
/// Like the layout, the bundle is an immutable value: the `with_*` methods
/// return a new bundle and never touch the receiver.
pub struct ContentProviders<R> {
    cell: CellProvider<R>,
    header: Option<SupplementaryProvider<R>>,
    footer: Option<SupplementaryProvider<R>>,
    on_select: SelectionHandler,
}

impl<R> ContentProviders<R> {
    /// Creates a bundle with a cell provider and a selection handler.
    pub fn new<C, S>(cell: C, on_select: S) -> Self
    where
        C: Fn(Position) -> R + Send + Sync + 'static,
        S: Fn(Position) + Send + Sync + 'static,
    {
        Self {
            cell: Arc::new(cell),
            header: None,
            footer: None,
            on_select: Arc::new(on_select),
        }
    }

    /// Returns a bundle that also provides section headers.
    #[must_use]
    pub fn with_header<H>(&self, header: H) -> Self
    where
        H: Fn(usize) -> R + Send + Sync + 'static,
    {
        Self {
            header: Some(Arc::new(header)),
            ..self.clone()
        }
    }

    /// Returns a bundle that also provides section footers.
    #[must_use]
    pub fn with_footer<F>(&self, footer: F) -> Self
    where
        F: Fn(usize) -> R + Send + Sync + 'static,
    {
        Self {
            footer: Some(Arc::new(footer)),
            ..self.clone()
        }
    }

    /// Returns a bundle with a different selection handler.
    #[must_use]
    pub fn with_selection_handler<S>(&self, on_select: S) -> Self
    where
        S: Fn(Position) + Send + Sync + 'static,
    {
        Self {
            on_select: Arc::new(on_select),
            ..self.clone()
        }
    }

    /// Invokes the cell provider.
    pub fn cell(&self, position: Position) -> R {
        (self.cell)(position)
    }

    /// Invokes the header provider, if there is one.
    pub fn header(&self, section: usize) -> Option<R> {
        self.header.as_ref().map(|header| header(section))
    }

    /// Invokes the footer provider, if there is one.
    pub fn footer(&self, section: usize) -> Option<R> {
        self.footer.as_ref().map(|footer| footer(section))
    }

    /// Invokes the provider for a supplementary kind, if there is one.
    pub fn supplementary(&self, kind: SupplementaryKind, section: usize) -> Option<R> {
        match kind {
            SupplementaryKind::Header => self.header(section),
            SupplementaryKind::Footer => self.footer(section),
        }
    }

    /// Forwards a selection to the handler.
    pub fn select(&self, position: Position) {
        (self.on_select)(position)
    }

    /// Returns `true` if a header provider is configured.
    pub fn has_header(&self) -> bool {
        self.header.is_some()
    }

    /// Returns `true` if a footer provider is configured.
    pub fn has_footer(&self) -> bool {
        self.footer.is_some()
    }

    /// Returns `true` if a provider exists for the kind.
    pub fn has_supplementary(&self, kind: SupplementaryKind) -> bool {
        match kind {
            SupplementaryKind::Header => self.has_header(),
            SupplementaryKind::Footer => self.has_footer(),
        }
    }

    /// Returns `true` if both bundles share the same callbacks.
    pub fn same_callbacks(&self, other: &Self) -> bool {
        fn same_opt<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
        }

        Arc::ptr_eq(&self.cell, &other.cell)
            && Arc::ptr_eq(&self.on_select, &other.on_select)
            && same_opt(&self.header, &other.header)
            && same_opt(&self.footer, &other.footer)
    }
}

impl<R> Clone for ContentProviders<R> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            header: self.header.clone(),
            footer: self.footer.clone(),
            on_select: self.on_select.clone(),
        }
    }
}

impl<R> fmt::Debug for ContentProviders<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentProviders")
            .field("header", &self.has_header())
            .field("footer", &self.has_footer())
            .finish_non_exhaustive()
    }
}
