//! Logical positions within a sectioned collection.
//!
//! A [`Position`] addresses one data-backed slot by `(section, item)`. It is
//! distinct from the widget's reuse identity: the widget may show the same
//! underlying view instance for many positions over time, and the content
//! providers are asked afresh for each position every time the widget needs
//! it.

use std::fmt;

/// Identifies one logical slot in a sectioned collection.
///
/// Positions are plain values and should be used immediately; after the data
/// snapshot changes, a previously reported position may fall out of bounds.
///
/// # Example
///
/// ```
/// use lattice_collection::Position;
///
/// let position = Position::new(0, 5);
/// assert_eq!(position.section(), 0);
/// assert_eq!(position.item(), 5);
/// assert_eq!(position.sibling(6), Position::new(0, 6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    section: usize,
    item: usize,
}

impl Position {
    /// Creates a position from a section and an item index.
    #[inline]
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }

    /// The section index.
    #[inline]
    pub const fn section(&self) -> usize {
        self.section
    }

    /// The item index within the section.
    #[inline]
    pub const fn item(&self) -> usize {
        self.item
    }

    /// A position in the same section at another item index.
    #[inline]
    pub const fn sibling(&self, item: usize) -> Self {
        Self::new(self.section, item)
    }
}

impl From<(usize, usize)> for Position {
    fn from((section, item): (usize, usize)) -> Self {
        Self::new(section, item)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.item)
    }
}

/// A view rendered once per section outside the regular item grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupplementaryKind {
    /// Rendered before the section's items.
    Header,
    /// Rendered after the section's items.
    Footer,
}

impl SupplementaryKind {
    /// Both kinds, in layout order.
    pub const ALL: [SupplementaryKind; 2] = [SupplementaryKind::Header, SupplementaryKind::Footer];
}

/// The reuse pool a widget slot is drawn from.
///
/// Hosts register one pool per kind at mount and dequeue slots by kind, so a
/// header slot is never handed a cell's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReuseKind {
    /// Regular item cells.
    Cell,
    /// Header or footer views.
    Supplementary(SupplementaryKind),
}

impl ReuseKind {
    /// Every reuse kind the adapter registers.
    pub const ALL: [ReuseKind; 3] = [
        ReuseKind::Cell,
        ReuseKind::Supplementary(SupplementaryKind::Header),
        ReuseKind::Supplementary(SupplementaryKind::Footer),
    ];

    /// The stable reuse identifier hosts register this kind under.
    pub const fn identifier(&self) -> &'static str {
        match self {
            ReuseKind::Cell => "lattice.cell",
            ReuseKind::Supplementary(SupplementaryKind::Header) => "lattice.header",
            ReuseKind::Supplementary(SupplementaryKind::Footer) => "lattice.footer",
        }
    }
}

impl fmt::Display for ReuseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}
