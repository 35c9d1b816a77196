//! Flow layout configuration for collection widgets.
//!
//! [`LayoutConfiguration`] is a pure value: every `with_*` setter returns a new
//! configuration equal to the receiver except for one field. The adapter
//! applies it to the host widget's layout engine in one pass at mount, and
//! again on update only when a re-rendered component carries a different
//! value.
//!
//! No validation beyond the type system is performed. Negative extents are
//! passed through to the host layout engine, whose failure behavior applies.
//!
//! # Example
//!
//! ```
//! use lattice_collection::layout::{LayoutConfiguration, ScrollAxis};
//! use lattice_collection::geometry::Size;
//!
//! let base = LayoutConfiguration::default();
//! let wide = base
//!     .with_scroll_axis(ScrollAxis::Horizontal)
//!     .with_item_size(Size::new(160.0, 90.0));
//!
//! assert_eq!(base.item_size(), Size::new(100.0, 100.0));
//! assert_eq!(wide.item_size(), Size::new(160.0, 90.0));
//! ```
//!
//! # Presets
//!
//! Layouts deserialize with every field optional, so a preset only names what
//! it changes:
//!
//! ```
//! use lattice_collection::layout::LayoutConfiguration;
//!
//! let layout = LayoutConfiguration::from_toml_str(r#"
//! scroll_axis = "horizontal"
//! minimum_line_spacing = 4.0
//!
//! [header_size]
//! width = 350.0
//! height = 35.0
//! "#).unwrap();
//!
//! assert_eq!(layout.minimum_line_spacing(), 4.0);
//! assert_eq!(layout.minimum_interitem_spacing(), 10.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CollectionError, Result};
use crate::geometry::{EdgeInsets, Size};
use crate::position::SupplementaryKind;

/// Default item extent in logical units.
pub const DEFAULT_ITEM_SIZE: Size = Size::new(100.0, 100.0);

/// Default line and inter-item spacing in logical units.
pub const DEFAULT_SPACING: f32 = 10.0;

/// Default header and footer extent in logical units.
pub const DEFAULT_SUPPLEMENTARY_SIZE: Size = Size::new(10.0, 10.0);

/// The direction a collection scrolls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAxis {
    /// Items flow left to right in lines stacked top to bottom.
    #[default]
    Vertical,
    /// Items flow top to bottom in lines stacked left to right.
    Horizontal,
}

/// Layout parameters for a sectioned flow layout.
///
/// Besides the geometry consumed by the host layout engine, the configuration
/// carries the optional structure overrides: a fixed section count and a fixed
/// number of items per section. Without overrides the collection has one
/// section holding every item of the data snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfiguration {
    scroll_axis: ScrollAxis,
    item_size: Size,
    minimum_line_spacing: f32,
    minimum_interitem_spacing: f32,
    section_inset: EdgeInsets,
    header_size: Size,
    footer_size: Size,
    section_count: Option<usize>,
    items_per_section: Option<usize>,
}

impl Default for LayoutConfiguration {
    fn default() -> Self {
        Self {
            scroll_axis: ScrollAxis::Vertical,
            item_size: DEFAULT_ITEM_SIZE,
            minimum_line_spacing: DEFAULT_SPACING,
            minimum_interitem_spacing: DEFAULT_SPACING,
            section_inset: EdgeInsets::ZERO,
            header_size: DEFAULT_SUPPLEMENTARY_SIZE,
            footer_size: DEFAULT_SUPPLEMENTARY_SIZE,
            section_count: None,
            items_per_section: None,
        }
    }
}

impl LayoutConfiguration {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a layout preset from TOML.
    ///
    /// Fields missing from the document keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|err| CollectionError::Config(err.to_string()))
    }

    // =========================================================================
    // Builders
    // =========================================================================

    /// Sets the scroll axis.
    #[must_use]
    pub fn with_scroll_axis(&self, axis: ScrollAxis) -> Self {
        Self {
            scroll_axis: axis,
            ..self.clone()
        }
    }

    /// Sets the item extent.
    #[must_use]
    pub fn with_item_size(&self, size: Size) -> Self {
        Self {
            item_size: size,
            ..self.clone()
        }
    }

    /// Sets the minimum spacing between lines of items.
    #[must_use]
    pub fn with_minimum_line_spacing(&self, spacing: f32) -> Self {
        Self {
            minimum_line_spacing: spacing,
            ..self.clone()
        }
    }

    /// Sets the minimum spacing between items in the same line.
    #[must_use]
    pub fn with_minimum_interitem_spacing(&self, spacing: f32) -> Self {
        Self {
            minimum_interitem_spacing: spacing,
            ..self.clone()
        }
    }

    /// Sets the insets around each section's items.
    #[must_use]
    pub fn with_section_inset(&self, inset: EdgeInsets) -> Self {
        Self {
            section_inset: inset,
            ..self.clone()
        }
    }

    /// Sets the header extent.
    #[must_use]
    pub fn with_header_size(&self, size: Size) -> Self {
        Self {
            header_size: size,
            ..self.clone()
        }
    }

    /// Sets the footer extent.
    #[must_use]
    pub fn with_footer_size(&self, size: Size) -> Self {
        Self {
            footer_size: size,
            ..self.clone()
        }
    }

    /// Overrides the number of sections.
    #[must_use]
    pub fn with_section_count(&self, count: Option<usize>) -> Self {
        Self {
            section_count: count,
            ..self.clone()
        }
    }

    /// Overrides the number of items in each section.
    ///
    /// The override is clamped to the data length when counts are reported.
    #[must_use]
    pub fn with_items_per_section(&self, count: Option<usize>) -> Self {
        Self {
            items_per_section: count,
            ..self.clone()
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The scroll axis.
    pub fn scroll_axis(&self) -> ScrollAxis {
        self.scroll_axis
    }

    /// The item extent.
    pub fn item_size(&self) -> Size {
        self.item_size
    }

    /// The minimum spacing between lines.
    pub fn minimum_line_spacing(&self) -> f32 {
        self.minimum_line_spacing
    }

    /// The minimum spacing between items in a line.
    pub fn minimum_interitem_spacing(&self) -> f32 {
        self.minimum_interitem_spacing
    }

    /// The section inset.
    pub fn section_inset(&self) -> EdgeInsets {
        self.section_inset
    }

    /// The header extent.
    pub fn header_size(&self) -> Size {
        self.header_size
    }

    /// The footer extent.
    pub fn footer_size(&self) -> Size {
        self.footer_size
    }

    /// The extent configured for a supplementary kind.
    pub fn supplementary_size(&self, kind: SupplementaryKind) -> Size {
        match kind {
            SupplementaryKind::Header => self.header_size,
            SupplementaryKind::Footer => self.footer_size,
        }
    }

    /// The section count override, if any.
    pub fn section_count(&self) -> Option<usize> {
        self.section_count
    }

    /// The items-per-section override, if any.
    pub fn items_per_section(&self) -> Option<usize> {
        self.items_per_section
    }

    /// Returns `true` if any spacing or extent is negative.
    ///
    /// Such values are still applied; this only feeds diagnostics.
    pub fn has_negative_extents(&self) -> bool {
        self.item_size.has_negative()
            || self.header_size.has_negative()
            || self.footer_size.has_negative()
            || self.section_inset.has_negative()
            || self.minimum_line_spacing < 0.0
            || self.minimum_interitem_spacing < 0.0
    }

    /// Returns `true` if the geometry the host layout engine consumes differs.
    ///
    /// Structure overrides are not part of the host geometry.
    pub fn geometry_differs(&self, other: &Self) -> bool {
        self.scroll_axis != other.scroll_axis
            || self.item_size != other.item_size
            || self.minimum_line_spacing != other.minimum_line_spacing
            || self.minimum_interitem_spacing != other.minimum_interitem_spacing
            || self.section_inset != other.section_inset
            || self.header_size != other.header_size
            || self.footer_size != other.footer_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let layout = LayoutConfiguration::new();
        assert_eq!(layout.scroll_axis(), ScrollAxis::Vertical);
        assert_eq!(layout.item_size(), Size::new(100.0, 100.0));
        assert_eq!(layout.minimum_line_spacing(), 10.0);
        assert_eq!(layout.minimum_interitem_spacing(), 10.0);
        assert_eq!(layout.section_inset(), EdgeInsets::ZERO);
        assert_eq!(layout.header_size(), Size::new(10.0, 10.0));
        assert_eq!(layout.footer_size(), Size::new(10.0, 10.0));
        assert_eq!(layout.section_count(), None);
        assert_eq!(layout.items_per_section(), None);
    }

    #[test]
    fn test_builder_changes_one_field() {
        let base = LayoutConfiguration::new();
        let changed = base.with_minimum_line_spacing(4.0);

        assert_eq!(base.minimum_line_spacing(), 10.0);
        assert_eq!(changed.minimum_line_spacing(), 4.0);
        assert_eq!(changed.with_minimum_line_spacing(10.0), base);
    }

    #[test]
    fn test_builder_chain() {
        let layout = LayoutConfiguration::new()
            .with_scroll_axis(ScrollAxis::Horizontal)
            .with_section_inset(EdgeInsets::new(1.0, 2.0, 3.0, 4.0))
            .with_header_size(Size::new(350.0, 35.0))
            .with_footer_size(Size::new(350.0, 20.0))
            .with_section_count(Some(3))
            .with_items_per_section(Some(4));

        assert_eq!(layout.scroll_axis(), ScrollAxis::Horizontal);
        assert_eq!(layout.section_inset().left, 2.0);
        assert_eq!(
            layout.supplementary_size(SupplementaryKind::Header),
            Size::new(350.0, 35.0)
        );
        assert_eq!(
            layout.supplementary_size(SupplementaryKind::Footer),
            Size::new(350.0, 20.0)
        );
        assert_eq!(layout.section_count(), Some(3));
        assert_eq!(layout.items_per_section(), Some(4));
    }

    #[test]
    fn test_negative_values_pass_through() {
        let layout = LayoutConfiguration::new().with_item_size(Size::new(-5.0, 20.0));
        assert_eq!(layout.item_size().width, -5.0);
        assert!(layout.has_negative_extents());
        assert!(!LayoutConfiguration::new().has_negative_extents());
    }

    #[test]
    fn test_geometry_differs_ignores_overrides() {
        let base = LayoutConfiguration::new();
        assert!(!base.geometry_differs(&base.with_items_per_section(Some(2))));
        assert!(base.geometry_differs(&base.with_item_size(Size::new(1.0, 1.0))));
    }

    #[test]
    fn test_toml_preset_fills_defaults() {
        let layout = LayoutConfiguration::from_toml_str(
            r#"
            scroll_axis = "horizontal"
            items_per_section = 20

            [item_size]
            width = 50.0
            height = 60.0
            "#,
        )
        .unwrap();

        assert_eq!(layout.scroll_axis(), ScrollAxis::Horizontal);
        assert_eq!(layout.item_size(), Size::new(50.0, 60.0));
        assert_eq!(layout.items_per_section(), Some(20));
        assert_eq!(layout.footer_size(), DEFAULT_SUPPLEMENTARY_SIZE);
    }

    #[test]
    fn test_toml_preset_rejects_malformed_input() {
        let err = LayoutConfiguration::from_toml_str("scroll_axis = \"diagonal\"").unwrap_err();
        assert!(matches!(err, CollectionError::Config(_)));
    }

    #[test]
    fn test_json_partial_document() {
        let layout: LayoutConfiguration =
            serde_json::from_str(r#"{ "minimum_interitem_spacing": 2.5 }"#).unwrap();
        assert_eq!(layout.minimum_interitem_spacing(), 2.5);
        assert_eq!(layout.item_size(), DEFAULT_ITEM_SIZE);
    }
}
