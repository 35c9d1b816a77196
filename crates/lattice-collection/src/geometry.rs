//! Geometry value types used by collection layouts.
//!
//! All extents are in logical units. Negative values are representable on
//! purpose: the adapter hands them to the host layout engine unchanged.

use serde::{Deserialize, Serialize};

use crate::layout::ScrollAxis;

/// A size in 2D space (width and height).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Check if the size has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Returns `true` if either dimension is negative.
    #[inline]
    pub fn has_negative(&self) -> bool {
        self.width < 0.0 || self.height < 0.0
    }

    /// The extent along the given axis.
    #[inline]
    pub fn main(&self, axis: ScrollAxis) -> f32 {
        match axis {
            ScrollAxis::Vertical => self.height,
            ScrollAxis::Horizontal => self.width,
        }
    }

    /// The extent across the given axis.
    #[inline]
    pub fn cross(&self, axis: ScrollAxis) -> f32 {
        match axis {
            ScrollAxis::Vertical => self.width,
            ScrollAxis::Horizontal => self.height,
        }
    }
}

impl From<(f32, f32)> for Size {
    fn from((width, height): (f32, f32)) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }
}

/// Insets applied around the items of a section.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl EdgeInsets {
    /// No insets.
    pub const ZERO: Self = Self {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    /// Create insets from the four edges, in top/left/bottom/right order.
    #[inline]
    pub const fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// The same inset on every edge.
    #[inline]
    pub const fn uniform(inset: f32) -> Self {
        Self::new(inset, inset, inset, inset)
    }

    /// Sum of the left and right insets.
    #[inline]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Sum of the top and bottom insets.
    #[inline]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Returns `true` if any edge is negative.
    #[inline]
    pub fn has_negative(&self) -> bool {
        self.top < 0.0 || self.left < 0.0 || self.bottom < 0.0 || self.right < 0.0
    }
}
