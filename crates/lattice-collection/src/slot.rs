//! Reusable widget slots and the content installed into them.
//!
//! The host widget owns a pool of view instances it hands out again and again
//! for different positions. The adapter never assumes a slot is fresh: every
//! population path clears whatever the slot was showing before installing the
//! new content, so reused slots never stack stale content.

/// How installed content is placed within a slot's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchoring {
    /// Pinned to all four edges of the slot, with no implicit padding.
    #[default]
    FillBounds,
}

/// Declarative content wrapped for installation into an imperative slot.
///
/// This is the hosting adapter between a provider's output and the widget's
/// view hierarchy. The adapter always produces [`Anchoring::FillBounds`].
#[derive(Debug, Clone, PartialEq)]
pub struct HostedContent<R> {
    content: R,
    anchoring: Anchoring,
}

impl<R> HostedContent<R> {
    /// Wraps content so it fills the slot edge to edge.
    pub fn filling(content: R) -> Self {
        Self {
            content,
            anchoring: Anchoring::FillBounds,
        }
    }

    /// How the content is anchored.
    pub fn anchoring(&self) -> Anchoring {
        self.anchoring
    }

    /// Borrows the wrapped content.
    pub fn content(&self) -> &R {
        &self.content
    }

    /// Unwraps the content.
    pub fn into_content(self) -> R {
        self.content
    }
}

/// A widget-owned view instance that is reused across many positions.
pub trait ReusableSlot<R> {
    /// Removes every piece of previously installed content.
    fn clear(&mut self);

    /// Installs content into the slot.
    ///
    /// Callers clear the slot first; implementations add the content to
    /// whatever the slot already holds.
    fn install(&mut self, content: HostedContent<R>);

    /// Returns `true` if nothing is installed.
    fn is_empty(&self) -> bool;
}
