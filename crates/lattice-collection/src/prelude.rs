//! Prelude module for Lattice Collection.
//!
//! ```
//! use lattice_collection::prelude::*;
//! ```
//!
//! This provides access to:
//! - The component and its lifecycle (`CollectionView`, `RepresentableHost`)
//! - Layout and geometry (`LayoutConfiguration`, `ScrollAxis`, `Size`, `EdgeInsets`)
//! - Positions and reuse kinds (`Position`, `SupplementaryKind`, `ReuseKind`)
//! - The widget protocol (`CollectionWidget`, `CollectionDelegate`, `ReusableSlot`)

// ============================================================================
// Component and Lifecycle
// ============================================================================

pub use crate::component::CollectionView;
pub use crate::lifecycle::{Representable, RepresentableHost};

// ============================================================================
// Layout and Geometry
// ============================================================================

pub use crate::geometry::{EdgeInsets, Size};
pub use crate::layout::{LayoutConfiguration, ScrollAxis};
pub use crate::position::{Position, ReuseKind, SupplementaryKind};

// ============================================================================
// Widget Protocol
// ============================================================================

pub use crate::coordinator::Coordinator;
pub use crate::provider::ContentProviders;
pub use crate::slot::{HostedContent, ReusableSlot};
pub use crate::widget::{CollectionDelegate, CollectionWidget};

// ============================================================================
// Headless Host
// ============================================================================

#[cfg(feature = "headless")]
pub use crate::headless::HeadlessCollection;

// ============================================================================
// Errors
// ============================================================================

pub use crate::error::{CollectionError, HostError};
