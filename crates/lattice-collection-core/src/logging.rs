//! Logging facilities for lattice-collection.
//!
//! The workspace is instrumented with the `tracing` crate. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("lattice_collection=debug")
//!         .init();
//! }
//! ```
//!
//! Coordinator queries are logged at `trace` level because the widget issues
//! them many times per scroll frame; mount/update passes log at `debug`.

/// Span names used throughout lattice-collection for tracing.
pub mod span_names {
    /// Component mount span.
    pub const MOUNT: &str = "lattice_collection::mount";
    /// Component update span.
    pub const UPDATE: &str = "lattice_collection::update";
    /// Widget reload span.
    pub const RELOAD: &str = "lattice_collection::reload";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "lattice_collection_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "lattice_collection_core::signal";
    /// State binding target.
    pub const STATE: &str = "lattice_collection_core::state";
    /// Coordinator query target.
    pub const COORDINATOR: &str = "lattice_collection::coordinator";
    /// Component lifecycle target.
    pub const LIFECYCLE: &str = "lattice_collection::lifecycle";
    /// Layout application target.
    pub const LAYOUT: &str = "lattice_collection::layout";
    /// Headless host target.
    pub const HEADLESS: &str = "lattice_collection::headless";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to measure mount and update passes.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "lattice_collection::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// These are thin wrappers around the `tracing` macros with consistent target
/// naming.
#[macro_export]
macro_rules! collection_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "lattice_collection", $($arg)*)
    };
}

#[macro_export]
macro_rules! collection_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "lattice_collection", $($arg)*)
    };
}

#[macro_export]
macro_rules! collection_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "lattice_collection", $($arg)*)
    };
}
