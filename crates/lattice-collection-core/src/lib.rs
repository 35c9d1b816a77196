//! Core primitives for lattice-collection.
//!
//! This crate provides the reactive building blocks the collection adapter is
//! built on:
//!
//! - **Signal/Slot System**: Type-safe change notification
//! - **State Bindings**: Two-way observable containers with revisions
//! - **Thread Affinity**: Checks that UI objects stay on their thread
//! - **Logging**: `tracing` targets, span names, and helper macros
//!
//! # State Example
//!
//! ```
//! use lattice_collection_core::State;
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//!
//! let items = State::new(vec!["a", "b"]);
//! let last_revision = Arc::new(AtomicU64::new(0));
//!
//! let seen = last_revision.clone();
//! items.on_change(move |&rev| seen.store(rev, Ordering::SeqCst));
//!
//! items.update(|v| v.push("c"));
//! assert_eq!(last_revision.load(Ordering::SeqCst), 1);
//! ```

mod error;
pub mod logging;
pub mod signal;
pub mod state;
pub mod thread_check;

pub use error::{Result, SignalError};
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use state::{State, StateReader};
pub use thread_check::ThreadAffinity;
