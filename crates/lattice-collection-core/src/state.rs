//! Two-way state bindings.
//!
//! [`State<T>`] is the observable container that connects a data owner to the
//! UI. Cloning a `State` yields another read-write handle onto the same value;
//! [`StateReader<T>`] is the read-only view handed to code that must observe
//! the value but never write it (such as a collection coordinator).
//!
//! Every write bumps a monotonically increasing revision and emits the
//! `changed` signal with the new revision. Observers compare revisions to
//! decide whether content has to be refreshed.
//!
//! # Example
//!
//! ```
//! use lattice_collection_core::State;
//!
//! let items = State::new(vec![1, 2, 3]);
//! let reader = items.reader();
//!
//! items.update(|v| v.push(4));
//!
//! assert_eq!(reader.with(|v| v.len()), 4);
//! assert_eq!(reader.revision(), 1);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Result, SignalError};
use crate::logging::targets;
use crate::signal::{ConnectionGuard, ConnectionId, Signal};

struct StateInner<T> {
    value: RwLock<T>,
    revision: AtomicU64,
    changed: Signal<u64>,
}

impl<T> StateInner<T> {
    fn notify(&self) -> u64 {
        let revision = self.revision.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::trace!(target: targets::STATE, revision, "state changed");
        self.changed.emit(revision);
        revision
    }
}

/// A read-write handle onto shared, observable state.
///
/// # Thread Safety
///
/// `State<T>` uses a `parking_lot::RwLock` and is `Send + Sync` when `T` is.
/// Change notification happens after the write lock is released, so slots may
/// read the state they were notified about.
pub struct State<T> {
    inner: Arc<StateInner<T>>,
}

impl<T: Send + Sync + 'static> State<T> {
    /// Create a new state with an initial value at revision 0.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(StateInner {
                value: RwLock::new(value),
                revision: AtomicU64::new(0),
                changed: Signal::new(),
            }),
        }
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.inner.value.read())
    }

    /// Replace the value and notify observers.
    ///
    /// Returns the new revision.
    pub fn set(&self, value: T) -> u64 {
        *self.inner.value.write() = value;
        self.inner.notify()
    }

    /// Mutate the value in place and notify observers.
    pub fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let result = {
            let mut value = self.inner.value.write();
            f(&mut value)
        };
        self.inner.notify();
        result
    }

    /// The number of notified writes so far.
    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::Acquire)
    }

    /// Create a read-only view of this state.
    pub fn reader(&self) -> StateReader<T> {
        StateReader {
            inner: self.inner.clone(),
        }
    }

    /// The signal emitted with the new revision after each notified write.
    pub fn changed(&self) -> &Signal<u64> {
        &self.inner.changed
    }

    /// Connect a change observer.
    pub fn on_change<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&u64) + Send + Sync + 'static,
    {
        self.inner.changed.connect(slot)
    }

    /// Connect a change observer that is removed when the guard is dropped.
    pub fn on_change_scoped<F>(&self, slot: F) -> ConnectionGuard
    where
        F: Fn(&u64) + Send + Sync + 'static,
    {
        self.inner.changed.connect_scoped(slot)
    }

    /// Remove a change observer.
    pub fn unsubscribe(&self, id: ConnectionId) -> Result<()> {
        if self.inner.changed.disconnect(id) {
            Ok(())
        } else {
            Err(SignalError::InvalidConnection)
        }
    }
}

impl<T: Clone + Send + Sync + 'static> State<T> {
    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }
}

impl<T: PartialEq + Send + Sync + 'static> State<T> {
    /// Set the value, notifying observers only if it differs.
    ///
    /// Returns `true` if the value changed.
    pub fn set_if_changed(&self, value: T) -> bool {
        {
            let mut current = self.inner.value.write();
            if *current == value {
                return false;
            }
            *current = value;
        }
        self.inner.notify();
        true
    }
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Default + Send + Sync + 'static> Default for State<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("value", &*self.inner.value.read())
            .field("revision", &self.inner.revision.load(Ordering::Acquire))
            .finish()
    }
}

/// A read-only view of a [`State`].
///
/// Readers observe the same value and revision as the state they were created
/// from but cannot write it.
pub struct StateReader<T> {
    inner: Arc<StateInner<T>>,
}

impl<T: Send + Sync + 'static> StateReader<T> {
    /// Access the value through a closure.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.inner.value.read())
    }

    /// The revision of the underlying state.
    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::Acquire)
    }

    /// Connect a change observer.
    pub fn on_change<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&u64) + Send + Sync + 'static,
    {
        self.inner.changed.connect(slot)
    }

    /// Returns `true` if both views observe the same state.
    pub fn same_state(&self, state: &State<T>) -> bool {
        Arc::ptr_eq(&self.inner, &state.inner)
    }

    /// Returns `true` if both readers observe the same state.
    pub fn same_source(&self, other: &StateReader<T>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone + Send + Sync + 'static> StateReader<T> {
    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }
}

impl<T> Clone for StateReader<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for StateReader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateReader")
            .field("value", &*self.inner.value.read())
            .finish()
    }
}

static_assertions::assert_impl_all!(State<Vec<u32>>: Send, Sync, Clone);
static_assertions::assert_impl_all!(StateReader<Vec<u32>>: Send, Sync, Clone);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_state_basic() {
        let state = State::new(42);
        assert_eq!(state.get(), 42);
        assert_eq!(state.revision(), 0);
    }

    #[test]
    fn test_set_bumps_revision_and_notifies() {
        let state = State::new(String::from("a"));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        state.on_change(move |&rev| seen_clone.lock().push(rev));

        assert_eq!(state.set("b".into()), 1);
        assert_eq!(state.set("b".into()), 2);
        assert_eq!(*seen.lock(), vec![1, 2]);
    }

    #[test]
    fn test_set_if_changed() {
        let state = State::new(10);
        assert!(!state.set_if_changed(10));
        assert_eq!(state.revision(), 0);
        assert!(state.set_if_changed(20));
        assert_eq!(state.revision(), 1);
        assert_eq!(state.get(), 20);
    }

    #[test]
    fn test_reader_sees_writes() {
        let state = State::new(vec![1, 2, 3]);
        let reader = state.reader();

        state.update(|v| v.push(4));

        assert_eq!(reader.get(), vec![1, 2, 3, 4]);
        assert_eq!(reader.revision(), 1);
        assert!(reader.same_state(&state));
        assert!(!reader.same_state(&State::new(vec![])));
        assert!(reader.same_source(&state.reader()));
        assert!(!reader.same_source(&State::new(vec![]).reader()));
    }

    #[test]
    fn test_observer_can_read_during_notification() {
        let state = State::new(vec![0u8; 3]);
        let observed_len = Arc::new(Mutex::new(0));

        let reader = state.reader();
        let observed = observed_len.clone();
        state.on_change(move |_| {
            *observed.lock() = reader.with(|v| v.len());
        });

        state.update(|v| v.push(9));
        assert_eq!(*observed_len.lock(), 4);
    }

    #[test]
    fn test_unsubscribe() {
        let state = State::new(0);
        let id = state.on_change(|_| {});
        assert_eq!(state.unsubscribe(id), Ok(()));
        assert_eq!(state.unsubscribe(id), Err(SignalError::InvalidConnection));
    }

    #[test]
    fn test_clones_share_value() {
        let owner = State::new(5);
        let other = owner.clone();
        other.set(6);
        assert_eq!(owner.get(), 6);
        assert_eq!(owner.revision(), 1);
    }
}
