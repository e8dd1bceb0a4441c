//! Shared flags and snapshot cells.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, recovering the value if a holder panicked.
///
/// Holders only ever replace the value whole, so it is never half-written.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reads a shared flag.
pub(crate) fn is_set(flag: &Mutex<bool>) -> bool {
    *lock(flag)
}

/// Writes a shared flag.
pub(crate) fn set(flag: &Mutex<bool>, value: bool) {
    *lock(flag) = value;
}

/// Replaces the snapshot in `cell` with `f` applied to the current one.
pub(crate) fn replace<S>(cell: &Mutex<Arc<S>>, f: impl FnOnce(&S) -> S) -> Arc<S> {
    let mut guard = lock(cell);
    let next = Arc::new(f(&guard));
    *guard = next.clone();
    next
}
