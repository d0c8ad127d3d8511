//! Lock helpers.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Acquires `mutex`, recovering the guard if a previous holder panicked.
///
/// Every critical section in this crate either completes its mutation or
/// leaves the protected state untouched, so a poisoned lock never guards a
/// half-updated value.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
