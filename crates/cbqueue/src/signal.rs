//! Condition signal pairing a wait mutex with a condvar.

use std::sync::{Condvar, Mutex, PoisonError};

use crate::sync::lock;

/// One readiness condition, such as "not full" or "not empty".
///
/// The predicate a waiter checks is evaluated while holding the wait mutex,
/// and notifiers take the same mutex before signalling. A state change made
/// before `notify_*` is therefore seen either by the waiter's predicate check
/// or by its wake-up, never lost in between.
#[derive(Debug, Default)]
pub(crate) struct Signal {
    mutex: Mutex<()>,
    condvar: Condvar,
}

impl Signal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Blocks until `ready` returns true.
    ///
    /// `ready` runs under the wait mutex, initially and after every wake-up,
    /// so spurious wake-ups simply re-check it.
    pub(crate) fn wait_until(&self, mut ready: impl FnMut() -> bool) {
        let guard = lock(&self.mutex);
        let _guard = self
            .condvar
            .wait_while(guard, |_| !ready())
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Wakes one waiter.
    pub(crate) fn notify_one(&self) {
        let _guard = lock(&self.mutex);
        self.condvar.notify_one();
    }

    /// Wakes every waiter.
    pub(crate) fn notify_all(&self) {
        let _guard = lock(&self.mutex);
        self.condvar.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn wait_returns_immediately_when_ready() {
        let signal = Signal::new();
        signal.wait_until(|| true);
    }

    #[test]
    fn notify_all_releases_every_waiter() {
        let signal = Arc::new(Signal::new());
        let ready = Arc::new(AtomicBool::new(false));

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let signal = Arc::clone(&signal);
                let ready = Arc::clone(&ready);
                thread::spawn(move || signal.wait_until(|| ready.load(Ordering::Acquire)))
            })
            .collect();

        thread::sleep(Duration::from_millis(10));
        ready.store(true, Ordering::Release);
        signal.notify_all();

        for waiter in waiters {
            waiter.join().unwrap();
        }
    }
}
