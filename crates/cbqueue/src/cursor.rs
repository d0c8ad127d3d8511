//! Producer and consumer cursors.
//!
//! `head` counts successful pushes and `tail` counts successful pops, both
//! since the last rebase. Their difference is the number of resident
//! elements. The slot written by the next push is `head + 1` and the slot read
//! by the next pop is `tail + 1`, both modulo `base`.
//!
//! # Locking
//!
//! - `head` is only written while the head-side lock is held.
//! - `tail` is only written while the tail-side lock is held.
//! - Rebase and reset write both and hold both, head-side first.
//!
//! Each side reads the opposite cursor without taking its lock. A stale read
//! can only make the queue look fuller (to a producer) or emptier (to a
//! consumer) than it is, which turns into a retry, never into a collision.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::sync::lock;

/// Consistent snapshot of the raw cursor values.
///
/// Exposed for diagnostics and tests. `head - tail` is the queue length, and
/// both values stay below `2 * base` for a bounded number of concurrent
/// consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursors {
    /// Pushes since the last rebase.
    pub head: usize,
    /// Pops since the last rebase.
    pub tail: usize,
}

impl Cursors {
    /// Number of resident elements described by this snapshot.
    pub fn len(&self) -> usize {
        self.head - self.tail
    }

    /// Returns true if the snapshot describes an empty queue.
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }
}

pub(crate) struct IndexPair {
    head: AtomicUsize,
    tail: AtomicUsize,
    head_lock: Mutex<()>,
    tail_lock: Mutex<()>,
    base: usize,
}

impl IndexPair {
    pub(crate) fn new(base: usize) -> Self {
        assert!(base > 1, "base must exceed capacity");
        Self {
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            head_lock: Mutex::new(()),
            tail_lock: Mutex::new(()),
            base,
        }
    }

    /// Enters the producer critical section.
    pub(crate) fn lock_head(&self) -> HeadSide<'_> {
        HeadSide {
            pair: self,
            _guard: lock(&self.head_lock),
        }
    }

    /// Enters the consumer critical section.
    pub(crate) fn lock_tail(&self) -> TailSide<'_> {
        TailSide {
            pair: self,
            _guard: lock(&self.tail_lock),
        }
    }

    /// Enters both critical sections, head-side first.
    pub(crate) fn lock_both(&self) -> BothSides<'_> {
        let head_guard = lock(&self.head_lock);
        let tail_guard = lock(&self.tail_lock);
        BothSides {
            pair: self,
            _head_guard: head_guard,
            _tail_guard: tail_guard,
        }
    }

    /// Subtracts `base` from both cursors once `tail` has reached it.
    ///
    /// Length and every occupied slot position are unchanged because slots
    /// are addressed modulo `base`. Returns true if a rebase happened.
    pub(crate) fn rebase(&self) -> bool {
        let both = self.lock_both();
        let tail = both.pair.tail.load(Ordering::Acquire);
        if tail < self.base {
            // Another consumer already rebased.
            return false;
        }

        let head = both.pair.head.load(Ordering::Acquire);
        debug_assert!(head >= tail);
        self.head.store(head - self.base, Ordering::Release);
        self.tail.store(tail - self.base, Ordering::Release);
        true
    }
}

/// Producer critical section. `head` is stable while this guard lives.
pub(crate) struct HeadSide<'a> {
    pair: &'a IndexPair,
    _guard: MutexGuard<'a, ()>,
}

impl HeadSide<'_> {
    pub(crate) fn len(&self) -> usize {
        let head = self.pair.head.load(Ordering::Acquire);
        let tail = self.pair.tail.load(Ordering::Acquire);
        debug_assert!(tail <= head, "tail {tail} passed head {head}");
        head - tail
    }

    /// Cursor value of the slot the next push writes.
    pub(crate) fn next_slot(&self) -> usize {
        self.pair.head.load(Ordering::Acquire) + 1
    }

    /// Publishes one pushed element.
    pub(crate) fn advance(&mut self) {
        let head = self.pair.head.load(Ordering::Acquire);
        self.pair.head.store(head + 1, Ordering::Release);
    }
}

/// Consumer critical section. `tail` is stable while this guard lives.
pub(crate) struct TailSide<'a> {
    pair: &'a IndexPair,
    _guard: MutexGuard<'a, ()>,
}

impl TailSide<'_> {
    pub(crate) fn is_empty(&self) -> bool {
        let tail = self.pair.tail.load(Ordering::Acquire);
        let head = self.pair.head.load(Ordering::Acquire);
        debug_assert!(tail <= head, "tail {tail} passed head {head}");
        head == tail
    }

    /// Cursor value of the slot the next pop reads.
    pub(crate) fn next_slot(&self) -> usize {
        self.pair.tail.load(Ordering::Acquire) + 1
    }

    /// Retires one popped element. Returns true if a rebase is due.
    pub(crate) fn advance(&mut self) -> bool {
        let tail = self.pair.tail.load(Ordering::Acquire) + 1;
        self.pair.tail.store(tail, Ordering::Release);
        tail >= self.pair.base
    }
}

/// Joint critical section used by observers, rebase and shutdown.
pub(crate) struct BothSides<'a> {
    pair: &'a IndexPair,
    _head_guard: MutexGuard<'a, ()>,
    _tail_guard: MutexGuard<'a, ()>,
}

impl BothSides<'_> {
    pub(crate) fn snapshot(&self) -> Cursors {
        Cursors {
            head: self.pair.head.load(Ordering::Acquire),
            tail: self.pair.tail.load(Ordering::Acquire),
        }
    }

    /// Zeroes both cursors.
    pub(crate) fn reset(&mut self) {
        self.pair.head.store(0, Ordering::Release);
        self.pair.tail.store(0, Ordering::Release);
    }
}
