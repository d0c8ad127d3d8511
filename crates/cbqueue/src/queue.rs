//! Bounded MPMC queue with blocking backpressure and shutdown.
//!
//! Producers and consumers coordinate through two independent critical
//! sections: the head side (pushes) and the tail side (pops). A push and a pop
//! proceed concurrently whenever the queue is neither empty nor full. When it
//! is, the blocking variants park on the matching [`Signal`] until the other
//! side makes room or delivers an element.
//!
//! # States
//!
//! ```text
//!   empty ──push──▶ partial ──push──▶ full
//!     ▲               │  ▲              │
//!     └─────pop───────┘  └─────pop──────┘
//!
//!   any ──clear──▶ shutdown (terminal)
//! ```
//!
//! # Sizing
//!
//! Size the queue using Little's Law: `capacity = throughput * latency`.
//! For example, at 100k ops/sec with 10ms latency: `capacity = 100_000 * 0.01 = 1000`.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::cursor::{Cursors, IndexPair};
use crate::error::{CapacityError, PopError, PushError};
use crate::ring::Ring;
use crate::signal::Signal;

/// A bounded, thread-safe FIFO queue.
///
/// Share it between threads behind an `Arc`. Elements are delivered in the
/// order their pushes entered the head-side critical section, across all
/// producers and consumers.
///
/// # Blocking and non-blocking calls
///
/// | Call | Full / empty | After `clear` |
/// |---|---|---|
/// | [`push`](Self::push), [`emplace`](Self::emplace) | blocks | `Err(Shutdown)` |
/// | [`try_push`](Self::try_push), [`try_emplace`](Self::try_emplace) | `Err(Full)` | `Err(Shutdown)` |
/// | [`pop`](Self::pop) | blocks | `Err(Shutdown)` |
/// | [`try_pop`](Self::try_pop) | `Err(Empty)` | `Err(Shutdown)` |
///
/// A rejected value is always handed back inside the [`PushError`].
pub struct BoundedQueue<T> {
    ring: Ring<T>,
    cursors: IndexPair,
    capacity: usize,
    shutdown: AtomicBool,
    /// Producers wait here for `len < capacity`.
    not_full: Signal,
    /// Consumers wait here for `len > 0`.
    not_empty: Signal,
}

impl<T> BoundedQueue<T> {
    /// Creates a new bounded queue with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(queue) => queue,
            Err(e) => panic!("{e}"),
        }
    }

    /// Creates a new bounded queue, rejecting unusable capacities.
    pub fn try_new(capacity: usize) -> Result<Self, CapacityError> {
        if capacity == 0 {
            return Err(CapacityError::Zero);
        }
        let base = capacity
            .checked_add(1)
            .ok_or(CapacityError::TooLarge { capacity })?;

        tracing::debug!(capacity, base, "bounded queue created");

        Ok(Self {
            ring: Ring::new(base),
            cursors: IndexPair::new(base),
            capacity,
            shutdown: AtomicBool::new(false),
            not_full: Signal::new(),
            not_empty: Signal::new(),
        })
    }

    // ------------------------------------------------------------------------
    // Producer side
    // ------------------------------------------------------------------------

    /// Attempts to push an item onto the queue without blocking.
    ///
    /// The value is moved into its slot. On failure it is returned inside
    /// `PushError::Full` or `PushError::Shutdown`.
    pub fn try_push(&self, value: T) -> Result<(), PushError<T>> {
        let mut head = self.cursors.lock_head();
        if self.is_shutdown() {
            return Err(PushError::Shutdown(value));
        }
        if head.len() >= self.capacity {
            return Err(PushError::Full(value));
        }

        self.ring.put(head.next_slot(), value);
        head.advance();
        drop(head);

        self.not_empty.notify_one();
        Ok(())
    }

    /// Builds an element with `make` and pushes it without blocking.
    ///
    /// `make` runs before any lock is taken, so it may use the queue itself.
    /// The built element is handed back on failure.
    pub fn try_emplace<F>(&self, make: F) -> Result<(), PushError<T>>
    where
        F: FnOnce() -> T,
    {
        self.try_push(make())
    }

    /// Pushes an item, blocking while the queue is full.
    ///
    /// Returns `Err(PushError::Shutdown(value))` if the queue is shut down
    /// before a slot frees up. The value is never dropped by the queue on
    /// that path.
    pub fn push(&self, mut value: T) -> Result<(), PushError<T>> {
        loop {
            match self.try_push(value) {
                Ok(()) => return Ok(()),
                Err(PushError::Shutdown(rejected)) => {
                    tracing::trace!("push observed shutdown");
                    return Err(PushError::Shutdown(rejected));
                }
                Err(PushError::Full(rejected)) => {
                    value = rejected;
                    tracing::trace!(capacity = self.capacity, "push waiting for room");
                    self.not_full
                        .wait_until(|| self.is_shutdown() || !self.is_full());
                }
            }
        }
    }

    /// Builds an element with `make` and pushes it, blocking while the queue
    /// is full.
    ///
    /// `make` runs once, before any lock is taken. On shutdown the built
    /// element is handed back.
    pub fn emplace<F>(&self, make: F) -> Result<(), PushError<T>>
    where
        F: FnOnce() -> T,
    {
        self.push(make())
    }

    // ------------------------------------------------------------------------
    // Consumer side
    // ------------------------------------------------------------------------

    /// Attempts to pop an item from the queue without blocking.
    ///
    /// The slot the element came from is left vacant.
    pub fn try_pop(&self) -> Result<T, PopError> {
        let mut tail = self.cursors.lock_tail();
        if self.is_shutdown() {
            return Err(PopError::Shutdown);
        }
        if tail.is_empty() {
            return Err(PopError::Empty);
        }

        let value = self.ring.take(tail.next_slot());
        let rebase_due = tail.advance();
        drop(tail);

        if rebase_due && self.cursors.rebase() {
            tracing::trace!(base = self.ring.len(), "cursors rebased");
        }

        self.not_full.notify_one();
        Ok(value)
    }

    /// Pops an item, blocking while the queue is empty.
    ///
    /// Returns `Err(PopError::Shutdown)` if the queue is shut down before an
    /// element arrives.
    pub fn pop(&self) -> Result<T, PopError> {
        loop {
            match self.try_pop() {
                Ok(value) => return Ok(value),
                Err(PopError::Shutdown) => {
                    tracing::trace!("pop observed shutdown");
                    return Err(PopError::Shutdown);
                }
                Err(PopError::Empty) => {
                    tracing::trace!("pop waiting for an element");
                    self.not_empty
                        .wait_until(|| self.is_shutdown() || !self.is_empty());
                }
            }
        }
    }

    /// Pops up to `max` items from the queue into a `Vec` without blocking.
    ///
    /// Returns an empty `Vec` if the queue is empty or shut down.
    pub fn pop_batch(&self, max: usize) -> Vec<T> {
        let mut batch = Vec::with_capacity(max.min(self.len()));
        for _ in 0..max {
            match self.try_pop() {
                Ok(item) => batch.push(item),
                Err(_) => break,
            }
        }
        batch
    }

    // ------------------------------------------------------------------------
    // Shutdown
    // ------------------------------------------------------------------------

    /// Shuts the queue down and drops every resident element.
    ///
    /// Every thread blocked in `push`, `emplace` or `pop` returns promptly
    /// with a `Shutdown` error, and so does every later call. Shutdown is
    /// terminal; calling `clear` again has no further effect.
    pub fn clear(&self) {
        let dropped = {
            let mut both = self.cursors.lock_both();
            both.reset();
            self.shutdown.store(true, Ordering::Release);
            self.ring.clear()
        };

        tracing::debug!(capacity = self.capacity, dropped, "bounded queue shut down");

        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    /// Returns true once `clear` has been called.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    // ------------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------------

    /// Returns the number of items currently in the queue.
    pub fn len(&self) -> usize {
        self.cursors.lock_both().snapshot().len()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.cursors.lock_both().snapshot().is_empty()
    }

    /// Returns true if the queue is full.
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    /// Returns the capacity of the queue.
    ///
    /// Fixed at construction and unaffected by `clear`.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns a consistent snapshot of the raw cursors.
    pub fn cursors(&self) -> Cursors {
        self.cursors.lock_both().snapshot()
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("capacity", &self.capacity)
            .field("cursors", &self.cursors())
            .field("shutdown", &self.is_shutdown())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_push_pop() {
        let q = BoundedQueue::new(3);

        assert!(q.try_push(1).is_ok());
        assert!(q.try_push(2).is_ok());
        assert!(q.try_push(3).is_ok());

        assert_eq!(q.try_pop(), Ok(1));
        assert_eq!(q.try_pop(), Ok(2));
        assert_eq!(q.try_pop(), Ok(3));
        assert_eq!(q.try_pop(), Err(PopError::Empty));
    }

    #[test]
    fn backpressure_when_full() {
        let q = BoundedQueue::new(2);

        assert!(q.try_push(1).is_ok());
        assert!(q.try_push(2).is_ok());

        // Queue is full, the value comes back
        match q.try_push(3) {
            Err(PushError::Full(v)) => assert_eq!(v, 3),
            other => panic!("expected backpressure, got {other:?}"),
        }
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn pop_batch_drains() {
        let q = BoundedQueue::new(10);
        for i in 0..5 {
            q.try_push(i).unwrap();
        }

        let batch = q.pop_batch(3);
        assert_eq!(batch, vec![0, 1, 2]);
        assert_eq!(q.len(), 2);

        let batch = q.pop_batch(10);
        assert_eq!(batch, vec![3, 4]);
        assert!(q.is_empty());
    }

    #[test]
    fn pop_batch_empty() {
        let q: BoundedQueue<i32> = BoundedQueue::new(10);
        let batch = q.pop_batch(5);
        assert!(batch.is_empty());
    }

    #[test]
    fn capacity_and_len() {
        let q = BoundedQueue::new(5);
        assert_eq!(q.capacity(), 5);
        assert_eq!(q.len(), 0);
        assert!(q.is_empty());
        assert!(!q.is_full());

        for i in 0..5 {
            q.try_push(i).unwrap();
        }
        assert_eq!(q.len(), 5);
        assert!(!q.is_empty());
        assert!(q.is_full());
    }

    #[test]
    #[should_panic(expected = "queue capacity must be positive")]
    fn zero_capacity_panics() {
        let _q: BoundedQueue<i32> = BoundedQueue::new(0);
    }

    #[test]
    fn try_new_rejects_bad_capacities() {
        assert_eq!(
            BoundedQueue::<u8>::try_new(0).unwrap_err(),
            CapacityError::Zero
        );
        assert_eq!(
            BoundedQueue::<u8>::try_new(usize::MAX).unwrap_err(),
            CapacityError::TooLarge {
                capacity: usize::MAX
            }
        );
    }

    #[test]
    fn try_emplace_hands_back_built_value() {
        let q = BoundedQueue::new(1);
        assert!(q.try_emplace(|| String::from("first")).is_ok());

        let rejected = q.try_emplace(|| String::from("second")).unwrap_err();
        assert!(rejected.is_full());
        assert_eq!(rejected.into_inner(), "second");

        assert_eq!(q.try_pop().unwrap(), "first");
        q.try_emplace(|| String::from("third")).unwrap();
        assert_eq!(q.try_pop().unwrap(), "third");
    }

    #[test]
    fn emplace_constructor_may_use_the_queue() {
        let q = BoundedQueue::new(4);
        q.try_push(10).unwrap();

        // The constructor observes the queue and pushes into it.
        q.try_emplace(|| {
            q.try_push(20).unwrap();
            q.len() * 100
        })
        .unwrap();
        q.emplace(|| q.capacity() + q.cursors().head).unwrap();

        assert_eq!(q.pop_batch(4), vec![10, 20, 200, 7]);
    }

    #[test]
    fn clear_is_terminal() {
        let q = BoundedQueue::new(4);
        q.try_push(1).unwrap();
        q.try_push(2).unwrap();

        q.clear();

        assert!(q.is_shutdown());
        assert!(q.is_empty());
        assert_eq!(q.capacity(), 4);
        assert_eq!(q.try_push(3), Err(PushError::Shutdown(3)));
        assert_eq!(q.push(4), Err(PushError::Shutdown(4)));
        assert_eq!(q.try_pop(), Err(PopError::Shutdown));
        assert_eq!(q.pop(), Err(PopError::Shutdown));
        assert!(q.pop_batch(4).is_empty());

        q.clear();
        assert!(q.is_shutdown());
    }

    #[test]
    fn debug_shows_state_without_elements() {
        let q = BoundedQueue::new(2);
        q.try_push(()).unwrap();
        let rendered = format!("{q:?}");
        assert!(rendered.contains("capacity: 2"));
        assert!(rendered.contains("head: 1"));
        assert!(rendered.contains("shutdown: false"));
    }
}
