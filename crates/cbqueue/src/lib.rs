//! # cbqueue: Concurrent Bounded FIFO Queue
//!
//! A fixed-capacity, multi-producer multi-consumer queue for OS threads.
//! Producers block while the queue is full, consumers block while it is
//! empty, and a one-way shutdown releases every blocked thread.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │                BoundedQueue<T>                 │
//! │                                                │
//! │  not_full (Signal)       not_empty (Signal)    │
//! │     push / emplace              pop            │
//! │  ┌──────────────────────────────────────────┐  │
//! │  │  IndexPair: head ─── tail, rebase        │  │
//! │  └──────────────────────────────────────────┘  │
//! │  ┌──────────────────────────────────────────┐  │
//! │  │  Ring: C + 1 slots, one vacant           │  │
//! │  └──────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! - The ring owns the slots. Each slot is only touched by the side
//!   whose cursor currently points at it.
//! - The index pair keeps `head` (pushes) and `tail` (pops) monotonic and
//!   subtracts `base = C + 1` from both once `tail` passes `base`.
//! - Two signals (mutex + condvar) turn the non-blocking attempts into
//!   blocking calls.
//!
//! # Lock order
//!
//! `wait mutex → head-side → tail-side`. No code path holds a side lock while
//! acquiring a wait mutex.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use cbqueue::BoundedQueue;
//!
//! let queue = Arc::new(BoundedQueue::new(3));
//!
//! let producer = {
//!     let queue = Arc::clone(&queue);
//!     thread::spawn(move || {
//!         for i in 1..=4 {
//!             queue.push(i).unwrap();
//!         }
//!     })
//! };
//!
//! let received: Vec<i32> = (0..4).map(|_| queue.pop().unwrap()).collect();
//! producer.join().unwrap();
//!
//! assert_eq!(received, vec![1, 2, 3, 4]);
//! ```

mod cursor;
mod error;
mod queue;
mod ring;
mod signal;
mod sync;

pub use cursor::Cursors;
pub use error::{CapacityError, PopError, PushError};
pub use queue::BoundedQueue;
